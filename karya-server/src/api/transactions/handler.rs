//! Transaction API Handlers
//!
//! 结账发起走统一错误封装；网关回调端点遵循网关的重投契约：
//! 签名通过后的一切处理结果都返回 2xx，否则网关会无限重投。

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::payment::{CustomerDetails, OrderRecord};

use crate::core::ServerState;
use crate::payments::{CallbackOutcome, PaymentError};
use crate::utils::{AppError, AppResult};

/// 结账发起请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransactionRequest {
    #[validate(length(min = 1, message = "project_id must not be empty"))]
    pub project_id: String,
    /// 金额 (最小货币单位)
    #[validate(range(min = 1, message = "gross_amount must be positive"))]
    pub gross_amount: u64,
    #[validate(nested)]
    pub customer_details: CustomerInput,
}

/// 客户信息 (入参校验后转为快照)
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 32))]
    pub phone: String,
}

impl From<CustomerInput> for CustomerDetails {
    fn from(input: CustomerInput) -> Self {
        CustomerDetails {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
        }
    }
}

/// 结账发起响应 (字段名与收银台前端约定保持一致)
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub token: String,
    pub redirect_url: String,
}

/// POST /api/transactions - 发起结账
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state
        .coordinator()
        .initiate(
            &payload.project_id,
            payload.gross_amount,
            payload.customer_details.into(),
        )
        .await?;

    Ok(Json(CheckoutResponse {
        order_id: session.order_id,
        token: session.token,
        redirect_url: session.redirect_url,
    }))
}

/// POST /api/transactions/notification - 网关回调
///
/// Must receive the raw body (not parsed JSON) so signature verification
/// sees exactly what the gateway signed.
pub async fn notification(State(state): State<ServerState>, body: Bytes) -> StatusCode {
    match state.coordinator().apply_notification(&body).await {
        Ok(CallbackOutcome::Applied { order_id, status }) => {
            tracing::info!(order_id = %order_id, status = %status, "Notification applied");
            StatusCode::OK
        }
        // 重复/迟到/未知订单：已按幂等语义处理，确认以停止网关重投
        Ok(CallbackOutcome::Duplicate { .. })
        | Ok(CallbackOutcome::Stale { .. })
        | Ok(CallbackOutcome::Unmapped { .. })
        | Ok(CallbackOutcome::UnknownOrder { .. }) => StatusCode::OK,
        // 金额不符：内部已告警；仍确认，避免重投同一条被拒事件
        Err(PaymentError::AmountMismatch { .. }) => StatusCode::OK,
        // 签名校验失败：拒绝确认
        Err(PaymentError::UnauthorizedCallback(_)) => StatusCode::UNAUTHORIZED,
        Err(PaymentError::MalformedCallback(e)) => {
            tracing::warn!(error = %e, "Malformed gateway notification");
            StatusCode::BAD_REQUEST
        }
        // 存储失败：返回 5xx 让网关稍后重投
        Err(e) => {
            tracing::error!(error = %e, "Notification processing failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// GET /api/transactions/:order_id - 查询订单状态与历史
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<OrderRecord>> {
    let record = state
        .coordinator()
        .order(&order_id)?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;
    Ok(Json(record))
}
