//! 支付协调器错误类型
//!
//! # 错误分类
//!
//! | 错误 | 性质 | 处理 |
//! |------|------|------|
//! | GatewaySession | 瞬时 | 调用方可重试，订单保持 created |
//! | UnauthorizedCallback | 永久 | 记录安全日志，拒绝确认 (非 2xx) |
//! | AmountMismatch | 永久 | 疑似篡改，告警运维；仍向网关确认 |
//! | MalformedCallback | 永久 | 无法解析，拒绝 |
//! | 其余 | 见各变体 | |

use crate::utils::AppError;
use thiserror::Error;

use super::storage::StorageError;

/// Payment coordinator errors
#[derive(Debug, Error)]
pub enum PaymentError {
    /// 网关会话创建失败 (超时/网络/拒绝)，订单保持 created，可安全重试
    #[error("Gateway session failure: {0}")]
    GatewaySession(String),

    /// 回调签名校验失败，不触碰任何状态
    #[error("Callback signature verification failed for order {0}")]
    UnauthorizedCallback(String),

    /// 回调金额与订单金额不符，疑似篡改
    #[error("Amount mismatch on order {order_id}: stored {expected}, reported {reported}")]
    AmountMismatch {
        order_id: String,
        expected: u64,
        reported: String,
    },

    /// 回调载荷无法解析
    #[error("Malformed callback payload: {0}")]
    MalformedCallback(String),

    /// 项目目录中不存在该项目
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// 发起参数非法
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 存储层错误
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::GatewaySession(msg) => AppError::gateway(msg),
            PaymentError::ProjectNotFound(id) => AppError::not_found(format!("Project {id}")),
            PaymentError::Validation(msg) => AppError::validation(msg),
            PaymentError::UnauthorizedCallback(_) => AppError::unauthorized(),
            PaymentError::MalformedCallback(msg) => AppError::invalid(msg),
            e @ PaymentError::AmountMismatch { .. } => AppError::business_rule(e.to_string()),
            PaymentError::Storage(e) => AppError::database(e.to_string()),
        }
    }
}
