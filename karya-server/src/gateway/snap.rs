//! Snap gateway integration via REST API (no SDK dependency)

use async_trait::async_trait;
use std::time::Duration;

use super::{GatewayError, PaymentGateway, SessionRequest, SessionResponse};

/// 网关对商品名称的长度限制
const ITEM_NAME_LIMIT: usize = 50;

/// Snap hosted-checkout client
///
/// 每个会话创建调用都有有界超时；超时或网络失败向上抛出可重试错误，
/// 不会无限阻塞 `initiate`。
#[derive(Debug, Clone)]
pub struct SnapGateway {
    client: reqwest::Client,
    base_url: String,
    server_key: String,
}

impl SnapGateway {
    /// Create a Snap client
    pub fn new(base_url: impl Into<String>, server_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            server_key: server_key.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for SnapGateway {
    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionResponse, GatewayError> {
        let body = serde_json::json!({
            "transaction_details": {
                "order_id": request.order_id,
                "gross_amount": request.gross_amount,
            },
            "item_details": [{
                "id": request.item.id,
                "price": request.item.price,
                "quantity": request.item.quantity,
                "name": truncate_name(&request.item.name),
            }],
            "customer_details": request.customer,
        });

        let resp = self
            .client
            .post(format!("{}/snap/v1/transactions", self.base_url))
            .basic_auth(&self.server_key, None::<&str>)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected(format!("{status}: {text}")));
        }

        resp.json::<SessionResponse>()
            .await
            .map_err(|e| GatewayError::Transport(format!("invalid session response: {e}")))
    }
}

/// Truncate an item name to the gateway limit, respecting char boundaries
fn truncate_name(name: &str) -> &str {
    if name.len() <= ITEM_NAME_LIMIT {
        return name;
    }
    let mut end = ITEM_NAME_LIMIT;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
