//! Payment gateway client
//!
//! 托管收银台会话创建。协调器只依赖 [`PaymentGateway`] 这一窄接口，
//! 因此无需真实网络即可测试；生产实现见 [`snap`]，开发/测试见 [`mock`]。

pub mod mock;
pub mod snap;

use async_trait::async_trait;
use serde::Deserialize;
use shared::payment::CustomerDetails;
use thiserror::Error;

pub use mock::MockGateway;
pub use snap::SnapGateway;

/// 商品明细 (收银台页面展示)
#[derive(Debug, Clone)]
pub struct ItemDetails {
    pub id: String,
    /// 单价 (最小货币单位)
    pub price: u64,
    pub quantity: u32,
    pub name: String,
}

/// 会话创建请求
///
/// `order_id` 与 `gross_amount` 在此绑定提交给网关；之后的回调
/// 必须回报同一金额才会被接受。
#[derive(Debug, Clone)]
pub struct SessionRequest {
    pub order_id: String,
    pub gross_amount: u64,
    pub item: ItemDetails,
    pub customer: CustomerDetails,
}

/// 会话创建响应 (托管收银台令牌 + 跳转地址)
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub redirect_url: String,
}

/// Gateway client errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 网关拒绝请求 (金额非法、明细不合规等)
    #[error("gateway rejected session request: {0}")]
    Rejected(String),

    /// 请求超时 (有界等待)
    #[error("gateway request timed out")]
    Timeout,

    /// 传输层失败
    #[error("gateway transport error: {0}")]
    Transport(String),
}

/// Payment gateway seam
///
/// 会话创建是协调器唯一的出站网关调用；回调走独立的入站通道。
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(&self, request: &SessionRequest) -> Result<SessionResponse, GatewayError>;
}
