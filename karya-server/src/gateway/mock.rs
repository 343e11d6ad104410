//! Mock gateway for development and tests
//!
//! 未配置网关密钥时的替身实现：不发起任何网络调用，立即返回可用的
//! 会话令牌。测试可用 [`MockGateway::set_fail`] 模拟网关故障。

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use super::{GatewayError, PaymentGateway, SessionRequest, SessionResponse};

/// In-process gateway stand-in
#[derive(Debug, Default)]
pub struct MockGateway {
    fail: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// 让后续会话创建失败 (模拟网关不可用)
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionResponse, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("mock gateway failure".to_string()));
        }

        Ok(SessionResponse {
            token: format!("mock-token-{}", Uuid::new_v4()),
            redirect_url: format!(
                "https://app.sandbox.example.com/snap/v4/redirection/{}",
                request.order_id
            ),
        })
    }
}
