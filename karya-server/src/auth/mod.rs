//! 认证模块 - 外部身份服务委托
//!
//! 身份数据完全由外部身份服务持有；本模块只做三件事：
//!
//! - [`AuthProvider`]: 注册/登录/取用户的窄接口 (无网络即可测试)
//! - [`provider::HttpAuthProvider`]: 对身份服务 REST API 的薄委托
//! - [`CurrentUser`]: 请求级会话上下文，经由 extractor 显式注入，
//!   而非进程级单例

pub mod extractor;
pub mod mock;
pub mod provider;

use async_trait::async_trait;
use shared::models::{LoginResponse, RegisterRequest, User, UserType};
use thiserror::Error;

use crate::utils::AppError;

pub use mock::MockAuthProvider;
pub use provider::HttpAuthProvider;

/// 身份服务委托错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 凭证无效 (登录失败)
    #[error("invalid credentials")]
    InvalidCredentials,

    /// 令牌无效或过期
    #[error("invalid or expired access token")]
    InvalidToken,

    /// 身份服务拒绝请求 (邮箱已注册、密码过弱等)
    #[error("identity service rejected request: {0}")]
    Rejected(String),

    /// 传输层失败
    #[error("identity service transport error: {0}")]
    Transport(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::invalid_credentials(),
            AuthError::InvalidToken => AppError::invalid_token("Invalid token"),
            AuthError::Rejected(msg) => AppError::invalid(msg),
            AuthError::Transport(msg) => AppError::internal(msg),
        }
    }
}

/// Identity provider seam
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, request: &RegisterRequest) -> Result<User, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;
    async fn get_user(&self, access_token: &str) -> Result<User, AuthError>;
}

/// 当前用户 - 请求级会话上下文
#[derive(Debug, Clone, serde::Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub user_type: UserType,
    pub display_name: String,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        let display_name = match (&user.first_name, &user.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            _ => user.email.clone(),
        };
        Self {
            id: user.id,
            email: user.email,
            user_type: user.user_type,
            display_name,
        }
    }
}
