//! HTTP delegation to the external identity service
//!
//! 身份服务的 REST 接口 (GoTrue 风格)：
//!
//! | 操作 | 接口 |
//! |------|------|
//! | 注册 | `POST /auth/v1/signup` |
//! | 登录 | `POST /auth/v1/token?grant_type=password` |
//! | 取用户 | `GET /auth/v1/user` (Bearer) |

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use shared::models::{LoginResponse, RegisterRequest, User, UserType};
use std::time::Duration;

use super::{AuthError, AuthProvider};

/// Identity service wire representation of a user
#[derive(Debug, Deserialize)]
struct WireUser {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: WireUserMetadata,
    #[serde(default)]
    email_confirmed_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireUserMetadata {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    user_type: Option<UserType>,
}

impl From<WireUser> for User {
    fn from(wire: WireUser) -> Self {
        User {
            id: wire.id,
            email: wire.email,
            // 元数据缺失时默认按客户处理
            user_type: wire.user_metadata.user_type.unwrap_or(UserType::Klien),
            first_name: wire.user_metadata.first_name,
            last_name: wire.user_metadata.last_name,
            is_verified: wire.email_confirmed_at.is_some(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSession {
    access_token: String,
    token_type: String,
    user: WireUser,
}

/// HTTP auth provider
#[derive(Debug, Clone)]
pub struct HttpAuthProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpAuthProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn handle_rejection(resp: reqwest::Response) -> AuthError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::InvalidToken,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                AuthError::Rejected(text)
            }
            _ => AuthError::Transport(format!("{status}: {text}")),
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_up(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        let body = serde_json::json!({
            "email": request.email,
            "password": request.password,
            "data": {
                "first_name": request.first_name,
                "last_name": request.last_name,
                "user_type": request.user_type,
            },
        });

        let resp = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::handle_rejection(resp).await);
        }

        let wire: WireUser = resp
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(wire.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let resp = self
            .client
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        // 登录失败统一映射，防止邮箱枚举
        if resp.status() == StatusCode::BAD_REQUEST || resp.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }
        if !resp.status().is_success() {
            return Err(Self::handle_rejection(resp).await);
        }

        let wire: WireSession = resp
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(LoginResponse {
            access_token: wire.access_token,
            token_type: wire.token_type,
            user: wire.user.into(),
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<User, AuthError> {
        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::handle_rejection(resp).await);
        }

        let wire: WireUser = resp
            .json()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok(wire.into())
    }
}
