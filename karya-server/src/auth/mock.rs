//! Mock auth provider for development and tests
//!
//! 未配置身份服务密钥时的替身实现：接受任意非空令牌并返回固定用户。

use async_trait::async_trait;
use shared::models::{LoginResponse, RegisterRequest, User, UserType};
use uuid::Uuid;

use super::{AuthError, AuthProvider};

/// In-process identity provider stand-in
#[derive(Debug, Default)]
pub struct MockAuthProvider;

impl MockAuthProvider {
    pub fn new() -> Self {
        Self
    }

    fn fixed_user() -> User {
        User {
            id: "mock-user".to_string(),
            email: "budi.santoso@example.com".to_string(),
            user_type: UserType::Klien,
            first_name: Some("Budi".to_string()),
            last_name: Some("Santoso".to_string()),
            is_verified: true,
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_up(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        Ok(User {
            id: Uuid::new_v4().to_string(),
            email: request.email.clone(),
            user_type: request.user_type,
            first_name: Some(request.first_name.clone()),
            last_name: Some(request.last_name.clone()),
            is_verified: false,
        })
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<LoginResponse, AuthError> {
        let mut user = Self::fixed_user();
        user.email = email.to_string();
        Ok(LoginResponse {
            access_token: format!("mock-token-{}", Uuid::new_v4()),
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<User, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(Self::fixed_user())
    }
}
