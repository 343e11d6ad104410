//! User Model and auth DTOs
//!
//! User identity is owned by the external identity provider; this is the
//! session-scoped mirror plus the request/response DTOs for the thin
//! delegation endpoints.

use serde::{Deserialize, Serialize};

/// 用户类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// 艺术家 (自由职业者)
    Seniman,
    /// 客户 (发布项目方)
    Klien,
    /// 管理员
    Admin,
}

/// User entity mirrored from the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub user_type: UserType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_verified: bool,
}

/// Register payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response (access token issued by the identity provider)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}
