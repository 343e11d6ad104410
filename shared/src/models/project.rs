//! Project Model

use serde::{Deserialize, Serialize};

/// 项目状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// 已发布，接受报名
    #[default]
    Posted,
    /// 进行中
    InProgress,
    /// 已完成
    Completed,
    /// 已关闭
    Closed,
}

/// Project entity (委托项目)
///
/// The catalog is the read-only source the payment coordinator validates
/// against; `budget` is in minor currency units (IDR rupiah).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// 预算 (最小货币单位)
    pub budget: u64,
    pub category: String,
    pub status: ProjectStatus,
    pub client_name: String,
    /// 截止日期 (YYYY-MM-DD)
    pub deadline: Option<String>,
}

/// Create project payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub title: String,
    pub description: String,
    pub budget: u64,
    pub category: String,
    pub deadline: Option<String>,
}
