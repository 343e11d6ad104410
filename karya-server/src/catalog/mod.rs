//! Project Catalog - in-memory project source
//!
//! 项目目录。当前数据源为内存种子数据 (与上游系统对齐)，
//! 协调器只读查询，API 层可追加新项目。

use dashmap::DashMap;
use shared::models::{Project, ProjectCreate, ProjectStatus};
use uuid::Uuid;

/// In-memory project catalog
#[derive(Debug, Default)]
pub struct ProjectCatalog {
    projects: DashMap<String, Project>,
}

impl ProjectCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带种子数据的目录
    pub fn with_mock_data() -> Self {
        let catalog = Self::new();
        for project in mock_projects() {
            catalog.projects.insert(project.id.clone(), project);
        }
        catalog
    }

    /// 按 ID 查找项目
    pub fn find_by_id(&self, id: &str) -> Option<Project> {
        self.projects.get(id).map(|p| p.value().clone())
    }

    /// 列出全部项目 (按 ID 排序，输出稳定)
    pub fn list(&self) -> Vec<Project> {
        let mut projects: Vec<Project> =
            self.projects.iter().map(|p| p.value().clone()).collect();
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        projects
    }

    /// 新增项目，返回完整记录
    pub fn insert(&self, payload: ProjectCreate, client_name: String) -> Project {
        let project = Project {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            description: payload.description,
            budget: payload.budget,
            category: payload.category,
            status: ProjectStatus::Posted,
            client_name,
            deadline: payload.deadline,
        };
        self.projects.insert(project.id.clone(), project.clone());
        project
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// 种子项目数据
fn mock_projects() -> Vec<Project> {
    vec![
        Project {
            id: "1".to_string(),
            title: "Batik Design for Corporate Uniform".to_string(),
            description: "Looking for a skilled Batik artist to design a modern pattern for our company uniforms.".to_string(),
            budget: 5_000_000,
            category: "Batik Design".to_string(),
            status: ProjectStatus::Posted,
            client_name: "PT Maju Mundur".to_string(),
            deadline: Some("2023-12-31".to_string()),
        },
        Project {
            id: "2".to_string(),
            title: "Digital Illustration for Book Cover".to_string(),
            description: "Need a fantasy style illustration for a young adult novel cover.".to_string(),
            budget: 2_500_000,
            category: "Digital Art".to_string(),
            status: ProjectStatus::Posted,
            client_name: "Pustaka Indonesia".to_string(),
            deadline: Some("2023-11-15".to_string()),
        },
        Project {
            id: "3".to_string(),
            title: "Traditional Wayang Carving".to_string(),
            description: "Custom wayang kulit character creation.".to_string(),
            budget: 1_500_000,
            category: "Craft".to_string(),
            status: ProjectStatus::Posted,
            client_name: "Budaya Kita".to_string(),
            deadline: Some("2023-10-20".to_string()),
        },
    ]
}
