//! Karya Server - 自由职业艺术市场后端
//!
//! # 架构概述
//!
//! 本模块是 Karya 后端的主入口，提供以下核心功能：
//!
//! - **支付协调器** (`payments`): 订单生命周期状态机，幂等处理网关回调
//! - **网关客户端** (`gateway`): 托管收银台会话创建 (Snap REST API)
//! - **项目目录** (`catalog`): 内存项目数据源
//! - **认证** (`auth`): 委托外部身份服务的会话上下文
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! karya-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── payments/      # 支付生命周期协调器
//! ├── gateway/       # 支付网关客户端
//! ├── catalog/       # 项目目录
//! ├── auth/          # 会话认证 (外部身份服务委托)
//! └── utils/         # 错误、日志等工具
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod gateway;
pub mod payments;
pub mod utils;

// Re-export 公共类型
pub use auth::{AuthProvider, CurrentUser};
pub use catalog::ProjectCatalog;
pub use core::{Config, Server, ServerState};
pub use gateway::PaymentGateway;
pub use payments::{CallbackOutcome, OrderStore, PaymentCoordinator, PaymentError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
