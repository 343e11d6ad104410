use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthProvider, HttpAuthProvider, MockAuthProvider};
use crate::catalog::ProjectCatalog;
use crate::core::Config;
use crate::gateway::{MockGateway, PaymentGateway, SnapGateway};
use crate::payments::{OrderStore, PaymentCoordinator};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是后端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | OrderStore | 订单持久化存储 (redb) |
/// | catalog | Arc<ProjectCatalog> | 项目目录 |
/// | gateway | Arc<dyn PaymentGateway> | 支付网关客户端 |
/// | auth | Arc<dyn AuthProvider> | 身份服务委托 |
/// | coordinator | Arc<PaymentCoordinator> | 支付生命周期协调器 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 订单存储 (redb)
    pub orders: OrderStore,
    /// 项目目录
    pub catalog: Arc<ProjectCatalog>,
    /// 支付网关客户端
    pub gateway: Arc<dyn PaymentGateway>,
    /// 身份服务委托
    pub auth: Arc<dyn AuthProvider>,
    /// 支付协调器
    pub coordinator: Arc<PaymentCoordinator>,
}

impl ServerState {
    /// 从组件构造服务器状态
    ///
    /// 测试场景使用：注入 mock 网关/身份服务与临时存储
    pub fn with_parts(
        config: Config,
        orders: OrderStore,
        catalog: Arc<ProjectCatalog>,
        gateway: Arc<dyn PaymentGateway>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        let coordinator = Arc::new(PaymentCoordinator::new(
            orders.clone(),
            gateway.clone(),
            catalog.clone(),
            config.gateway_server_key.clone(),
        ));

        Self {
            config,
            orders,
            catalog,
            gateway,
            auth,
            coordinator,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 订单存储 (work_dir/database/karya.db)
    /// 3. 项目目录 (内存种子数据)
    /// 4. 网关客户端与身份服务 (密钥缺失时退化为 mock)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let orders = OrderStore::open(config.orders_db_path())?;
        tracing::info!(path = %config.orders_db_path().display(), "Order store opened");

        let catalog = Arc::new(ProjectCatalog::with_mock_data());

        let gateway: Arc<dyn PaymentGateway> = if config.gateway_server_key.is_empty() {
            tracing::warn!("GATEWAY_SERVER_KEY not set, using mock payment gateway");
            Arc::new(MockGateway::new())
        } else {
            Arc::new(SnapGateway::new(
                config.gateway_base_url.clone(),
                config.gateway_server_key.clone(),
                Duration::from_millis(config.gateway_timeout_ms),
            ))
        };

        let auth: Arc<dyn AuthProvider> = if config.auth_api_key.is_empty() {
            tracing::warn!("AUTH_API_KEY not set, using mock identity provider");
            Arc::new(MockAuthProvider::new())
        } else {
            Arc::new(HttpAuthProvider::new(
                config.auth_base_url.clone(),
                config.auth_api_key.clone(),
                Duration::from_millis(config.gateway_timeout_ms),
            ))
        };

        Ok(Self::with_parts(
            config.clone(),
            orders,
            catalog,
            gateway,
            auth,
        ))
    }

    /// 获取支付协调器
    pub fn coordinator(&self) -> &Arc<PaymentCoordinator> {
        &self.coordinator
    }

    /// 获取项目目录
    pub fn catalog(&self) -> &Arc<ProjectCatalog> {
        &self.catalog
    }

    /// 获取身份服务
    pub fn auth_provider(&self) -> &Arc<dyn AuthProvider> {
        &self.auth
    }

    /// 获取订单存储
    pub fn order_store(&self) -> &OrderStore {
        &self.orders
    }
}
