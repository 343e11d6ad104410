use std::path::PathBuf;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/karya | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | GATEWAY_BASE_URL | https://app.sandbox.midtrans.com | 支付网关地址 |
/// | GATEWAY_SERVER_KEY | (空) | 网关服务端密钥；为空时使用 mock 网关 |
/// | GATEWAY_TIMEOUT_MS | 10000 | 网关会话调用超时(毫秒) |
/// | AUTH_BASE_URL | http://localhost:9999 | 身份服务地址 |
/// | AUTH_API_KEY | (空) | 身份服务密钥；为空时使用 mock 身份服务 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/karya HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 支付网关配置 ===
    /// 网关 API 地址
    pub gateway_base_url: String,
    /// 网关服务端密钥 (签发会话 + 校验回调签名)
    pub gateway_server_key: String,
    /// 网关会话调用超时 (毫秒)
    pub gateway_timeout_ms: u64,

    // === 身份服务配置 ===
    /// 身份服务地址
    pub auth_base_url: String,
    /// 身份服务密钥
    pub auth_api_key: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/karya".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            gateway_base_url: std::env::var("GATEWAY_BASE_URL")
                .unwrap_or_else(|_| "https://app.sandbox.midtrans.com".into()),
            gateway_server_key: std::env::var("GATEWAY_SERVER_KEY").unwrap_or_default(),
            gateway_timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),

            auth_base_url: std::env::var("AUTH_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9999".into()),
            auth_api_key: std::env::var("AUTH_API_KEY").unwrap_or_default(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 订单数据库文件路径
    pub fn orders_db_path(&self) -> PathBuf {
        self.database_dir().join("karya.db")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
