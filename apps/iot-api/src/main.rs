//! IoT 设备管理 HTTP API 服务器
//!
//! 启动流程：
//! 1. 加载 .env 与环境变量配置
//! 2. 初始化结构化日志
//! 3. 建立 Postgres 连接池并装配各实体存储
//! 4. 装配认证服务（JWT + 用户存储）
//! 5. 挂载路由与请求追踪中间件，开始服务

mod handlers;
mod middleware;
mod routes;
mod utils;

use std::sync::Arc;

use axum::middleware::from_fn;
use iot_auth::{AuthService, JwtManager};
use iot_config::AppConfig;
use iot_storage::{
    ActionStore, AlertStore, DeviceStore, GroupStore, MessageStore, NotificationStore,
    OrganizationStore, PgActionStore, PgAlertStore, PgDeviceStore, PgGroupStore, PgMessageStore,
    PgNotificationStore, PgOrganizationStore, PgTagStore, PgUserStore, TagStore, connect_pool,
};
use iot_telemetry::init_tracing;
use tower_http::trace::TraceLayer;

/// 应用状态：各实体存储 + 认证服务。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub organization_store: Arc<dyn OrganizationStore>,
    pub group_store: Arc<dyn GroupStore>,
    pub device_store: Arc<dyn DeviceStore>,
    pub tag_store: Arc<dyn TagStore>,
    pub alert_store: Arc<dyn AlertStore>,
    pub notification_store: Arc<dyn NotificationStore>,
    pub message_store: Arc<dyn MessageStore>,
    pub action_store: Arc<dyn ActionStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // Postgres 存储（需先执行 migrations/seed）
    let pool = connect_pool(&config.database_url).await?;
    let user_store = Arc::new(PgUserStore::new(pool.clone()));

    // JWT 管理器与认证服务
    let jwt = JwtManager::new(
        config.jwt_secret.clone(),
        config.jwt_access_ttl_seconds,
        config.jwt_refresh_ttl_seconds,
    );
    let auth = Arc::new(AuthService::new(user_store, jwt));

    let state = AppState {
        auth,
        organization_store: Arc::new(PgOrganizationStore::new(pool.clone())),
        group_store: Arc::new(PgGroupStore::new(pool.clone())),
        device_store: Arc::new(PgDeviceStore::new(pool.clone())),
        tag_store: Arc::new(PgTagStore::new(pool.clone())),
        alert_store: Arc::new(PgAlertStore::new(pool.clone())),
        notification_store: Arc::new(PgNotificationStore::new(pool.clone())),
        message_store: Arc::new(PgMessageStore::new(pool.clone())),
        action_store: Arc::new(PgActionStore::new(pool)),
    };

    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http());

    tracing::info!(addr = %config.http_addr, "iot-api listening");
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
