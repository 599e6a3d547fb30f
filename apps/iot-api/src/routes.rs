//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 认证接口：/auth/register, /auth/login, /auth/refresh-token
//! - 组织管理：/organizations/*
//! - 分组管理：/groups/*
//! - 设备管理：/devices/*（含 metadata 替换与一次性认领）
//! - 标签管理：/tags/*（含批量创建/删除）
//! - 消息接口：/tags/{id}/messages
//! - 告警管理：/alerts/*（含幂等启停）
//! - 通知查询：/notifications
//! - 动作管理：/actions/*

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh-token", post(refresh_token))
        .route(
            "/organizations",
            get(list_organizations).post(create_organization),
        )
        .route(
            "/organizations/:organization_id",
            get(get_organization)
                .put(update_organization)
                .delete(delete_organization),
        )
        .route("/groups", get(list_groups).post(create_group))
        .route(
            "/groups/:group_id",
            put(update_group).delete(delete_group),
        )
        .route("/devices", get(list_devices).post(create_device))
        .route(
            "/devices/:device_id",
            get(get_device).delete(delete_device),
        )
        .route(
            "/devices/:device_id/metadata",
            patch(update_device_metadata),
        )
        .route("/devices/:device_id/link", patch(link_device))
        .route(
            "/tags",
            get(list_tags).post(create_tag).delete(delete_tags_bulk),
        )
        .route("/tags/bulk", post(create_tags_bulk))
        .route("/tags/:tag_id", get(get_tag).delete(delete_tag))
        .route("/tags/:tag_id/graphed", patch(update_tag_graphed))
        .route(
            "/tags/:tag_id/messages",
            get(read_messages).post(send_message),
        )
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/:alert_id", get(get_alert).delete(delete_alert))
        .route("/alerts/:alert_id/enable", patch(enable_alert))
        .route("/alerts/:alert_id/disable", patch(disable_alert))
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/actions", post(create_action))
        .route(
            "/actions/:action_id",
            get(get_action).delete(delete_action),
        )
        .route("/actions/:action_id/toggle", patch(toggle_action))
}
