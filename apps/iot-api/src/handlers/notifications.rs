//! 通知 handlers（只追加）
//!
//! - GET /notifications - 列出调用方的通知（可按 device_id/alert_id 过滤）
//! - POST /notifications - 追加一条通知

use crate::AppState;
use crate::middleware::require_caller;
use crate::utils::response::{notification_to_dto, storage_error};
use api_contract::{ApiResponse, CreateNotificationRequest, NotificationDto};
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use iot_storage::{NotificationCreate, Page};

/// 通知列表查询参数：分页 + 可选设备/告警过滤。
#[derive(serde::Deserialize)]
pub struct NotificationListQuery {
    pub device_id: Option<i64>,
    pub alert_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// 列出通知（空结果按空列表返回）
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationListQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let page = Page::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    match state
        .notification_store
        .list_notifications(&ctx, page, query.device_id, query.alert_id)
        .await
    {
        Ok(items) => {
            let data: Vec<NotificationDto> =
                items.into_iter().map(notification_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 追加一条通知（归属调用方）
pub async fn create_notification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateNotificationRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let input = NotificationCreate {
        message: req.message,
        level: req.level,
        check_id: req.check_id,
        endpoint_id: req.endpoint_id,
        rule_id: req.rule_id,
        alert_id: req.alert_id,
        device_id: req.device_id,
        user_id: Some(ctx.user_id),
    };
    match state.notification_store.create_notification(input).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(notification_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}
