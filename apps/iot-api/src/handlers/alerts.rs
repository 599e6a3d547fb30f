//! 告警 CRUD handlers
//!
//! - GET /alerts - 列出调用方的告警（可按 device_id 过滤）
//! - POST /alerts - 创建告警（名称唯一）
//! - GET /alerts/{id} - 获取告警详情
//! - PATCH /alerts/{id}/enable - 启用（重复启用 → 409）
//! - PATCH /alerts/{id}/disable - 停用（重复停用 → 409）
//! - DELETE /alerts/{id} - 删除告警

use crate::AppState;
use crate::middleware::require_caller;
use crate::utils::response::{alert_to_dto, storage_error};
use crate::utils::validation::{normalize_required, parse_kind};
use api_contract::{AlertDto, ApiResponse, CreateAlertRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::AlertState;
use iot_storage::{AlertCreate, Page};

#[derive(serde::Deserialize)]
pub struct AlertPath {
    alert_id: i64,
}

/// 告警列表查询参数：分页 + 可选设备过滤。
#[derive(serde::Deserialize)]
pub struct AlertListQuery {
    pub device_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// 列出告警
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let page = Page::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    match state
        .alert_store
        .list_alerts(&ctx, page, query.device_id)
        .await
    {
        Ok(items) => {
            let data: Vec<AlertDto> = items.into_iter().map(alert_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建告警
pub async fn create_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAlertRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let status = match parse_kind::<AlertState>(&req.status) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let input = AlertCreate {
        name,
        comparator: req.comparator,
        threshold: req.threshold,
        status: status.as_str().to_string(),
        check_external_id: req.check_external_id,
        check_message_template: req.check_message_template,
        device_id: req.device_id,
    };
    match state.alert_store.create_alert(&ctx, input).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(alert_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 获取告警详情
///
/// 缺失与归属他人统一返回 403（此操作的检查顺序有意与其他实体相反）。
pub async fn get_alert(
    State(state): State<AppState>,
    Path(path): Path<AlertPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.alert_store.get_alert(&ctx, path.alert_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(alert_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 启用告警
pub async fn enable_alert(
    State(state): State<AppState>,
    Path(path): Path<AlertPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.alert_store.enable_alert(&ctx, path.alert_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(alert_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 停用告警
pub async fn disable_alert(
    State(state): State<AppState>,
    Path(path): Path<AlertPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.alert_store.disable_alert(&ctx, path.alert_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(alert_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 删除告警
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(path): Path<AlertPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.alert_store.delete_alert(&ctx, path.alert_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => storage_error(err),
    }
}
