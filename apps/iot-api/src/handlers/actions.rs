//! 动作 handlers
//!
//! 动作经 device_id → device.user_id 链做用户作用域：
//! - POST /actions - 创建动作（目标设备须归属调用方）
//! - GET /actions/{id} - 获取动作
//! - PATCH /actions/{id}/toggle - 翻转 is_enabled
//! - DELETE /actions/{id} - 删除动作

use crate::AppState;
use crate::middleware::require_caller;
use crate::utils::response::{action_to_dto, storage_error};
use api_contract::{ApiResponse, CreateActionRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use iot_storage::ActionCreate;

#[derive(serde::Deserialize)]
pub struct ActionPath {
    action_id: i64,
}

/// 创建动作
pub async fn create_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateActionRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let input = ActionCreate {
        device_id: req.device_id,
        values: req.values,
    };
    match state.action_store.create_action(&ctx, input).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(action_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 获取动作
pub async fn get_action(
    State(state): State<AppState>,
    Path(path): Path<ActionPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.action_store.get_action(&ctx, path.action_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(action_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 翻转动作的 is_enabled
pub async fn toggle_action(
    State(state): State<AppState>,
    Path(path): Path<ActionPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.action_store.toggle_action(&ctx, path.action_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(action_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 删除动作
pub async fn delete_action(
    State(state): State<AppState>,
    Path(path): Path<ActionPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.action_store.delete_action(&ctx, path.action_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => storage_error(err),
    }
}
