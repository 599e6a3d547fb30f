//! 分组 CRUD handlers（管理面，无归属作用域）
//!
//! - GET /groups - 分页列出分组
//! - POST /groups - 创建分组（名称唯一）
//! - PUT /groups/{id} - 更新分组名称
//! - DELETE /groups/{id} - 删除分组

use crate::AppState;
use crate::handlers::PageQuery;
use crate::middleware::require_caller;
use crate::utils::response::{group_to_dto, not_found_error, storage_error};
use crate::utils::validation::normalize_required;
use api_contract::{ApiResponse, CreateGroupRequest, GroupDto, UpdateGroupRequest};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct GroupPath {
    group_id: i64,
}

/// 分页列出分组
pub async fn list_groups(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    match state.group_store.list_groups(query.page()).await {
        Ok(items) => {
            let data: Vec<GroupDto> = items.into_iter().map(group_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建分组（名称唯一，重名 → 400）
pub async fn create_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateGroupRequest>,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .group_store
        .create_group(&name, req.organization_id)
        .await
    {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(group_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 更新分组名称
pub async fn update_group(
    State(state): State<AppState>,
    Path(path): Path<GroupPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateGroupRequest>,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.group_store.update_group(path.group_id, &name).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(group_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error("Group not found"),
        Err(err) => storage_error(err),
    }
}

/// 删除分组
pub async fn delete_group(
    State(state): State<AppState>,
    Path(path): Path<GroupPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    match state.group_store.delete_group(path.group_id).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(group_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error("Group not found"),
        Err(err) => storage_error(err),
    }
}
