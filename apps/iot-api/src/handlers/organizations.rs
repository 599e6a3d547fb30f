//! 组织 CRUD handlers（管理面，无归属作用域）
//!
//! - GET /organizations - 分页列出组织
//! - POST /organizations - 创建组织（名称唯一）
//! - GET /organizations/{id} - 获取组织
//! - PUT /organizations/{id} - 更新组织名称
//! - DELETE /organizations/{id} - 删除组织

use crate::AppState;
use crate::handlers::PageQuery;
use crate::middleware::require_caller;
use crate::utils::response::{not_found_error, organization_to_dto, storage_error};
use crate::utils::validation::normalize_required;
use api_contract::{
    ApiResponse, CreateOrganizationRequest, OrganizationDto, UpdateOrganizationRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct OrganizationPath {
    organization_id: i64,
}

/// 分页列出组织
pub async fn list_organizations(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    match state.organization_store.list_organizations(query.page()).await {
        Ok(items) => {
            let data: Vec<OrganizationDto> =
                items.into_iter().map(organization_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建组织（名称唯一，重名 → 400）
pub async fn create_organization(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateOrganizationRequest>,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state.organization_store.create_organization(&name).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(organization_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 获取组织
pub async fn get_organization(
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    match state
        .organization_store
        .get_organization(path.organization_id)
        .await
    {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(organization_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error("Organization not found"),
        Err(err) => storage_error(err),
    }
}

/// 更新组织名称
pub async fn update_organization(
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateOrganizationRequest>,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    let name = match normalize_required(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    match state
        .organization_store
        .update_organization(path.organization_id, &name)
        .await
    {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(organization_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error("Organization not found"),
        Err(err) => storage_error(err),
    }
}

/// 删除组织
pub async fn delete_organization(
    State(state): State<AppState>,
    Path(path): Path<OrganizationPath>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = require_caller(&state, &headers) {
        return response;
    }
    match state
        .organization_store
        .delete_organization(path.organization_id)
        .await
    {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(ApiResponse::success(organization_to_dto(item))),
        )
            .into_response(),
        Ok(None) => not_found_error("Organization not found"),
        Err(err) => storage_error(err),
    }
}
