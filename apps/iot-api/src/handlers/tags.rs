//! 标签 CRUD handlers
//!
//! 提供标签资源的增删改查接口：
//! - GET /tags - 列出调用方的标签（可按 device_id 过滤）
//! - POST /tags - 创建标签
//! - POST /tags/bulk - 批量创建标签（原子）
//! - DELETE /tags - 批量删除标签（部分生效时披露条数）
//! - GET /tags/{id} - 获取标签详情
//! - PATCH /tags/{id}/graphed - 更新 graphed 标志
//! - DELETE /tags/{id} - 删除标签
//!
//! 权限要求：
//! - 所有接口需要 Bearer token 认证
//! - 归属链校验由存储层完成

use crate::AppState;
use crate::middleware::require_caller;
use crate::utils::response::{storage_error, tag_to_dto};
use crate::utils::validation::normalize_required;
use api_contract::{
    ApiResponse, CreateTagRequest, DeleteTagsRequest, TagDto, UpdateTagGraphedRequest,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use iot_storage::{Page, TagCreate};

#[derive(serde::Deserialize)]
pub struct TagPath {
    tag_id: i64,
}

/// 标签列表查询参数：分页 + 可选设备过滤。
#[derive(serde::Deserialize)]
pub struct TagListQuery {
    pub device_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn to_create(req: CreateTagRequest) -> Result<TagCreate, Response> {
    let name = normalize_required(req.name, "name")?;
    let label = normalize_required(req.label, "label")?;
    Ok(TagCreate {
        name,
        label,
        target: req.target,
        unit: req.unit,
        multiplier: req.multiplier,
        mask: req.mask,
        graphed: req.graphed.unwrap_or(false),
        channel_uuid: req.channel_uuid,
        device_id: req.device_id,
    })
}

/// 列出标签
///
/// 带 device_id 过滤时先校验该设备归属调用方：
/// 设备缺失或归属他人 → 403；结果为空 → 404。
pub async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<TagListQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let page = Page::new(query.limit.unwrap_or(10), query.offset.unwrap_or(0));
    match state
        .tag_store
        .list_tags(&ctx, page, query.device_id)
        .await
    {
        Ok(items) => {
            let data: Vec<TagDto> = items.into_iter().map(tag_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建标签
pub async fn create_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTagRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let input = match to_create(req) {
        Ok(input) => input,
        Err(response) => return response,
    };
    match state.tag_store.create_tag(&ctx, input).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(tag_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 批量创建标签（原子：任一校验失败则全部不落库）
pub async fn create_tags_bulk(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(reqs): Json<Vec<CreateTagRequest>>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let mut inputs = Vec::with_capacity(reqs.len());
    for req in reqs {
        match to_create(req) {
            Ok(input) => inputs.push(input),
            Err(response) => return response,
        }
    }
    match state.tag_store.create_tags(&ctx, inputs).await {
        Ok(items) => {
            let data: Vec<TagDto> = items.into_iter().map(tag_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 获取标签详情
pub async fn get_tag(
    State(state): State<AppState>,
    Path(path): Path<TagPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.tag_store.get_tag(&ctx, path.tag_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(tag_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 更新 graphed 标志
pub async fn update_tag_graphed(
    State(state): State<AppState>,
    Path(path): Path<TagPath>,
    headers: HeaderMap,
    Json(req): Json<UpdateTagGraphedRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .tag_store
        .set_graphed(&ctx, path.tag_id, req.graphed)
        .await
    {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(tag_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 删除标签
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(path): Path<TagPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.tag_store.delete_tag(&ctx, path.tag_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => storage_error(err),
    }
}

/// 批量删除标签
///
/// 只删除同时命中 id 集与调用方归属的行；删除数与请求数不符时
/// 返回 403，message 披露实际删除条数。
pub async fn delete_tags_bulk(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DeleteTagsRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.tag_store.delete_tags(&ctx, &req.tag_ids).await {
        Ok(deleted) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "deleted": deleted }))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}
