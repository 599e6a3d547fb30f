//! 设备 CRUD handlers
//!
//! 提供设备资源的增删改查接口：
//! - GET /devices - 列出调用方的设备
//! - POST /devices - 创建设备（归属调用方）
//! - GET /devices/{id} - 获取设备详情
//! - PATCH /devices/{id}/metadata - 整体替换设备 metadata
//! - PATCH /devices/{id}/link - 将设备认领到调用方（一次性）
//! - DELETE /devices/{id} - 删除设备
//!
//! 权限要求：
//! - 所有接口需要 Bearer token 认证
//! - 除创建外的所有操作都由存储层做归属链校验

use crate::AppState;
use crate::handlers::PageQuery;
use crate::middleware::require_caller;
use crate::utils::response::{device_to_dto, storage_error};
use crate::utils::validation::{normalize_optional, parse_kind};
use api_contract::{ApiResponse, CreateDeviceRequest, DeviceDto};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use domain::DeviceKind;
use iot_storage::DeviceCreate;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    device_id: i64,
}

/// 列出设备
///
/// 查询调用方名下的所有设备，带 limit/offset 分页。
///
/// # 参数
///
/// - `state`: 应用状态，包含 `device_store` 存储实例
/// - `query`: 分页参数（limit 默认 10，offset 默认 0）
/// - `headers`: HTTP 请求头，用于提取 Bearer token 进行认证
///
/// # 返回
///
/// 成功时返回 `200 OK` 和设备列表。
///
/// # 流程
///
/// 1. 调用 `require_caller` 验证 Bearer token
/// 2. 调用 `device_store.list_devices` 查询调用方的设备
/// 3. 将 `DeviceRecord` 列表转换为 `DeviceDto` 列表
/// 4. 返回统一的 API 响应格式
///
/// # 错误处理
///
/// - `401 UNAUTHORIZED`: 认证失败（token 无效或过期）
/// - `404 NOT FOUND`: 调用方名下没有任何设备
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn list_devices(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.device_store.list_devices(&ctx, query.page()).await {
        Ok(items) => {
            let data: Vec<DeviceDto> = items.into_iter().map(device_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 创建设备
///
/// 创建归属调用方的新设备。设备名不要求唯一；
/// 外部 thing 引用（uuid/secret）仅存储，不做解释。
///
/// # 参数
///
/// - `state`: 应用状态，包含 `device_store` 存储实例
/// - `headers`: HTTP 请求头，用于提取 Bearer token 进行认证
/// - `req`: 请求体（kind 必填：node | gateway）
///
/// # 返回
///
/// 成功时返回 `200 OK` 和创建的设备信息。
///
/// # 流程
///
/// 1. 调用 `require_caller` 验证 Bearer token
/// 2. 解析并校验设备类型（node | gateway）
/// 3. 以调用方身份打戳 user_id/organization_id
/// 4. 调用 `device_store.create_device` 保存
///
/// # 错误处理
///
/// - `400 BAD REQUEST`: 设备类型非法或字段格式错误
/// - `401 UNAUTHORIZED`: 认证失败
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn create_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateDeviceRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let kind = match parse_kind::<DeviceKind>(&req.kind) {
        Ok(kind) => kind,
        Err(response) => return response,
    };
    let name = match normalize_optional(req.name, "name") {
        Ok(value) => value,
        Err(response) => return response,
    };
    let input = DeviceCreate {
        user_id: Some(ctx.user_id),
        organization_id: ctx.organization_id,
        kind: kind.as_str().to_string(),
        name,
        metadata: req.metadata,
        is_configured: req.is_configured.unwrap_or(false),
        thing_uuid: req.thing_uuid,
        thing_secret: req.thing_secret,
        parent_id: req.parent_id,
    };
    match state.device_store.create_device(input).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 获取设备详情
///
/// # 流程
///
/// 1. 调用 `require_caller` 验证 Bearer token
/// 2. 调用 `device_store.get_device`（缺失 → 404，归属他人 → 403）
///
/// # 错误处理
///
/// - `401 UNAUTHORIZED`: 认证失败
/// - `403 FORBIDDEN`: 设备归属他人
/// - `404 NOT FOUND`: 设备不存在
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn get_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.device_store.get_device(&ctx, path.device_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 整体替换设备 metadata
///
/// 请求体即新的 metadata JSON 对象；不做字段级合并。
///
/// # 错误处理
///
/// - `401 UNAUTHORIZED`: 认证失败
/// - `403 FORBIDDEN`: 设备归属他人
/// - `404 NOT FOUND`: 设备不存在
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn update_device_metadata(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
    Json(metadata): Json<serde_json::Value>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state
        .device_store
        .update_metadata(&ctx, path.device_id, metadata)
        .await
    {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 将设备认领到调用方
///
/// 一次性认领：user_id 仅允许从空设置一次，已被认领的设备
/// （无论归属谁）返回 403。
///
/// # 错误处理
///
/// - `401 UNAUTHORIZED`: 认证失败
/// - `403 FORBIDDEN`: 设备已被认领
/// - `404 NOT FOUND`: 设备不存在
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn link_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.device_store.link_to_user(&ctx, path.device_id).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(device_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 删除设备
///
/// # 错误处理
///
/// - `401 UNAUTHORIZED`: 认证失败
/// - `403 FORBIDDEN`: 设备归属他人
/// - `404 NOT FOUND`: 设备不存在
/// - `500 INTERNAL SERVER ERROR`: 存储层错误
pub async fn delete_device(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    match state.device_store.delete_device(&ctx, path.device_id).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::success(()))).into_response(),
        Err(err) => storage_error(err),
    }
}
