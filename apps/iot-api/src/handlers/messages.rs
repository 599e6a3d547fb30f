//! 消息 handlers
//!
//! 消息挂在标签下：
//! - POST /tags/{id}/messages?device_id=... - 发送消息
//! - GET /tags/{id}/messages - 读取标签下的消息
//!
//! 归属校验在本层完成：先以调用方身份解析标签与设备
//! （任一失败即 403/404），再把解析出的外部 channel/publisher
//! 引用与归属外键打戳到消息上。消息存储本身不做归属过滤。

use crate::AppState;
use crate::middleware::require_caller;
use crate::utils::response::{bad_request_error, message_to_dto, storage_error};
use api_contract::{ApiResponse, CreateMessageRequest, MessageDto};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use iot_storage::{MessageCreate, MessageFilter};

#[derive(serde::Deserialize)]
pub struct MessageTagPath {
    tag_id: i64,
}

/// 发送消息的查询参数：目标设备。
#[derive(serde::Deserialize)]
pub struct SendMessageQuery {
    pub device_id: i64,
}

/// 发送消息
///
/// 流程：解析标签（归属校验）→ 解析设备（归属校验）→
/// 打戳 channel/publisher 与归属外键 → 落库。
pub async fn send_message(
    State(state): State<AppState>,
    Path(path): Path<MessageTagPath>,
    Query(query): Query<SendMessageQuery>,
    headers: HeaderMap,
    Json(req): Json<CreateMessageRequest>,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let tag = match state.tag_store.get_tag(&ctx, path.tag_id).await {
        Ok(tag) => tag,
        Err(err) => return storage_error(err),
    };
    let device = match state.device_store.get_device(&ctx, query.device_id).await {
        Ok(device) => device,
        Err(err) => return storage_error(err),
    };
    let channel_id = match tag.channel_uuid {
        Some(channel_uuid) => channel_uuid.to_string(),
        None => return bad_request_error("Tag has no external channel."),
    };
    let publisher = match device.thing_uuid {
        Some(thing_uuid) => thing_uuid.to_string(),
        None => return bad_request_error("Device has no external thing."),
    };
    let input = MessageCreate {
        channel_id,
        publisher,
        protocol: req.protocol.or_else(|| Some("http".to_string())),
        subtopic: req.subtopic,
        base_name: req.base_name,
        base_unit: req.base_unit,
        base_value: req.base_value,
        base_time: req.base_time,
        name: req.name,
        unit: req.unit,
        value: req.value,
        time: req.time,
        string_value: req.string_value,
        bool_value: req.bool_value,
        data_value: req.data_value,
        sum_value: req.sum_value,
        device_id: Some(device.id),
        tag_id: Some(tag.id),
        user_id: Some(ctx.user_id),
    };
    match state.message_store.create_message(input).await {
        Ok(item) => (
            StatusCode::OK,
            Json(ApiResponse::success(message_to_dto(item))),
        )
            .into_response(),
        Err(err) => storage_error(err),
    }
}

/// 读取标签下的消息
///
/// 先以调用方身份解析标签完成归属校验，再按 tag_id 等值查询。
pub async fn read_messages(
    State(state): State<AppState>,
    Path(path): Path<MessageTagPath>,
    headers: HeaderMap,
) -> Response {
    let ctx = match require_caller(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let tag = match state.tag_store.get_tag(&ctx, path.tag_id).await {
        Ok(tag) => tag,
        Err(err) => return storage_error(err),
    };
    match state
        .message_store
        .list_messages(MessageFilter::Tag(tag.id))
        .await
    {
        Ok(items) => {
            let data: Vec<MessageDto> = items.into_iter().map(message_to_dto).collect();
            (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
        }
        Err(err) => storage_error(err),
    }
}
