//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：auth_error, forbidden_error, bad_request_error,
//!   not_found_error, internal_auth_error, storage_error
//! - DTO 转换：organization_to_dto, group_to_dto, user_to_dto,
//!   device_to_dto, tag_to_dto, alert_to_dto, notification_to_dto,
//!   message_to_dto, action_to_dto
//!
//! 存储错误到状态码的映射：
//! - NotFound → 404
//! - PermissionDenied / PartialDelete → 403（后者的 message 披露删除条数）
//! - BadRequest → 400
//! - Conflict → 409
//! - Database → 500

use api_contract::{
    ActionDto, AlertDto, ApiResponse, DeviceDto, GroupDto, MessageDto, NotificationDto,
    OrganizationDto, TagDto, UserDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iot_auth::AuthError;
use iot_storage::{
    ActionRecord, AlertRecord, DeviceRecord, GroupRecord, MessageRecord, NotificationRecord,
    OrganizationRecord, StorageError, TagRecord, UserRecord,
};

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// 禁止访问错误响应
pub fn forbidden_error(message: impl Into<String>) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("AUTH.FORBIDDEN", message.into())),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(
            "RESOURCE.NOT_FOUND",
            message.into(),
        )),
    )
        .into_response()
}

/// 状态冲突错误响应
pub fn conflict_error(message: impl Into<String>) -> Response {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::<()>::error("STATE.CONFLICT", message.into())),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 存储错误响应：错误分类原样映射为状态码
pub fn storage_error(err: StorageError) -> Response {
    match err {
        StorageError::NotFound(message) => not_found_error(message),
        StorageError::PermissionDenied(message) => forbidden_error(message),
        StorageError::BadRequest(message) => bad_request_error(message),
        StorageError::Conflict(message) => conflict_error(message),
        partial @ StorageError::PartialDelete { .. } => forbidden_error(partial.to_string()),
        StorageError::Database(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error("INTERNAL.ERROR", err.to_string())),
        )
            .into_response(),
    }
}

/// OrganizationRecord 转 OrganizationDto
pub fn organization_to_dto(record: OrganizationRecord) -> OrganizationDto {
    OrganizationDto {
        id: record.id,
        name: record.name,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// GroupRecord 转 GroupDto
pub fn group_to_dto(record: GroupRecord) -> GroupDto {
    GroupDto {
        id: record.id,
        name: record.name,
        organization_id: record.organization_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// UserRecord 转 UserDto（剥离口令哈希与 refresh jti）
pub fn user_to_dto(record: UserRecord) -> UserDto {
    UserDto {
        id: record.id,
        email: record.email,
        is_active: record.is_active,
        organization_id: record.organization_id,
        group_id: record.group_id,
    }
}

/// DeviceRecord 转 DeviceDto（thing_secret 不回传）
pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        id: record.id,
        uuid: record.uuid,
        name: record.name,
        kind: record.kind,
        metadata: record.metadata,
        is_configured: record.is_configured,
        thing_uuid: record.thing_uuid,
        parent_id: record.parent_id,
        user_id: record.user_id,
        organization_id: record.organization_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// TagRecord 转 TagDto
pub fn tag_to_dto(record: TagRecord) -> TagDto {
    TagDto {
        id: record.id,
        uuid: record.uuid,
        name: record.name,
        label: record.label,
        target: record.target,
        unit: record.unit,
        multiplier: record.multiplier,
        mask: record.mask,
        graphed: record.graphed,
        channel_uuid: record.channel_uuid,
        user_id: record.user_id,
        device_id: record.device_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// AlertRecord 转 AlertDto
pub fn alert_to_dto(record: AlertRecord) -> AlertDto {
    AlertDto {
        id: record.id,
        uuid: record.uuid,
        name: record.name,
        comparator: record.comparator,
        threshold: record.threshold,
        status: record.status,
        check_external_id: record.check_external_id,
        check_message_template: record.check_message_template,
        device_id: record.device_id,
        user_id: record.user_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// NotificationRecord 转 NotificationDto
pub fn notification_to_dto(record: NotificationRecord) -> NotificationDto {
    NotificationDto {
        id: record.id,
        uuid: record.uuid,
        message: record.message,
        level: record.level,
        check_id: record.check_id,
        endpoint_id: record.endpoint_id,
        rule_id: record.rule_id,
        alert_id: record.alert_id,
        device_id: record.device_id,
        user_id: record.user_id,
    }
}

/// MessageRecord 转 MessageDto
pub fn message_to_dto(record: MessageRecord) -> MessageDto {
    MessageDto {
        id: record.id,
        uuid: record.uuid,
        channel_id: record.channel_id,
        publisher: record.publisher,
        protocol: record.protocol,
        subtopic: record.subtopic,
        base_name: record.base_name,
        base_unit: record.base_unit,
        base_value: record.base_value,
        base_time: record.base_time,
        name: record.name,
        unit: record.unit,
        value: record.value,
        time: record.time,
        string_value: record.string_value,
        bool_value: record.bool_value,
        data_value: record.data_value,
        sum_value: record.sum_value,
        device_id: record.device_id,
        tag_id: record.tag_id,
        user_id: record.user_id,
    }
}

/// ActionRecord 转 ActionDto
pub fn action_to_dto(record: ActionRecord) -> ActionDto {
    ActionDto {
        id: record.id,
        uuid: record.uuid,
        device_id: record.device_id,
        status: record.status,
        is_enabled: record.is_enabled,
        values: record.values,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
