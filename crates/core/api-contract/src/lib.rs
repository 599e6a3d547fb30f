//! 稳定的 DTO 与 API 响应契约。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// 认证
// ============================================================================

/// 注册请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub organization_id: Option<i64>,
    pub group_id: Option<i64>,
}

/// 登录请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: u64,
    pub user: UserDto,
}

/// 刷新 token 请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(alias = "refresh_token")]
    pub refresh_token: String,
}

/// 刷新 token 响应体。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires: u64,
}

/// 用户返回结构（不含口令哈希）。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub organization_id: Option<i64>,
    pub group_id: Option<i64>,
}

// ============================================================================
// 组织与分组
// ============================================================================

/// 组织创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: String,
}

/// 组织更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    pub name: String,
}

/// 组织返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDto {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 分组创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    pub organization_id: Option<i64>,
}

/// 分组更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    pub name: String,
}

/// 分组返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDto {
    pub id: i64,
    pub name: String,
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// 设备
// ============================================================================

/// 设备创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    /// 设备类型: node | gateway
    pub kind: String,
    pub name: Option<String>,
    pub metadata: Option<Value>,
    pub is_configured: Option<bool>,
    pub thing_uuid: Option<Uuid>,
    pub thing_secret: Option<Uuid>,
    pub parent_id: Option<i64>,
}

/// 设备返回结构。thing_secret 不回传。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub id: i64,
    pub uuid: Uuid,
    pub name: Option<String>,
    pub kind: String,
    pub metadata: Option<Value>,
    pub is_configured: bool,
    pub thing_uuid: Option<Uuid>,
    pub parent_id: Option<i64>,
    pub user_id: Option<Uuid>,
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// 标签
// ============================================================================

/// 标签创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
    pub label: String,
    pub target: Option<i64>,
    pub unit: Option<String>,
    pub multiplier: Option<f64>,
    pub mask: Option<Value>,
    pub graphed: Option<bool>,
    pub channel_uuid: Option<Uuid>,
    pub device_id: Option<i64>,
}

/// 标签 graphed 更新请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagGraphedRequest {
    pub graphed: bool,
}

/// 标签批量删除请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTagsRequest {
    pub tag_ids: Vec<i64>,
}

/// 标签返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub label: String,
    pub target: Option<i64>,
    pub unit: Option<String>,
    pub multiplier: Option<f64>,
    pub mask: Option<Value>,
    pub graphed: bool,
    pub channel_uuid: Option<Uuid>,
    pub user_id: Uuid,
    pub device_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// 告警与通知
// ============================================================================

/// 告警创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub name: String,
    pub comparator: String,
    pub threshold: f64,
    /// 告警状态: enabled | disabled
    pub status: String,
    pub check_external_id: String,
    pub check_message_template: String,
    pub device_id: Option<i64>,
}

/// 告警返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDto {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub comparator: String,
    pub threshold: f64,
    pub status: String,
    pub check_external_id: String,
    pub check_message_template: String,
    pub device_id: Option<i64>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 通知创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub message: String,
    pub level: String,
    pub check_id: String,
    pub endpoint_id: String,
    pub rule_id: String,
    pub alert_id: Option<i64>,
    pub device_id: Option<i64>,
}

/// 通知返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: i64,
    pub uuid: Uuid,
    pub message: String,
    pub level: String,
    pub check_id: String,
    pub endpoint_id: String,
    pub rule_id: String,
    pub alert_id: Option<i64>,
    pub device_id: Option<i64>,
    pub user_id: Option<Uuid>,
}

// ============================================================================
// 消息
// ============================================================================

/// 消息创建请求体（SenML 风格语义字段）。
/// channel/publisher 由服务端解析标签与设备后打戳。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub protocol: Option<String>,
    pub subtopic: Option<String>,
    pub base_name: String,
    pub base_unit: String,
    pub base_value: f64,
    pub base_time: i64,
    pub name: String,
    pub unit: String,
    pub value: f64,
    pub time: i64,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
    pub data_value: Option<String>,
    pub sum_value: Option<f64>,
}

/// 消息返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: i64,
    pub uuid: Uuid,
    pub channel_id: String,
    pub publisher: String,
    pub protocol: Option<String>,
    pub subtopic: Option<String>,
    pub base_name: String,
    pub base_unit: String,
    pub base_value: f64,
    pub base_time: i64,
    pub name: String,
    pub unit: String,
    pub value: f64,
    pub time: i64,
    pub string_value: Option<String>,
    pub bool_value: Option<bool>,
    pub data_value: Option<String>,
    pub sum_value: Option<f64>,
    pub device_id: Option<i64>,
    pub tag_id: Option<i64>,
    pub user_id: Option<Uuid>,
}

// ============================================================================
// 动作
// ============================================================================

/// 动作创建请求体。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActionRequest {
    pub device_id: i64,
    pub values: Vec<String>,
}

/// 动作返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDto {
    pub id: i64,
    pub uuid: Uuid,
    pub device_id: i64,
    pub status: String,
    pub is_enabled: bool,
    pub values: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
