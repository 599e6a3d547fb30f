//! 数据模型
//!
//! 定义所有存储相关的数据模型和创建输入结构：
//! - 组织模型：OrganizationRecord
//! - 分组模型：GroupRecord
//! - 用户模型：UserRecord, UserCreate
//! - 设备模型：DeviceRecord, DeviceCreate（含外部 thing 引用）
//! - 标签模型：TagRecord, TagCreate（含外部 channel 引用）
//! - 告警模型：AlertRecord, AlertCreate
//! - 通知模型：NotificationRecord, NotificationCreate（只追加）
//! - 消息模型：MessageRecord, MessageCreate（只追加，SenML 风格语义字段）
//! - 动作模型：ActionRecord, ActionCreate
//!
//! 约定：
//! - 除用户（UUID 主键）外，实体主键为 i64 自增 id，另带公开 uuid
//! - 枚举值字段（设备类型、告警/动作状态）以小写字符串存储，
//!   合法取值由 `domain` 的枚举约束，在 API 边界解析校验
//! - 外部平台引用（thing_uuid/thing_secret/channel_uuid、check/endpoint/rule id）
//!   只存储不解释

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// 分页参数（limit/offset）。
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

/// 组织记录。名称全局唯一。
#[derive(Debug, Clone)]
pub struct OrganizationRecord {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 分组记录。名称全局唯一，归属组织可选。
#[derive(Debug, Clone)]
pub struct GroupRecord {
    pub id: i64,
    pub name: String,
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户记录。邮箱全局唯一；refresh_jti 绑定当前有效的 refresh token。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub organization_id: Option<i64>,
    pub group_id: Option<i64>,
    pub refresh_jti: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 用户创建输入。
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub password_hash: String,
    pub organization_id: Option<i64>,
    pub group_id: Option<i64>,
}

/// 设备记录。
///
/// `user_id` 为空表示设备尚未被认领；认领（link）只允许发生一次。
/// `thing_uuid`/`thing_secret` 指向外部遥测平台中的 thing，仅存储。
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub id: i64,
    pub uuid: Uuid,
    pub name: Option<String>,
    /// 设备类型: node | gateway
    pub kind: String,
    pub metadata: Option<Value>,
    pub is_configured: bool,
    pub thing_uuid: Option<Uuid>,
    pub thing_secret: Option<Uuid>,
    /// 父设备（仅一层自引用）
    pub parent_id: Option<i64>,
    pub user_id: Option<Uuid>,
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 设备创建输入。归属用户/组织由调用方显式给出（创建不做归属校验）。
#[derive(Debug, Clone)]
pub struct DeviceCreate {
    pub user_id: Option<Uuid>,
    pub organization_id: Option<i64>,
    pub kind: String,
    pub name: Option<String>,
    pub metadata: Option<Value>,
    pub is_configured: bool,
    pub thing_uuid: Option<Uuid>,
    pub thing_secret: Option<Uuid>,
    pub parent_id: Option<i64>,
}

/// 标签记录（传感通道）。名称全局唯一。
///
/// `channel_uuid` 指向外部遥测平台中的 channel，仅存储。
#[derive(Debug, Clone)]
pub struct TagRecord {
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

/// 标签创建输入。归属用户由作用域仓库打戳。
#[derive(Debug, Clone)]
pub struct TagCreate {
    pub name: String,
    pub label: String,
    pub target: Option<i64>,
    pub unit: Option<String>,
    pub multiplier: Option<f64>,
    pub mask: Option<Value>,
    pub graphed: bool,
    pub channel_uuid: Option<Uuid>,
    pub device_id: Option<i64>,
}

/// 告警记录。名称全局唯一。
///
/// `check_external_id`/`check_message_template` 指向外部检查资源，仅存储。
#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub comparator: String,
    pub threshold: f64,
    /// 告警状态: enabled | disabled
    pub status: String,
    pub check_external_id: String,
    pub check_message_template: String,
    pub device_id: Option<i64>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 告警创建输入。归属用户由作用域仓库打戳。
#[derive(Debug, Clone)]
pub struct AlertCreate {
    pub name: String,
    pub comparator: String,
    pub threshold: f64,
    pub status: String,
    pub check_external_id: String,
    pub check_message_template: String,
    pub device_id: Option<i64>,
}

/// 通知记录。创建后不可变（审计轨迹）。
#[derive(Debug, Clone)]
pub struct NotificationRecord {
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

/// 通知创建输入。
#[derive(Debug, Clone)]
pub struct NotificationCreate {
    pub message: String,
    pub level: String,
    pub check_id: String,
    pub endpoint_id: String,
    pub rule_id: String,
    pub alert_id: Option<i64>,
    pub device_id: Option<i64>,
    pub user_id: Option<Uuid>,
}

/// 消息记录（遥测）。创建后不可变。
///
/// 语义字段采用 SenML 风格：base_* 为批次基准，name/unit/value/time
/// 为本条读数，string/bool/data/sum 为按类型的可选变体。
#[derive(Debug, Clone)]
pub struct MessageRecord {
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

/// 消息创建输入。归属外键（tag/device/user）由调用方解析后打戳。
#[derive(Debug, Clone)]
pub struct MessageCreate {
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

/// 动作记录。
#[derive(Debug, Clone)]
pub struct ActionRecord {
    pub id: i64,
    pub uuid: Uuid,
    pub device_id: i64,
    /// 动作状态: pending | completed | failed
    pub status: String,
    pub is_enabled: bool,
    pub values: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 动作创建输入。
#[derive(Debug, Clone)]
pub struct ActionCreate {
    pub device_id: i64,
    pub values: Vec<String>,
}
