//! 存储接口 Trait 定义
//!
//! 定义所有实体作用域仓库的异步接口：
//! - OrganizationStore：组织存储（管理面，无归属作用域）
//! - GroupStore：分组存储（管理面，无归属作用域）
//! - UserStore：用户存储（认证能力使用）
//! - DeviceStore：设备存储
//! - TagStore：标签存储
//! - AlertStore：告警存储
//! - NotificationStore：通知存储（只追加）
//! - MessageStore：消息存储（只追加）
//! - ActionStore：动作存储（经设备链做用户作用域）
//!
//! 设计原则：
//! - 用户作用域操作显式接收 CallerContext
//! - 所有接口返回 StorageError；NotFound 与 PermissionDenied 的
//!   检查顺序按操作固定（见各方法注释）
//! - 使用 async_trait 支持动态分发

use async_trait::async_trait;
use domain::CallerContext;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{
    ActionCreate, ActionRecord, AlertCreate, AlertRecord, DeviceCreate, DeviceRecord, GroupRecord,
    MessageCreate, MessageRecord, NotificationCreate, NotificationRecord, OrganizationRecord,
    Page, TagCreate, TagRecord, UserCreate, UserRecord,
};
use crate::repository::MessageFilter;

/// 组织存储接口
///
/// 管理面实体：按 id 操作，不做用户归属作用域。
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// 创建组织；名称重复返回 BadRequest。
    async fn create_organization(&self, name: &str) -> Result<OrganizationRecord, StorageError>;

    /// 按 id 查找组织。
    async fn get_organization(
        &self,
        organization_id: i64,
    ) -> Result<Option<OrganizationRecord>, StorageError>;

    /// 分页列出组织。
    async fn list_organizations(&self, page: Page) -> Result<Vec<OrganizationRecord>, StorageError>;

    /// 更新组织名称；不存在返回 None。
    async fn update_organization(
        &self,
        organization_id: i64,
        name: &str,
    ) -> Result<Option<OrganizationRecord>, StorageError>;

    /// 删除组织，返回被删除的快照；不存在返回 None。
    async fn delete_organization(
        &self,
        organization_id: i64,
    ) -> Result<Option<OrganizationRecord>, StorageError>;
}

/// 分组存储接口
///
/// 管理面实体：按 id 操作，不做用户归属作用域。
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// 创建分组；名称重复返回 BadRequest。
    async fn create_group(
        &self,
        name: &str,
        organization_id: Option<i64>,
    ) -> Result<GroupRecord, StorageError>;

    /// 分页列出分组。
    async fn list_groups(&self, page: Page) -> Result<Vec<GroupRecord>, StorageError>;

    /// 更新分组名称；不存在返回 None。
    async fn update_group(
        &self,
        group_id: i64,
        name: &str,
    ) -> Result<Option<GroupRecord>, StorageError>;

    /// 删除分组，返回被删除的快照；不存在返回 None。
    async fn delete_group(&self, group_id: i64) -> Result<Option<GroupRecord>, StorageError>;
}

/// 用户存储接口
///
/// 供认证能力使用（禁止在 handler 中直接连 SQL）。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 创建用户；邮箱重复返回 BadRequest。
    async fn create_user(&self, input: UserCreate) -> Result<UserRecord, StorageError>;

    /// 按主键查找用户。
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StorageError>;

    /// 按邮箱查找用户。
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 更新口令哈希（旧格式哈希升级用）。返回是否有行被更新。
    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, StorageError>;

    /// 绑定/清除当前有效的 refresh token jti。返回是否有行被更新。
    async fn set_refresh_jti(
        &self,
        user_id: Uuid,
        jti: Option<&str>,
    ) -> Result<bool, StorageError>;

    /// 读取当前绑定的 refresh token jti。
    async fn get_refresh_jti(&self, user_id: Uuid) -> Result<Option<String>, StorageError>;
}

/// 设备存储接口
///
/// 除创建外的所有操作都做归属链校验。
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// 创建设备。不做唯一性与归属校验，归属外键由输入显式给出。
    async fn create_device(&self, input: DeviceCreate) -> Result<DeviceRecord, StorageError>;

    /// 按 id 获取设备。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn get_device(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<DeviceRecord, StorageError>;

    /// 分页列出调用方的设备。结果为空 → NotFound。
    async fn list_devices(
        &self,
        ctx: &CallerContext,
        page: Page,
    ) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 整体替换设备 metadata（不做合并）。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn update_metadata(
        &self,
        ctx: &CallerContext,
        device_id: i64,
        metadata: Value,
    ) -> Result<DeviceRecord, StorageError>;

    /// 将设备认领到调用方名下（一次性：user_id 仅允许从空设置一次）。
    /// 缺失 → NotFound；已被认领（无论归属谁）→ PermissionDenied。
    async fn link_to_user(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<DeviceRecord, StorageError>;

    /// 删除设备。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn delete_device(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<(), StorageError>;
}

/// 标签存储接口
#[async_trait]
pub trait TagStore: Send + Sync {
    /// 创建标签，归属调用方。目标设备存在且归属他人 → PermissionDenied；
    /// 名称重复 → BadRequest。
    async fn create_tag(
        &self,
        ctx: &CallerContext,
        input: TagCreate,
    ) -> Result<TagRecord, StorageError>;

    /// 批量创建标签。原子：任一校验失败则全部不落库。
    async fn create_tags(
        &self,
        ctx: &CallerContext,
        inputs: Vec<TagCreate>,
    ) -> Result<Vec<TagRecord>, StorageError>;

    /// 按 id 获取标签。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn get_tag(&self, ctx: &CallerContext, tag_id: i64) -> Result<TagRecord, StorageError>;

    /// 分页列出调用方的标签，可按设备过滤。
    /// 过滤设备缺失或归属他人 → PermissionDenied；结果为空 → NotFound。
    async fn list_tags(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
    ) -> Result<Vec<TagRecord>, StorageError>;

    /// 更新 graphed 标志。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn set_graphed(
        &self,
        ctx: &CallerContext,
        tag_id: i64,
        graphed: bool,
    ) -> Result<TagRecord, StorageError>;

    /// 删除标签。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn delete_tag(&self, ctx: &CallerContext, tag_id: i64) -> Result<(), StorageError>;

    /// 批量删除：只删除同时命中 id 集与调用方归属的行；
    /// 删除数与请求数不符 → PartialDelete（披露实际删除条数）。
    async fn delete_tags(
        &self,
        ctx: &CallerContext,
        tag_ids: &[i64],
    ) -> Result<usize, StorageError>;
}

/// 告警存储接口
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// 创建告警，归属调用方；名称重复 → BadRequest。
    async fn create_alert(
        &self,
        ctx: &CallerContext,
        input: AlertCreate,
    ) -> Result<AlertRecord, StorageError>;

    /// 按 id 获取告警。缺失或归属他人 → PermissionDenied
    /// （此操作的检查顺序有意与其他实体相反）。
    async fn get_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError>;

    /// 分页列出调用方的告警，可按设备过滤。
    /// 过滤设备缺失或归属他人 → PermissionDenied；结果为空 → NotFound。
    async fn list_alerts(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
    ) -> Result<Vec<AlertRecord>, StorageError>;

    /// 启用告警。缺失 → NotFound；归属他人 → PermissionDenied；
    /// 已处于启用态 → Conflict。
    async fn enable_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError>;

    /// 停用告警。检查顺序同 enable_alert。
    async fn disable_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError>;

    /// 删除告警。缺失 → NotFound；归属他人 → PermissionDenied。
    async fn delete_alert(&self, ctx: &CallerContext, alert_id: i64) -> Result<(), StorageError>;
}

/// 通知存储接口（只追加，不可变审计轨迹）
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// 追加一条通知。
    async fn create_notification(
        &self,
        input: NotificationCreate,
    ) -> Result<NotificationRecord, StorageError>;

    /// 分页列出调用方的通知，可叠加设备/告警等值过滤。
    /// 空结果按空列表返回（有意的宽松策略）。
    async fn list_notifications(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
        alert_id: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, StorageError>;
}

/// 消息存储接口（只追加）
///
/// 本层不做归属校验：调用方必须先解析 tag/device 完成归属检查，
/// 再以解析出的外键打戳创建/查询。
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// 追加一条消息。
    async fn create_message(&self, input: MessageCreate) -> Result<MessageRecord, StorageError>;

    /// 按类型化谓词做等值查询，无分页，空结果返回空列表。
    async fn list_messages(
        &self,
        filter: MessageFilter,
    ) -> Result<Vec<MessageRecord>, StorageError>;
}

/// 动作存储接口
///
/// 动作经 device_id → device.user_id 链做用户作用域。
#[async_trait]
pub trait ActionStore: Send + Sync {
    /// 创建动作。目标设备缺失 → NotFound；归属他人 → PermissionDenied。
    async fn create_action(
        &self,
        ctx: &CallerContext,
        input: ActionCreate,
    ) -> Result<ActionRecord, StorageError>;

    /// 按 id 获取动作。缺失 → NotFound；设备链归属他人 → PermissionDenied。
    async fn get_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError>;

    /// 翻转 is_enabled。缺失 → NotFound；设备链归属他人 → PermissionDenied。
    async fn toggle_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError>;

    /// 删除动作。缺失 → NotFound；设备链归属他人 → PermissionDenied。
    async fn delete_action(&self, ctx: &CallerContext, action_id: i64)
        -> Result<(), StorageError>;
}
