//! 通用仓库抽象
//!
//! 所有实体共享的、与实体无关的 CRUD 契约。动态字段名查询
//! （按字符串反射列名）被每个实体的封闭过滤谓词枚举取代：
//! 过滤条件在编译期解析，非法字段名无法表达。
//!
//! - `Record`：参与通用仓库的记录形状（主键、过滤匹配、唯一性声明）
//! - `*Filter`：各实体的过滤谓词；`filter_is_unique` 对声明唯一的
//!   列返回 true，对应原 `get_by(unique=..)` 语义
//!
//! 统一空结果策略：仓库层对"无行"从不报错，只返回 `Option`/空 `Vec`；
//! 空结果是否意味着 NotFound 由各作用域仓库决定。
//!
//! 内存实现见 `in_memory::Table`；PostgreSQL 实现以每实体的
//! 静态参数化 SQL 表达同一契约。

use uuid::Uuid;

use crate::models::{
    ActionRecord, AlertRecord, DeviceRecord, GroupRecord, MessageRecord, NotificationRecord,
    OrganizationRecord, TagRecord,
};

/// 通用仓库可管理的记录形状。
pub trait Record: Clone + Send + Sync + 'static {
    /// 实体的封闭过滤谓词集合。
    type Filter: Clone + Send + Sync;

    /// 主键。
    fn id(&self) -> i64;

    /// 记录是否命中过滤谓词。
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// 谓词是否建立在声明唯一的列上（命中至多一条）。
    fn filter_is_unique(filter: &Self::Filter) -> bool;
}

/// 组织过滤谓词。
#[derive(Debug, Clone)]
pub enum OrganizationFilter {
    Id(i64),
    Name(String),
}

impl Record for OrganizationRecord {
    type Filter = OrganizationFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            OrganizationFilter::Id(id) => self.id == *id,
            OrganizationFilter::Name(name) => self.name == *name,
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, OrganizationFilter::Id(_) | OrganizationFilter::Name(_))
    }
}

/// 分组过滤谓词。
#[derive(Debug, Clone)]
pub enum GroupFilter {
    Id(i64),
    Name(String),
    Organization(i64),
}

impl Record for GroupRecord {
    type Filter = GroupFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            GroupFilter::Id(id) => self.id == *id,
            GroupFilter::Name(name) => self.name == *name,
            GroupFilter::Organization(id) => self.organization_id == Some(*id),
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, GroupFilter::Id(_) | GroupFilter::Name(_))
    }
}

/// 设备过滤谓词。设备名不唯一，只有 id/uuid 是唯一列。
#[derive(Debug, Clone)]
pub enum DeviceFilter {
    Id(i64),
    Uuid(Uuid),
    Owner(Uuid),
    Parent(i64),
}

impl Record for DeviceRecord {
    type Filter = DeviceFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            DeviceFilter::Id(id) => self.id == *id,
            DeviceFilter::Uuid(uuid) => self.uuid == *uuid,
            DeviceFilter::Owner(user_id) => self.user_id == Some(*user_id),
            DeviceFilter::Parent(id) => self.parent_id == Some(*id),
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, DeviceFilter::Id(_) | DeviceFilter::Uuid(_))
    }
}

/// 标签过滤谓词。
#[derive(Debug, Clone)]
pub enum TagFilter {
    Id(i64),
    Uuid(Uuid),
    Name(String),
    Owner(Uuid),
    Device(i64),
}

impl Record for TagRecord {
    type Filter = TagFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            TagFilter::Id(id) => self.id == *id,
            TagFilter::Uuid(uuid) => self.uuid == *uuid,
            TagFilter::Name(name) => self.name == *name,
            TagFilter::Owner(user_id) => self.user_id == *user_id,
            TagFilter::Device(id) => self.device_id == Some(*id),
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, TagFilter::Id(_) | TagFilter::Uuid(_) | TagFilter::Name(_))
    }
}

/// 告警过滤谓词。
#[derive(Debug, Clone)]
pub enum AlertFilter {
    Id(i64),
    Uuid(Uuid),
    Name(String),
    Owner(Uuid),
    Device(i64),
    Status(String),
}

impl Record for AlertRecord {
    type Filter = AlertFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            AlertFilter::Id(id) => self.id == *id,
            AlertFilter::Uuid(uuid) => self.uuid == *uuid,
            AlertFilter::Name(name) => self.name == *name,
            AlertFilter::Owner(user_id) => self.user_id == *user_id,
            AlertFilter::Device(id) => self.device_id == Some(*id),
            AlertFilter::Status(status) => self.status == *status,
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, AlertFilter::Id(_) | AlertFilter::Uuid(_) | AlertFilter::Name(_))
    }
}

/// 通知过滤谓词。
#[derive(Debug, Clone)]
pub enum NotificationFilter {
    Id(i64),
    Uuid(Uuid),
    Owner(Uuid),
    Device(i64),
    Alert(i64),
}

impl Record for NotificationRecord {
    type Filter = NotificationFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            NotificationFilter::Id(id) => self.id == *id,
            NotificationFilter::Uuid(uuid) => self.uuid == *uuid,
            NotificationFilter::Owner(user_id) => self.user_id == Some(*user_id),
            NotificationFilter::Device(id) => self.device_id == Some(*id),
            NotificationFilter::Alert(id) => self.alert_id == Some(*id),
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, NotificationFilter::Id(_) | NotificationFilter::Uuid(_))
    }
}

/// 消息过滤谓词。等值查询，无分页；归属校验由调用方先行完成。
#[derive(Debug, Clone)]
pub enum MessageFilter {
    Id(i64),
    Uuid(Uuid),
    Channel(String),
    Publisher(String),
    Device(i64),
    Tag(i64),
    Owner(Uuid),
}

impl Record for MessageRecord {
    type Filter = MessageFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            MessageFilter::Id(id) => self.id == *id,
            MessageFilter::Uuid(uuid) => self.uuid == *uuid,
            MessageFilter::Channel(channel_id) => self.channel_id == *channel_id,
            MessageFilter::Publisher(publisher) => self.publisher == *publisher,
            MessageFilter::Device(id) => self.device_id == Some(*id),
            MessageFilter::Tag(id) => self.tag_id == Some(*id),
            MessageFilter::Owner(user_id) => self.user_id == Some(*user_id),
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, MessageFilter::Id(_) | MessageFilter::Uuid(_))
    }
}

/// 动作过滤谓词。
#[derive(Debug, Clone)]
pub enum ActionFilter {
    Id(i64),
    Uuid(Uuid),
    Device(i64),
}

impl Record for ActionRecord {
    type Filter = ActionFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter {
            ActionFilter::Id(id) => self.id == *id,
            ActionFilter::Uuid(uuid) => self.uuid == *uuid,
            ActionFilter::Device(id) => self.device_id == *id,
        }
    }

    fn filter_is_unique(filter: &Self::Filter) -> bool {
        matches!(filter, ActionFilter::Id(_) | ActionFilter::Uuid(_))
    }
}
