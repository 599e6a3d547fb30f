//! 内存存储实现模块
//!
//! 仅用于本地演示和测试。
//!
//! 包含以下实现：
//! - 通用内存表：Table（通用仓库契约的内存实现）
//! - OrganizationStore: InMemoryOrganizationStore
//! - GroupStore: InMemoryGroupStore
//! - UserStore: InMemoryUserStore
//! - DeviceStore: InMemoryDeviceStore
//! - TagStore: InMemoryTagStore
//! - AlertStore: InMemoryAlertStore
//! - NotificationStore: InMemoryNotificationStore
//! - MessageStore: InMemoryMessageStore
//! - ActionStore: InMemoryActionStore
//!
//! 标签/告警/动作存储经 `InMemoryDeviceStore::devices` 共享同一张
//! 设备表，以便做设备链归属校验。

pub mod action;
pub mod alert;
pub mod device;
pub mod group;
pub mod message;
pub mod notification;
pub mod organization;
pub mod table;
pub mod tag;
pub mod user;

pub use action::*;
pub use alert::*;
pub use device::*;
pub use group::*;
pub use message::*;
pub use notification::*;
pub use organization::*;
pub use table::*;
pub use tag::*;
pub use user::*;
