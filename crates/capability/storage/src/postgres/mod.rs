//! # PostgreSQL 存储实现模块
//!
//! 本模块提供所有存储接口的 PostgreSQL 实现，用于生产环境。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 查询使用参数绑定，防止 SQL 注入攻击
//! 2. **归属链过滤**：用户作用域查询显式包含 `user_id` 条件，
//!    设备链作用域（动作）通过与 `devices` 的 join 取得归属
//! 3. **条件更新**：一次性认领与幂等启停用 `update ... where` 形式
//!    落库，由数据库裁决并发竞争
//! 4. **事务**：批量创建包在单个事务内，失败整体回滚
//! 5. **连接池管理**：使用连接池复用数据库连接
//!
//! ## 包含的实现
//!
//! - **OrganizationStore** (`organization.rs`)：组织存储
//! - **GroupStore** (`group.rs`)：分组存储
//! - **UserStore** (`user.rs`)：用户存储，支持注册与 refresh jti 绑定
//! - **DeviceStore** (`device.rs`)：设备存储，含一次性认领
//! - **TagStore** (`tag.rs`)：标签存储，含批量创建/删除
//! - **AlertStore** (`alert.rs`)：告警存储，含幂等启停
//! - **NotificationStore** (`notification.rs`)：通知存储（只追加）
//! - **MessageStore** (`message.rs`)：消息存储（只追加）
//! - **ActionStore** (`action.rs`)：动作存储（设备链作用域）
//!
//! ## 数据库模式要求
//!
//! 迁移脚本由外部维护。本模块依赖以下数据库表：
//!
//! - `organizations`：组织表（id, name unique, created_at, updated_at）
//! - `groups`：分组表（id, name unique, organization_id, created_at, updated_at）
//! - `users`：用户表（id uuid, email unique, password_hash, is_active,
//!   organization_id, group_id, refresh_jti, created_at, updated_at）
//! - `devices`：设备表（id, uuid unique, name, kind, metadata jsonb,
//!   is_configured, thing_uuid, thing_secret, parent_id, user_id,
//!   organization_id, created_at, updated_at）
//! - `tags`：标签表（id, uuid unique, name unique, label, target, unit,
//!   multiplier, mask jsonb, graphed, channel_uuid, user_id, device_id,
//!   created_at, updated_at）
//! - `alerts`：告警表（id, uuid unique, name unique, comparator, threshold,
//!   status, check_external_id, check_message_template, device_id, user_id,
//!   created_at, updated_at）
//! - `notifications`：通知表（id, uuid unique, message, level, check_id,
//!   endpoint_id, rule_id, alert_id, device_id, user_id）
//! - `messages`：消息表（id, uuid unique, channel_id, publisher, protocol,
//!   subtopic, base_name, base_unit, base_value, base_time, name, unit,
//!   value, time, string_value, bool_value, data_value, sum_value,
//!   device_id, tag_id, user_id）
//! - `actions`：动作表（id, uuid unique, device_id, status, is_enabled,
//!   "values" text[], created_at, updated_at）
//!
//! ## 索引
//!
//! - `idx_devices_user`：(user_id)
//! - `idx_tags_user`：(user_id)、`idx_tags_device`：(device_id)
//! - `idx_alerts_user`：(user_id)、`idx_alerts_device`：(device_id)
//! - `idx_notifications_user`：(user_id)
//! - `idx_messages_tag`：(tag_id)、`idx_messages_device`：(device_id)
//!
//! ## 错误处理
//!
//! 所有存储操作返回 `Result<T, StorageError>`；`sqlx::Error`
//! 自动转换为 `StorageError::Database`。"无行"不在本层报错，
//! 由作用域逻辑决定空结果的含义。

// 导出各个 PostgreSQL 存储实现
pub mod action;
pub mod alert;
pub mod device;
pub mod group;
pub mod message;
pub mod notification;
pub mod organization;
pub mod tag;
pub mod user;

// 导出到 crate 根目录，方便外部引用
pub use action::*;
pub use alert::*;
pub use device::*;
pub use group::*;
pub use message::*;
pub use notification::*;
pub use organization::*;
pub use tag::*;
pub use user::*;
