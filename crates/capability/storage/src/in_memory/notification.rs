//! 通知内存存储实现
//!
//! 仅用于本地演示和测试。只追加：无更新/删除操作。

use async_trait::async_trait;
use domain::CallerContext;
use uuid::Uuid;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{NotificationCreate, NotificationRecord, Page};
use crate::repository::NotificationFilter;
use crate::traits::NotificationStore;

/// 通知内存存储
pub struct InMemoryNotificationStore {
    notifications: Table<NotificationRecord>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            notifications: Table::new(),
        }
    }
}

impl Default for InMemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn create_notification(
        &self,
        input: NotificationCreate,
    ) -> Result<NotificationRecord, StorageError> {
        Ok(self.notifications.insert(|id| NotificationRecord {
            id,
            uuid: Uuid::new_v4(),
            message: input.message.clone(),
            level: input.level.clone(),
            check_id: input.check_id.clone(),
            endpoint_id: input.endpoint_id.clone(),
            rule_id: input.rule_id.clone(),
            alert_id: input.alert_id,
            device_id: input.device_id,
            user_id: input.user_id,
        }))
    }

    /// 空结果按空列表返回（有意的宽松策略）。
    async fn list_notifications(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
        alert_id: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, StorageError> {
        Ok(self.notifications.read(|rows| {
            rows.find(&NotificationFilter::Owner(ctx.user_id))
                .into_iter()
                .filter(|item| device_id.is_none() || item.device_id == device_id)
                .filter(|item| alert_id.is_none() || item.alert_id == alert_id)
                .skip(page.offset.max(0) as usize)
                .take(page.limit.max(0) as usize)
                .collect()
        }))
    }
}
