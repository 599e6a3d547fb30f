//! 分组内存存储实现
//!
//! 仅用于本地演示和测试。

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{GroupRecord, Page};
use crate::repository::GroupFilter;
use crate::traits::GroupStore;

/// 分组内存存储
pub struct InMemoryGroupStore {
    groups: Table<GroupRecord>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self {
            groups: Table::new(),
        }
    }
}

impl Default for InMemoryGroupStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    /// 创建分组：名称唯一性检查与插入在同一写临界区内完成。
    async fn create_group(
        &self,
        name: &str,
        organization_id: Option<i64>,
    ) -> Result<GroupRecord, StorageError> {
        self.groups.write(|rows| {
            if rows.find_one(&GroupFilter::Name(name.to_string())).is_some() {
                return Err(StorageError::bad_request("Group name must be unique."));
            }
            let now = Utc::now();
            Ok(rows.insert(|id| GroupRecord {
                id,
                name: name.to_string(),
                organization_id,
                created_at: now,
                updated_at: now,
            }))
        })
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<GroupRecord>, StorageError> {
        Ok(self.groups.list(page))
    }

    async fn update_group(
        &self,
        group_id: i64,
        name: &str,
    ) -> Result<Option<GroupRecord>, StorageError> {
        Ok(self.groups.update(group_id, |record| {
            record.name = name.to_string();
            record.updated_at = Utc::now();
        }))
    }

    async fn delete_group(&self, group_id: i64) -> Result<Option<GroupRecord>, StorageError> {
        Ok(self.groups.remove(group_id))
    }
}
