//! 组织内存存储实现
//!
//! 仅用于本地演示和测试。

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{OrganizationRecord, Page};
use crate::repository::OrganizationFilter;
use crate::traits::OrganizationStore;

/// 组织内存存储
pub struct InMemoryOrganizationStore {
    organizations: Table<OrganizationRecord>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self {
            organizations: Table::new(),
        }
    }
}

impl Default for InMemoryOrganizationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrganizationStore for InMemoryOrganizationStore {
    /// 创建组织：名称唯一性检查与插入在同一写临界区内完成。
    async fn create_organization(&self, name: &str) -> Result<OrganizationRecord, StorageError> {
        self.organizations.write(|rows| {
            if rows
                .find_one(&OrganizationFilter::Name(name.to_string()))
                .is_some()
            {
                return Err(StorageError::bad_request(
                    "Organization name must be unique",
                ));
            }
            let now = Utc::now();
            Ok(rows.insert(|id| OrganizationRecord {
                id,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            }))
        })
    }

    async fn get_organization(
        &self,
        organization_id: i64,
    ) -> Result<Option<OrganizationRecord>, StorageError> {
        Ok(self.organizations.get(organization_id))
    }

    async fn list_organizations(
        &self,
        page: Page,
    ) -> Result<Vec<OrganizationRecord>, StorageError> {
        Ok(self.organizations.list(page))
    }

    async fn update_organization(
        &self,
        organization_id: i64,
        name: &str,
    ) -> Result<Option<OrganizationRecord>, StorageError> {
        Ok(self.organizations.update(organization_id, |record| {
            record.name = name.to_string();
            record.updated_at = Utc::now();
        }))
    }

    async fn delete_organization(
        &self,
        organization_id: i64,
    ) -> Result<Option<OrganizationRecord>, StorageError> {
        Ok(self.organizations.remove(organization_id))
    }
}
