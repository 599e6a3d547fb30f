//! 标签内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 标签 CRUD 操作与归属链校验
//! - 批量创建：先全量校验再统一落库（原子）
//! - 批量删除：只删归属调用方的行，并披露实际删除条数

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain::CallerContext;
use uuid::Uuid;

use crate::error::StorageError;
use crate::in_memory::table::{Rows, Table};
use crate::models::{DeviceRecord, Page, TagCreate, TagRecord};
use crate::repository::TagFilter;
use crate::traits::TagStore;
use crate::validation::{ensure_owner, ensure_owner_with};

/// 标签内存存储
pub struct InMemoryTagStore {
    tags: Table<TagRecord>,
    devices: Arc<Table<DeviceRecord>>,
}

impl InMemoryTagStore {
    /// 创建标签存储；设备表来自 `InMemoryDeviceStore::devices`。
    pub fn new(devices: Arc<Table<DeviceRecord>>) -> Self {
        Self {
            tags: Table::new(),
            devices,
        }
    }

    /// 单条创建前置校验：设备归属 + 名称唯一。
    fn guard_create(
        &self,
        rows: &Rows<TagRecord>,
        ctx: &CallerContext,
        input: &TagCreate,
    ) -> Result<(), StorageError> {
        // 目标设备存在且归属他人时拒绝；设备缺失不拦截（与删除级联解耦）
        if let Some(device_id) = input.device_id {
            if let Some(device) = self.devices.get(device_id) {
                if device.user_id != Some(ctx.user_id) {
                    return Err(StorageError::permission_denied(
                        "User does not have permission to add a tag to this device.",
                    ));
                }
            }
        }
        if rows
            .find_one(&TagFilter::Name(input.name.clone()))
            .is_some()
        {
            return Err(StorageError::bad_request("Tag name must be unique."));
        }
        Ok(())
    }

    fn build(id: i64, ctx: &CallerContext, input: &TagCreate) -> TagRecord {
        let now = Utc::now();
        TagRecord {
            id,
            uuid: Uuid::new_v4(),
            name: input.name.clone(),
            label: input.label.clone(),
            target: input.target,
            unit: input.unit.clone(),
            multiplier: input.multiplier,
            mask: input.mask.clone(),
            graphed: input.graphed,
            channel_uuid: input.channel_uuid,
            user_id: ctx.user_id,
            device_id: input.device_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn create_tag(
        &self,
        ctx: &CallerContext,
        input: TagCreate,
    ) -> Result<TagRecord, StorageError> {
        self.tags.write(|rows| {
            self.guard_create(rows, ctx, &input)?;
            Ok(rows.insert(|id| Self::build(id, ctx, &input)))
        })
    }

    /// 批量创建：任一校验失败则全部不落库。
    async fn create_tags(
        &self,
        ctx: &CallerContext,
        inputs: Vec<TagCreate>,
    ) -> Result<Vec<TagRecord>, StorageError> {
        self.tags.write(|rows| {
            let mut batch_names: HashSet<&str> = HashSet::new();
            for input in &inputs {
                self.guard_create(rows, ctx, input)?;
                if !batch_names.insert(input.name.as_str()) {
                    return Err(StorageError::bad_request("Tag name must be unique."));
                }
            }
            Ok(inputs
                .iter()
                .map(|input| rows.insert(|id| Self::build(id, ctx, input)))
                .collect())
        })
    }

    async fn get_tag(&self, ctx: &CallerContext, tag_id: i64) -> Result<TagRecord, StorageError> {
        let tag = self
            .tags
            .get(tag_id)
            .ok_or_else(|| StorageError::not_found("Tag Not Found."))?;
        ensure_owner(Some(tag.user_id), ctx)?;
        Ok(tag)
    }

    async fn list_tags(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
    ) -> Result<Vec<TagRecord>, StorageError> {
        if let Some(device_id) = device_id {
            let owner = self.devices.get(device_id).and_then(|device| device.user_id);
            ensure_owner_with(
                owner,
                ctx,
                "You do not have permission to access this device's tags.",
            )?;
        }
        let tags: Vec<TagRecord> = self.tags.read(|rows| {
            rows.find(&TagFilter::Owner(ctx.user_id))
                .into_iter()
                .filter(|tag| device_id.is_none() || tag.device_id == device_id)
                .skip(page.offset.max(0) as usize)
                .take(page.limit.max(0) as usize)
                .collect()
        });
        if tags.is_empty() {
            return Err(StorageError::not_found("There are no Tags for this device."));
        }
        Ok(tags)
    }

    async fn set_graphed(
        &self,
        ctx: &CallerContext,
        tag_id: i64,
        graphed: bool,
    ) -> Result<TagRecord, StorageError> {
        self.tags.write(|rows| {
            let tag = rows
                .get(tag_id)
                .ok_or_else(|| StorageError::not_found("Tag Not Found."))?;
            ensure_owner(Some(tag.user_id), ctx)?;
            rows.update(tag_id, |record| {
                record.graphed = graphed;
                record.updated_at = Utc::now();
            })
            .ok_or_else(|| StorageError::not_found("Tag Not Found."))
        })
    }

    async fn delete_tag(&self, ctx: &CallerContext, tag_id: i64) -> Result<(), StorageError> {
        self.tags.write(|rows| {
            let tag = rows
                .get(tag_id)
                .ok_or_else(|| StorageError::not_found("Tag not found"))?;
            ensure_owner(Some(tag.user_id), ctx)?;
            rows.remove(tag_id);
            Ok(())
        })
    }

    /// 批量删除：删除数与请求数不符时报 PartialDelete，已删行不回滚。
    async fn delete_tags(
        &self,
        ctx: &CallerContext,
        tag_ids: &[i64],
    ) -> Result<usize, StorageError> {
        self.tags.write(|rows| {
            let deleted = rows.remove_owned(tag_ids, |tag| tag.user_id == ctx.user_id);
            if deleted != tag_ids.len() {
                return Err(StorageError::PartialDelete {
                    requested: tag_ids.len(),
                    deleted,
                });
            }
            Ok(deleted)
        })
    }
}
