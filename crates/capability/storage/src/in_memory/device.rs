//! 设备内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 设备 CRUD 操作与归属链校验
//! - 一次性认领（link）：检查与落库在同一写临界区内完成，
//!   关闭读后写竞争窗口

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain::CallerContext;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{DeviceCreate, DeviceRecord, Page};
use crate::repository::DeviceFilter;
use crate::traits::DeviceStore;
use crate::validation::ensure_owner;

/// 设备内存存储
///
/// 设备表以 `Arc` 共享：标签、告警、动作存储经由同一张表
/// 做设备链归属校验。
pub struct InMemoryDeviceStore {
    devices: Arc<Table<DeviceRecord>>,
}

impl InMemoryDeviceStore {
    pub fn new() -> Self {
        Self {
            devices: Arc::new(Table::new()),
        }
    }

    /// 共享设备表句柄，供依赖设备链的存储使用。
    pub fn devices(&self) -> Arc<Table<DeviceRecord>> {
        self.devices.clone()
    }
}

impl Default for InMemoryDeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceStore for InMemoryDeviceStore {
    /// 创建设备：不做唯一性与归属校验，归属外键照输入落库。
    async fn create_device(&self, input: DeviceCreate) -> Result<DeviceRecord, StorageError> {
        let now = Utc::now();
        Ok(self.devices.insert(|id| DeviceRecord {
            id,
            uuid: Uuid::new_v4(),
            name: input.name.clone(),
            kind: input.kind.clone(),
            metadata: input.metadata.clone(),
            is_configured: input.is_configured,
            thing_uuid: input.thing_uuid,
            thing_secret: input.thing_secret,
            parent_id: input.parent_id,
            user_id: input.user_id,
            organization_id: input.organization_id,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn get_device(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<DeviceRecord, StorageError> {
        let device = self
            .devices
            .get(device_id)
            .ok_or_else(|| StorageError::not_found("Device Not Found."))?;
        ensure_owner(device.user_id, ctx)?;
        Ok(device)
    }

    async fn list_devices(
        &self,
        ctx: &CallerContext,
        page: Page,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        let devices: Vec<DeviceRecord> = self.devices.read(|rows| {
            rows.find(&DeviceFilter::Owner(ctx.user_id))
                .into_iter()
                .skip(page.offset.max(0) as usize)
                .take(page.limit.max(0) as usize)
                .collect()
        });
        if devices.is_empty() {
            return Err(StorageError::not_found("No Devices Found."));
        }
        Ok(devices)
    }

    async fn update_metadata(
        &self,
        ctx: &CallerContext,
        device_id: i64,
        metadata: Value,
    ) -> Result<DeviceRecord, StorageError> {
        self.devices.write(|rows| {
            let device = rows
                .get(device_id)
                .ok_or_else(|| StorageError::not_found("Device not found"))?;
            ensure_owner(device.user_id, ctx)?;
            // 整体替换，不做合并
            rows.update(device_id, |record| {
                record.metadata = Some(metadata);
                record.updated_at = Utc::now();
            })
            .ok_or_else(|| StorageError::not_found("Device not found"))
        })
    }

    /// 一次性认领：user_id 仅允许从空设置一次。
    async fn link_to_user(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<DeviceRecord, StorageError> {
        self.devices.write(|rows| {
            let device = rows
                .get(device_id)
                .ok_or_else(|| StorageError::not_found("Device not found"))?;
            if device.user_id.is_some() {
                return Err(StorageError::permission_denied(
                    "Device already linked to a user.",
                ));
            }
            rows.update(device_id, |record| {
                record.user_id = Some(ctx.user_id);
                record.updated_at = Utc::now();
            })
            .ok_or_else(|| StorageError::not_found("Device not found"))
        })
    }

    async fn delete_device(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<(), StorageError> {
        self.devices.write(|rows| {
            let device = rows
                .get(device_id)
                .ok_or_else(|| StorageError::not_found("Device not found"))?;
            ensure_owner(device.user_id, ctx)?;
            rows.remove(device_id);
            Ok(())
        })
    }
}
