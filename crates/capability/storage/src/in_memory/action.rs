//! 动作内存存储实现
//!
//! 仅用于本地演示和测试。
//! 所有操作经 device_id → device.user_id 链做用户作用域。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain::{ActionState, CallerContext};
use uuid::Uuid;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{ActionCreate, ActionRecord, DeviceRecord};
use crate::traits::ActionStore;
use crate::validation::ensure_owner;

/// 动作内存存储
pub struct InMemoryActionStore {
    actions: Table<ActionRecord>,
    devices: Arc<Table<DeviceRecord>>,
}

impl InMemoryActionStore {
    /// 创建动作存储；设备表来自 `InMemoryDeviceStore::devices`。
    pub fn new(devices: Arc<Table<DeviceRecord>>) -> Self {
        Self {
            actions: Table::new(),
            devices,
        }
    }

    /// 设备链归属校验。
    fn ensure_device_chain(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<(), StorageError> {
        let owner = self.devices.get(device_id).and_then(|device| device.user_id);
        ensure_owner(owner, ctx)
    }
}

#[async_trait]
impl ActionStore for InMemoryActionStore {
    async fn create_action(
        &self,
        ctx: &CallerContext,
        input: ActionCreate,
    ) -> Result<ActionRecord, StorageError> {
        let device = self
            .devices
            .get(input.device_id)
            .ok_or_else(|| StorageError::not_found("Device Not Found."))?;
        ensure_owner(device.user_id, ctx)?;
        let now = Utc::now();
        Ok(self.actions.insert(|id| ActionRecord {
            id,
            uuid: Uuid::new_v4(),
            device_id: input.device_id,
            status: ActionState::Pending.as_str().to_string(),
            is_enabled: true,
            values: input.values.clone(),
            created_at: now,
            updated_at: now,
        }))
    }

    async fn get_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError> {
        let action = self
            .actions
            .get(action_id)
            .ok_or_else(|| StorageError::not_found("Action not found"))?;
        self.ensure_device_chain(ctx, action.device_id)?;
        Ok(action)
    }

    async fn toggle_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError> {
        self.actions.write(|rows| {
            let action = rows
                .get(action_id)
                .ok_or_else(|| StorageError::not_found("Action not found"))?;
            let device_id = action.device_id;
            self.ensure_device_chain(ctx, device_id)?;
            rows.update(action_id, |record| {
                record.is_enabled = !record.is_enabled;
                record.updated_at = Utc::now();
            })
            .ok_or_else(|| StorageError::not_found("Action not found"))
        })
    }

    async fn delete_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<(), StorageError> {
        self.actions.write(|rows| {
            let action = rows
                .get(action_id)
                .ok_or_else(|| StorageError::not_found("Action not found"))?;
            self.ensure_device_chain(ctx, action.device_id)?;
            rows.remove(action_id);
            Ok(())
        })
    }
}
