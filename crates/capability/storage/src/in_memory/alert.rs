//! 告警内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 告警 CRUD 操作与归属链校验
//! - 启停迁移的幂等防护：目标态比较与落库在同一写临界区内完成

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain::{AlertState, CallerContext};
use uuid::Uuid;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{AlertCreate, AlertRecord, DeviceRecord, Page};
use crate::repository::AlertFilter;
use crate::traits::AlertStore;
use crate::validation::{ensure_owner, ensure_owner_with};

/// 告警内存存储
pub struct InMemoryAlertStore {
    alerts: Table<AlertRecord>,
    devices: Arc<Table<DeviceRecord>>,
}

impl InMemoryAlertStore {
    /// 创建告警存储；设备表来自 `InMemoryDeviceStore::devices`。
    pub fn new(devices: Arc<Table<DeviceRecord>>) -> Self {
        Self {
            alerts: Table::new(),
            devices,
        }
    }

    /// 状态迁移公共路径：NotFound → 归属 → 目标态幂等防护。
    fn transition(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
        target: AlertState,
    ) -> Result<AlertRecord, StorageError> {
        self.alerts.write(|rows| {
            let alert = rows
                .get(alert_id)
                .ok_or_else(|| StorageError::not_found("Alert not found."))?;
            ensure_owner(Some(alert.user_id), ctx)?;
            if alert.status == target.as_str() {
                return Err(StorageError::conflict(format!(
                    "Alert is already {target}."
                )));
            }
            rows.update(alert_id, |record| {
                record.status = target.as_str().to_string();
                record.updated_at = Utc::now();
            })
            .ok_or_else(|| StorageError::not_found("Alert not found."))
        })
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    /// 创建告警：名称唯一性检查与插入在同一写临界区内完成。
    async fn create_alert(
        &self,
        ctx: &CallerContext,
        input: AlertCreate,
    ) -> Result<AlertRecord, StorageError> {
        self.alerts.write(|rows| {
            if rows
                .find_one(&AlertFilter::Name(input.name.clone()))
                .is_some()
            {
                return Err(StorageError::bad_request("Alert name must be unique."));
            }
            let now = Utc::now();
            Ok(rows.insert(|id| AlertRecord {
                id,
                uuid: Uuid::new_v4(),
                name: input.name.clone(),
                comparator: input.comparator.clone(),
                threshold: input.threshold,
                status: input.status.clone(),
                check_external_id: input.check_external_id.clone(),
                check_message_template: input.check_message_template.clone(),
                device_id: input.device_id,
                user_id: ctx.user_id,
                created_at: now,
                updated_at: now,
            }))
        })
    }

    /// 缺失与归属他人统一报 PermissionDenied（检查顺序有意反转）。
    async fn get_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError> {
        let alert = self.alerts.get(alert_id);
        match alert {
            Some(alert) if alert.user_id == ctx.user_id => Ok(alert),
            _ => Err(StorageError::permission_denied(
                "User does not have permission to access this data.",
            )),
        }
    }

    async fn list_alerts(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
    ) -> Result<Vec<AlertRecord>, StorageError> {
        if let Some(device_id) = device_id {
            let owner = self.devices.get(device_id).and_then(|device| device.user_id);
            ensure_owner_with(
                owner,
                ctx,
                "You do not have permission to access this device's alerts.",
            )?;
        }
        let alerts: Vec<AlertRecord> = self.alerts.read(|rows| {
            rows.find(&AlertFilter::Owner(ctx.user_id))
                .into_iter()
                .filter(|alert| device_id.is_none() || alert.device_id == device_id)
                .skip(page.offset.max(0) as usize)
                .take(page.limit.max(0) as usize)
                .collect()
        });
        if alerts.is_empty() {
            return Err(StorageError::not_found(
                "There are no Alerts for this device.",
            ));
        }
        Ok(alerts)
    }

    async fn enable_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError> {
        self.transition(ctx, alert_id, AlertState::Enabled)
    }

    async fn disable_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError> {
        self.transition(ctx, alert_id, AlertState::Disabled)
    }

    async fn delete_alert(&self, ctx: &CallerContext, alert_id: i64) -> Result<(), StorageError> {
        self.alerts.write(|rows| {
            let alert = rows
                .get(alert_id)
                .ok_or_else(|| StorageError::not_found("Alert not found."))?;
            ensure_owner(Some(alert.user_id), ctx)?;
            rows.remove(alert_id);
            Ok(())
        })
    }
}
