//! Postgres 告警存储实现
//!
//! 设计要点：
//! - 启停迁移先读行分类 NotFound/归属错误，再以条件更新
//!   （`where status <> 目标态`）作为事实裁决，未命中即 Conflict，
//!   并发重复迁移由数据库裁决
//! - get 的缺失与归属他人统一报 PermissionDenied（检查顺序有意反转）

use domain::{AlertState, CallerContext};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{AlertCreate, AlertRecord, Page};
use crate::traits::AlertStore;
use crate::validation::{ensure_owner, ensure_owner_with};

const COLUMNS: &str =
    "id, uuid, name, comparator, threshold, status, check_external_id, \
     check_message_template, device_id, user_id, created_at, updated_at";

fn row_to_alert(row: &PgRow) -> Result<AlertRecord, sqlx::Error> {
    Ok(AlertRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        comparator: row.try_get("comparator")?,
        threshold: row.try_get("threshold")?,
        status: row.try_get("status")?,
        check_external_id: row.try_get("check_external_id")?,
        check_message_template: row.try_get("check_message_template")?,
        device_id: row.try_get("device_id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PgAlertStore {
    pub pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 状态迁移公共路径：NotFound → 归属 → 条件更新裁决 Conflict。
    async fn transition(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
        target: AlertState,
    ) -> Result<AlertRecord, StorageError> {
        let row = sqlx::query("select user_id from alerts where id = $1")
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Alert not found."))?;
        ensure_owner(Some(row.try_get("user_id")?), ctx)?;
        let updated = sqlx::query(&format!(
            "update alerts set status = $1, updated_at = now() \
             where id = $2 and status <> $1 returning {COLUMNS}"
        ))
        .bind(target.as_str())
        .bind(alert_id)
        .fetch_optional(&self.pool)
        .await?;
        match updated {
            Some(row) => Ok(row_to_alert(&row)?),
            None => Err(StorageError::conflict(format!("Alert is already {target}."))),
        }
    }
}

#[async_trait::async_trait]
impl AlertStore for PgAlertStore {
    async fn create_alert(
        &self,
        ctx: &CallerContext,
        input: AlertCreate,
    ) -> Result<AlertRecord, StorageError> {
        let exists = sqlx::query("select 1 from alerts where name = $1")
            .bind(&input.name)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(StorageError::bad_request("Alert name must be unique."));
        }
        let row = sqlx::query(&format!(
            "insert into alerts (uuid, name, comparator, threshold, status, \
             check_external_id, check_message_template, device_id, user_id, \
             created_at, updated_at) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), now()) \
             returning {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.comparator)
        .bind(input.threshold)
        .bind(&input.status)
        .bind(&input.check_external_id)
        .bind(&input.check_message_template)
        .bind(input.device_id)
        .bind(ctx.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_alert(&row)?)
    }

    async fn get_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError> {
        let row = sqlx::query(&format!("select {COLUMNS} from alerts where id = $1"))
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                let alert = row_to_alert(&row)?;
                if alert.user_id != ctx.user_id {
                    return Err(StorageError::permission_denied(
                        "User does not have permission to access this data.",
                    ));
                }
                Ok(alert)
            }
            None => Err(StorageError::permission_denied(
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
        let rows = match device_id {
            Some(device_id) => {
                let device = sqlx::query("select user_id from devices where id = $1")
                    .bind(device_id)
                    .fetch_optional(&self.pool)
                    .await?;
                let owner: Option<Uuid> = match device {
                    Some(row) => row.try_get("user_id")?,
                    None => None,
                };
                ensure_owner_with(
                    owner,
                    ctx,
                    "You do not have permission to access this device's alerts.",
                )?;
                sqlx::query(&format!(
                    "select {COLUMNS} from alerts where user_id = $1 and device_id = $2 \
                     order by id limit $3 offset $4"
                ))
                .bind(ctx.user_id)
                .bind(device_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "select {COLUMNS} from alerts where user_id = $1 \
                     order by id limit $2 offset $3"
                ))
                .bind(ctx.user_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
        };
        if rows.is_empty() {
            return Err(StorageError::not_found(
                "There are no Alerts for this device.",
            ));
        }
        let mut alerts = Vec::with_capacity(rows.len());
        for row in &rows {
            alerts.push(row_to_alert(row)?);
        }
        Ok(alerts)
    }

    async fn enable_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError> {
        self.transition(ctx, alert_id, AlertState::Enabled).await
    }

    async fn disable_alert(
        &self,
        ctx: &CallerContext,
        alert_id: i64,
    ) -> Result<AlertRecord, StorageError> {
        self.transition(ctx, alert_id, AlertState::Disabled).await
    }

    async fn delete_alert(&self, ctx: &CallerContext, alert_id: i64) -> Result<(), StorageError> {
        let row = sqlx::query("select user_id from alerts where id = $1")
            .bind(alert_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Alert not found."))?;
        ensure_owner(Some(row.try_get("user_id")?), ctx)?;
        sqlx::query("delete from alerts where id = $1")
            .bind(alert_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
