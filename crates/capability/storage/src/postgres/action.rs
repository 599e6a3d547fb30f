//! Postgres 动作存储实现
//!
//! 所有操作经 device_id → device.user_id 链做用户作用域；
//! 归属裁决通过与 devices 的 join 在一次查询内取得。

use domain::{ActionState, CallerContext};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{ActionCreate, ActionRecord};
use crate::traits::ActionStore;
use crate::validation::ensure_owner;

const COLUMNS: &str =
    "id, uuid, device_id, status, is_enabled, \"values\", created_at, updated_at";

// join 查询里 actions 与 devices 的同名列需要显式限定
const SCOPED_COLUMNS: &str = "a.id, a.uuid, a.device_id, a.status, a.is_enabled, \
     a.\"values\", a.created_at, a.updated_at";

fn row_to_action(row: &PgRow) -> Result<ActionRecord, sqlx::Error> {
    Ok(ActionRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        device_id: row.try_get("device_id")?,
        status: row.try_get("status")?,
        is_enabled: row.try_get("is_enabled")?,
        values: row.try_get("values")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PgActionStore {
    pub pool: PgPool,
}

impl PgActionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 读取动作及其设备链归属；缺失 → NotFound，链不归属调用方 → PermissionDenied。
    async fn fetch_scoped(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError> {
        let row = sqlx::query(&format!(
            "select {SCOPED_COLUMNS}, d.user_id as owner_id \
             from actions a left join devices d on d.id = a.device_id \
             where a.id = $1"
        ))
        .bind(action_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("Action not found"))?;
        ensure_owner(row.try_get("owner_id")?, ctx)?;
        Ok(row_to_action(&row)?)
    }
}

#[async_trait::async_trait]
impl ActionStore for PgActionStore {
    async fn create_action(
        &self,
        ctx: &CallerContext,
        input: ActionCreate,
    ) -> Result<ActionRecord, StorageError> {
        let device = sqlx::query("select user_id from devices where id = $1")
            .bind(input.device_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Device Not Found."))?;
        ensure_owner(device.try_get("user_id")?, ctx)?;
        let row = sqlx::query(&format!(
            "insert into actions (uuid, device_id, status, is_enabled, \"values\", \
             created_at, updated_at) \
             values ($1, $2, $3, true, $4, now(), now()) returning {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.device_id)
        .bind(ActionState::Pending.as_str())
        .bind(&input.values)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_action(&row)?)
    }

    async fn get_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError> {
        self.fetch_scoped(ctx, action_id).await
    }

    async fn toggle_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<ActionRecord, StorageError> {
        self.fetch_scoped(ctx, action_id).await?;
        let row = sqlx::query(&format!(
            "update actions set is_enabled = not is_enabled, updated_at = now() \
             where id = $1 returning {COLUMNS}"
        ))
        .bind(action_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("Action not found"))?;
        Ok(row_to_action(&row)?)
    }

    async fn delete_action(
        &self,
        ctx: &CallerContext,
        action_id: i64,
    ) -> Result<(), StorageError> {
        self.fetch_scoped(ctx, action_id).await?;
        sqlx::query("delete from actions where id = $1")
            .bind(action_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
