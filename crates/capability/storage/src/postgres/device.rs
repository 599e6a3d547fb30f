//! Postgres 设备存储实现
//!
//! 通过 SQL 查询实现设备操作。
//!
//! 设计要点：
//! - 除创建外的所有操作都带归属链校验
//! - 一次性认领用条件更新（`where user_id is null`）落库，
//!   由数据库裁决竞争，而不是读后写
//! - 使用参数化 SQL 防止注入

use domain::CallerContext;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{DeviceCreate, DeviceRecord, Page};
use crate::traits::DeviceStore;
use crate::validation::ensure_owner;

const COLUMNS: &str =
    "id, uuid, name, kind, metadata, is_configured, thing_uuid, thing_secret, parent_id, \
     user_id, organization_id, created_at, updated_at";

fn row_to_device(row: &PgRow) -> Result<DeviceRecord, sqlx::Error> {
    Ok(DeviceRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        kind: row.try_get("kind")?,
        metadata: row.try_get("metadata")?,
        is_configured: row.try_get("is_configured")?,
        thing_uuid: row.try_get("thing_uuid")?,
        thing_secret: row.try_get("thing_secret")?,
        parent_id: row.try_get("parent_id")?,
        user_id: row.try_get("user_id")?,
        organization_id: row.try_get("organization_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PgDeviceStore {
    pub pool: PgPool,
}

impl PgDeviceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DeviceStore for PgDeviceStore {
    async fn create_device(&self, input: DeviceCreate) -> Result<DeviceRecord, StorageError> {
        let row = sqlx::query(&format!(
            "insert into devices (uuid, name, kind, metadata, is_configured, thing_uuid, \
             thing_secret, parent_id, user_id, organization_id, created_at, updated_at) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now()) \
             returning {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.kind)
        .bind(&input.metadata)
        .bind(input.is_configured)
        .bind(input.thing_uuid)
        .bind(input.thing_secret)
        .bind(input.parent_id)
        .bind(input.user_id)
        .bind(input.organization_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_device(&row)?)
    }

    async fn get_device(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<DeviceRecord, StorageError> {
        let row = sqlx::query(&format!("select {COLUMNS} from devices where id = $1"))
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Device Not Found."))?;
        let device = row_to_device(&row)?;
        ensure_owner(device.user_id, ctx)?;
        Ok(device)
    }

    async fn list_devices(
        &self,
        ctx: &CallerContext,
        page: Page,
    ) -> Result<Vec<DeviceRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {COLUMNS} from devices where user_id = $1 order by id limit $2 offset $3"
        ))
        .bind(ctx.user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        if rows.is_empty() {
            return Err(StorageError::not_found("No Devices Found."));
        }
        let mut devices = Vec::with_capacity(rows.len());
        for row in &rows {
            devices.push(row_to_device(row)?);
        }
        Ok(devices)
    }

    async fn update_metadata(
        &self,
        ctx: &CallerContext,
        device_id: i64,
        metadata: Value,
    ) -> Result<DeviceRecord, StorageError> {
        let row = sqlx::query("select user_id from devices where id = $1")
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Device not found"))?;
        ensure_owner(row.try_get("user_id")?, ctx)?;
        // 整体替换，不做合并
        let row = sqlx::query(&format!(
            "update devices set metadata = $1, updated_at = now() \
             where id = $2 returning {COLUMNS}"
        ))
        .bind(&metadata)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("Device not found"))?;
        Ok(row_to_device(&row)?)
    }

    /// 一次性认领：条件更新只命中 user_id 为空的行，
    /// 未命中时回查分类 NotFound / 已认领。
    async fn link_to_user(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<DeviceRecord, StorageError> {
        let claimed = sqlx::query(&format!(
            "update devices set user_id = $1, updated_at = now() \
             where id = $2 and user_id is null returning {COLUMNS}"
        ))
        .bind(ctx.user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        match claimed {
            Some(row) => Ok(row_to_device(&row)?),
            None => {
                let exists = sqlx::query("select 1 from devices where id = $1")
                    .bind(device_id)
                    .fetch_optional(&self.pool)
                    .await?;
                match exists {
                    Some(_) => Err(StorageError::permission_denied(
                        "Device already linked to a user.",
                    )),
                    None => Err(StorageError::not_found("Device not found")),
                }
            }
        }
    }

    async fn delete_device(
        &self,
        ctx: &CallerContext,
        device_id: i64,
    ) -> Result<(), StorageError> {
        let row = sqlx::query("select user_id from devices where id = $1")
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Device not found"))?;
        ensure_owner(row.try_get("user_id")?, ctx)?;
        sqlx::query("delete from devices where id = $1")
            .bind(device_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
