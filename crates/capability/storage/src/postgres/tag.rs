//! Postgres 标签存储实现
//!
//! 设计要点：
//! - 批量创建包在单个事务内：任一校验失败整体回滚
//! - 批量删除单条 SQL 同时命中 id 集与归属，删除数与请求数
//!   不符时报 PartialDelete（已删行不回滚，披露条数）

use domain::CallerContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{Page, TagCreate, TagRecord};
use crate::traits::TagStore;
use crate::validation::{ensure_owner, ensure_owner_with};

const COLUMNS: &str =
    "id, uuid, name, label, target, unit, multiplier, mask, graphed, channel_uuid, \
     user_id, device_id, created_at, updated_at";

fn row_to_tag(row: &PgRow) -> Result<TagRecord, sqlx::Error> {
    Ok(TagRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        name: row.try_get("name")?,
        label: row.try_get("label")?,
        target: row.try_get("target")?,
        unit: row.try_get("unit")?,
        multiplier: row.try_get("multiplier")?,
        mask: row.try_get("mask")?,
        graphed: row.try_get("graphed")?,
        channel_uuid: row.try_get("channel_uuid")?,
        user_id: row.try_get("user_id")?,
        device_id: row.try_get("device_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn insert_sql() -> String {
    format!(
        "insert into tags (uuid, name, label, target, unit, multiplier, mask, graphed, \
         channel_uuid, user_id, device_id, created_at, updated_at) \
         values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, now(), now()) \
         returning {COLUMNS}"
    )
}

pub struct PgTagStore {
    pub pool: PgPool,
}

impl PgTagStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 单条创建前置校验：设备归属 + 名称唯一。
/// 在事务连接上执行时，先插入的批内行对校验可见。
async fn guard_create(
    conn: &mut sqlx::PgConnection,
    ctx: &CallerContext,
    input: &TagCreate,
) -> Result<(), StorageError> {
    if let Some(device_id) = input.device_id {
        let device = sqlx::query("select user_id from devices where id = $1")
            .bind(device_id)
            .fetch_optional(&mut *conn)
            .await?;
        if let Some(row) = device {
            let owner: Option<Uuid> = row.try_get("user_id")?;
            if owner != Some(ctx.user_id) {
                return Err(StorageError::permission_denied(
                    "User does not have permission to add a tag to this device.",
                ));
            }
        }
    }
    let exists = sqlx::query("select 1 from tags where name = $1")
        .bind(&input.name)
        .fetch_optional(&mut *conn)
        .await?;
    if exists.is_some() {
        return Err(StorageError::bad_request("Tag name must be unique."));
    }
    Ok(())
}

fn bind_insert<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ctx: &'q CallerContext,
    input: &'q TagCreate,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.label)
        .bind(input.target)
        .bind(&input.unit)
        .bind(input.multiplier)
        .bind(&input.mask)
        .bind(input.graphed)
        .bind(input.channel_uuid)
        .bind(ctx.user_id)
        .bind(input.device_id)
}

#[async_trait::async_trait]
impl TagStore for PgTagStore {
    async fn create_tag(
        &self,
        ctx: &CallerContext,
        input: TagCreate,
    ) -> Result<TagRecord, StorageError> {
        let mut conn = self.pool.acquire().await?;
        guard_create(&mut conn, ctx, &input).await?;
        let sql = insert_sql();
        let row = bind_insert(sqlx::query(&sql), ctx, &input)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row_to_tag(&row)?)
    }

    /// 批量创建：单个事务，任一校验失败整体回滚。
    async fn create_tags(
        &self,
        ctx: &CallerContext,
        inputs: Vec<TagCreate>,
    ) -> Result<Vec<TagRecord>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let sql = insert_sql();
        let mut created = Vec::with_capacity(inputs.len());
        for input in &inputs {
            guard_create(&mut *tx, ctx, input).await?;
            let row = bind_insert(sqlx::query(&sql), ctx, input)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row_to_tag(&row)?);
        }
        tx.commit().await?;
        Ok(created)
    }

    async fn get_tag(&self, ctx: &CallerContext, tag_id: i64) -> Result<TagRecord, StorageError> {
        let row = sqlx::query(&format!("select {COLUMNS} from tags where id = $1"))
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Tag Not Found."))?;
        let tag = row_to_tag(&row)?;
        ensure_owner(Some(tag.user_id), ctx)?;
        Ok(tag)
    }

    async fn list_tags(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
    ) -> Result<Vec<TagRecord>, StorageError> {
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
                    "You do not have permission to access this device's tags.",
                )?;
                sqlx::query(&format!(
                    "select {COLUMNS} from tags where user_id = $1 and device_id = $2 \
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
                    "select {COLUMNS} from tags where user_id = $1 \
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
            return Err(StorageError::not_found("There are no Tags for this device."));
        }
        let mut tags = Vec::with_capacity(rows.len());
        for row in &rows {
            tags.push(row_to_tag(row)?);
        }
        Ok(tags)
    }

    async fn set_graphed(
        &self,
        ctx: &CallerContext,
        tag_id: i64,
        graphed: bool,
    ) -> Result<TagRecord, StorageError> {
        let row = sqlx::query("select user_id from tags where id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Tag Not Found."))?;
        ensure_owner(Some(row.try_get("user_id")?), ctx)?;
        let row = sqlx::query(&format!(
            "update tags set graphed = $1, updated_at = now() \
             where id = $2 returning {COLUMNS}"
        ))
        .bind(graphed)
        .bind(tag_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::not_found("Tag Not Found."))?;
        Ok(row_to_tag(&row)?)
    }

    async fn delete_tag(&self, ctx: &CallerContext, tag_id: i64) -> Result<(), StorageError> {
        let row = sqlx::query("select user_id from tags where id = $1")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::not_found("Tag not found"))?;
        ensure_owner(Some(row.try_get("user_id")?), ctx)?;
        sqlx::query("delete from tags where id = $1")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// 批量删除：单条 SQL 同时命中 id 集与归属。
    async fn delete_tags(
        &self,
        ctx: &CallerContext,
        tag_ids: &[i64],
    ) -> Result<usize, StorageError> {
        let result = sqlx::query("delete from tags where id = any($1) and user_id = $2")
            .bind(tag_ids)
            .bind(ctx.user_id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() as usize;
        if deleted != tag_ids.len() {
            return Err(StorageError::PartialDelete {
                requested: tag_ids.len(),
                deleted,
            });
        }
        Ok(deleted)
    }
}
