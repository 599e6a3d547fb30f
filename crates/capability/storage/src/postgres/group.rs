//! Postgres 分组存储实现

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::models::{GroupRecord, Page};
use crate::traits::GroupStore;

const COLUMNS: &str = "id, name, organization_id, created_at, updated_at";

fn row_to_group(row: &PgRow) -> Result<GroupRecord, sqlx::Error> {
    Ok(GroupRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        organization_id: row.try_get("organization_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PgGroupStore {
    pub pool: PgPool,
}

impl PgGroupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GroupStore for PgGroupStore {
    async fn create_group(
        &self,
        name: &str,
        organization_id: Option<i64>,
    ) -> Result<GroupRecord, StorageError> {
        let exists = sqlx::query("select 1 from groups where name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(StorageError::bad_request("Group name must be unique."));
        }
        let row = sqlx::query(&format!(
            "insert into groups (name, organization_id, created_at, updated_at) \
             values ($1, $2, now(), now()) returning {COLUMNS}"
        ))
        .bind(name)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_group(&row)?)
    }

    async fn list_groups(&self, page: Page) -> Result<Vec<GroupRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {COLUMNS} from groups order by id limit $1 offset $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        let mut groups = Vec::with_capacity(rows.len());
        for row in &rows {
            groups.push(row_to_group(row)?);
        }
        Ok(groups)
    }

    async fn update_group(
        &self,
        group_id: i64,
        name: &str,
    ) -> Result<Option<GroupRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update groups set name = $1, updated_at = now() \
             where id = $2 returning {COLUMNS}"
        ))
        .bind(name)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(row_to_group)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn delete_group(&self, group_id: i64) -> Result<Option<GroupRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "delete from groups where id = $1 returning {COLUMNS}"
        ))
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(row_to_group)
            .transpose()
            .map_err(StorageError::from)
    }
}
