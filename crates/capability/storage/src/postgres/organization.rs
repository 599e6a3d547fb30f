//! Postgres 组织存储实现

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::models::{OrganizationRecord, Page};
use crate::traits::OrganizationStore;

const COLUMNS: &str = "id, name, created_at, updated_at";

fn row_to_organization(row: &PgRow) -> Result<OrganizationRecord, sqlx::Error> {
    Ok(OrganizationRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PgOrganizationStore {
    pub pool: PgPool,
}

impl PgOrganizationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrganizationStore for PgOrganizationStore {
    async fn create_organization(&self, name: &str) -> Result<OrganizationRecord, StorageError> {
        let exists = sqlx::query("select 1 from organizations where name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(StorageError::bad_request(
                "Organization name must be unique",
            ));
        }
        let row = sqlx::query(&format!(
            "insert into organizations (name, created_at, updated_at) \
             values ($1, now(), now()) returning {COLUMNS}"
        ))
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_organization(&row)?)
    }

    async fn get_organization(
        &self,
        organization_id: i64,
    ) -> Result<Option<OrganizationRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "select {COLUMNS} from organizations where id = $1"
        ))
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(row_to_organization)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn list_organizations(
        &self,
        page: Page,
    ) -> Result<Vec<OrganizationRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "select {COLUMNS} from organizations order by id limit $1 offset $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        let mut organizations = Vec::with_capacity(rows.len());
        for row in &rows {
            organizations.push(row_to_organization(row)?);
        }
        Ok(organizations)
    }

    async fn update_organization(
        &self,
        organization_id: i64,
        name: &str,
    ) -> Result<Option<OrganizationRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "update organizations set name = $1, updated_at = now() \
             where id = $2 returning {COLUMNS}"
        ))
        .bind(name)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(row_to_organization)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn delete_organization(
        &self,
        organization_id: i64,
    ) -> Result<Option<OrganizationRecord>, StorageError> {
        let row = sqlx::query(&format!(
            "delete from organizations where id = $1 returning {COLUMNS}"
        ))
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref()
            .map(row_to_organization)
            .transpose()
            .map_err(StorageError::from)
    }
}
