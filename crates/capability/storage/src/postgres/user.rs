//! Postgres 用户存储实现
//!
//! 供认证能力使用：注册、按邮箱查找、口令哈希升级、
//! refresh token jti 绑定。

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{UserCreate, UserRecord};
use crate::traits::UserStore;

const COLUMNS: &str =
    "id, email, password_hash, is_active, organization_id, group_id, refresh_jti, \
     created_at, updated_at";

fn row_to_user(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        is_active: row.try_get("is_active")?,
        organization_id: row.try_get("organization_id")?,
        group_id: row.try_get("group_id")?,
        refresh_jti: row.try_get("refresh_jti")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, input: UserCreate) -> Result<UserRecord, StorageError> {
        let exists = sqlx::query("select 1 from users where email = $1")
            .bind(&input.email)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(StorageError::bad_request("Email must be unique."));
        }
        let row = sqlx::query(&format!(
            "insert into users (id, email, password_hash, is_active, organization_id, \
             group_id, created_at, updated_at) \
             values ($1, $2, $3, true, $4, $5, now(), now()) returning {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.organization_id)
        .bind(input.group_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_user(&row)?)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(&format!("select {COLUMNS} from users where id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(&format!("select {COLUMNS} from users where email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(StorageError::from)
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update users set password_hash = $1, updated_at = now() where id = $2",
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_refresh_jti(
        &self,
        user_id: Uuid,
        jti: Option<&str>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update users set refresh_jti = $1, updated_at = now() where id = $2",
        )
        .bind(jti)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_refresh_jti(&self, user_id: Uuid) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("select refresh_jti from users where id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(row.try_get("refresh_jti")?),
            None => Ok(None),
        }
    }
}
