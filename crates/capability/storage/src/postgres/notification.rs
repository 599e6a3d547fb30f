//! Postgres 通知存储实现
//!
//! 只追加：无更新/删除操作（不可变审计轨迹）。

use domain::CallerContext;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{NotificationCreate, NotificationRecord, Page};
use crate::traits::NotificationStore;

const COLUMNS: &str =
    "id, uuid, message, level, check_id, endpoint_id, rule_id, alert_id, device_id, user_id";

fn row_to_notification(row: &PgRow) -> Result<NotificationRecord, sqlx::Error> {
    Ok(NotificationRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        message: row.try_get("message")?,
        level: row.try_get("level")?,
        check_id: row.try_get("check_id")?,
        endpoint_id: row.try_get("endpoint_id")?,
        rule_id: row.try_get("rule_id")?,
        alert_id: row.try_get("alert_id")?,
        device_id: row.try_get("device_id")?,
        user_id: row.try_get("user_id")?,
    })
}

pub struct PgNotificationStore {
    pub pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create_notification(
        &self,
        input: NotificationCreate,
    ) -> Result<NotificationRecord, StorageError> {
        let row = sqlx::query(&format!(
            "insert into notifications (uuid, message, level, check_id, endpoint_id, \
             rule_id, alert_id, device_id, user_id) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9) returning {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.message)
        .bind(&input.level)
        .bind(&input.check_id)
        .bind(&input.endpoint_id)
        .bind(&input.rule_id)
        .bind(input.alert_id)
        .bind(input.device_id)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_notification(&row)?)
    }

    /// 空结果按空列表返回（有意的宽松策略）。
    async fn list_notifications(
        &self,
        ctx: &CallerContext,
        page: Page,
        device_id: Option<i64>,
        alert_id: Option<i64>,
    ) -> Result<Vec<NotificationRecord>, StorageError> {
        let rows = match (device_id, alert_id) {
            (None, None) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from notifications where user_id = $1 \
                     order by id limit $2 offset $3"
                ))
                .bind(ctx.user_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(device_id), None) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from notifications where user_id = $1 and device_id = $2 \
                     order by id limit $3 offset $4"
                ))
                .bind(ctx.user_id)
                .bind(device_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(alert_id)) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from notifications where user_id = $1 and alert_id = $2 \
                     order by id limit $3 offset $4"
                ))
                .bind(ctx.user_id)
                .bind(alert_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
            (Some(device_id), Some(alert_id)) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from notifications \
                     where user_id = $1 and device_id = $2 and alert_id = $3 \
                     order by id limit $4 offset $5"
                ))
                .bind(ctx.user_id)
                .bind(device_id)
                .bind(alert_id)
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.pool)
                .await?
            }
        };
        let mut notifications = Vec::with_capacity(rows.len());
        for row in &rows {
            notifications.push(row_to_notification(row)?);
        }
        Ok(notifications)
    }
}
