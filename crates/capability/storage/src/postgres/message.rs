//! Postgres 消息存储实现
//!
//! 只追加；本层不做归属校验，调用方先解析 tag/device 完成归属检查。
//! 等值查询按类型化谓词展开为静态 SQL，每个谓词一条语句。

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{MessageCreate, MessageRecord};
use crate::repository::MessageFilter;
use crate::traits::MessageStore;

const COLUMNS: &str =
    "id, uuid, channel_id, publisher, protocol, subtopic, base_name, base_unit, \
     base_value, base_time, name, unit, value, time, string_value, bool_value, \
     data_value, sum_value, device_id, tag_id, user_id";

fn row_to_message(row: &PgRow) -> Result<MessageRecord, sqlx::Error> {
    Ok(MessageRecord {
        id: row.try_get("id")?,
        uuid: row.try_get("uuid")?,
        channel_id: row.try_get("channel_id")?,
        publisher: row.try_get("publisher")?,
        protocol: row.try_get("protocol")?,
        subtopic: row.try_get("subtopic")?,
        base_name: row.try_get("base_name")?,
        base_unit: row.try_get("base_unit")?,
        base_value: row.try_get("base_value")?,
        base_time: row.try_get("base_time")?,
        name: row.try_get("name")?,
        unit: row.try_get("unit")?,
        value: row.try_get("value")?,
        time: row.try_get("time")?,
        string_value: row.try_get("string_value")?,
        bool_value: row.try_get("bool_value")?,
        data_value: row.try_get("data_value")?,
        sum_value: row.try_get("sum_value")?,
        device_id: row.try_get("device_id")?,
        tag_id: row.try_get("tag_id")?,
        user_id: row.try_get("user_id")?,
    })
}

pub struct PgMessageStore {
    pub pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for PgMessageStore {
    async fn create_message(&self, input: MessageCreate) -> Result<MessageRecord, StorageError> {
        let row = sqlx::query(&format!(
            "insert into messages (uuid, channel_id, publisher, protocol, subtopic, \
             base_name, base_unit, base_value, base_time, name, unit, value, time, \
             string_value, bool_value, data_value, sum_value, device_id, tag_id, user_id) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, \
             $16, $17, $18, $19, $20) returning {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.channel_id)
        .bind(&input.publisher)
        .bind(&input.protocol)
        .bind(&input.subtopic)
        .bind(&input.base_name)
        .bind(&input.base_unit)
        .bind(input.base_value)
        .bind(input.base_time)
        .bind(&input.name)
        .bind(&input.unit)
        .bind(input.value)
        .bind(input.time)
        .bind(&input.string_value)
        .bind(input.bool_value)
        .bind(&input.data_value)
        .bind(input.sum_value)
        .bind(input.device_id)
        .bind(input.tag_id)
        .bind(input.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_message(&row)?)
    }

    async fn list_messages(
        &self,
        filter: MessageFilter,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let rows = match filter {
            MessageFilter::Id(id) => {
                sqlx::query(&format!("select {COLUMNS} from messages where id = $1"))
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
            }
            MessageFilter::Uuid(uuid) => {
                sqlx::query(&format!("select {COLUMNS} from messages where uuid = $1"))
                    .bind(uuid)
                    .fetch_all(&self.pool)
                    .await?
            }
            MessageFilter::Channel(channel_id) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from messages where channel_id = $1 order by id"
                ))
                .bind(channel_id)
                .fetch_all(&self.pool)
                .await?
            }
            MessageFilter::Publisher(publisher) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from messages where publisher = $1 order by id"
                ))
                .bind(publisher)
                .fetch_all(&self.pool)
                .await?
            }
            MessageFilter::Device(device_id) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from messages where device_id = $1 order by id"
                ))
                .bind(device_id)
                .fetch_all(&self.pool)
                .await?
            }
            MessageFilter::Tag(tag_id) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from messages where tag_id = $1 order by id"
                ))
                .bind(tag_id)
                .fetch_all(&self.pool)
                .await?
            }
            MessageFilter::Owner(user_id) => {
                sqlx::query(&format!(
                    "select {COLUMNS} from messages where user_id = $1 order by id"
                ))
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            messages.push(row_to_message(row)?);
        }
        Ok(messages)
    }
}
