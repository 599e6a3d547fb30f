//! 消息内存存储实现
//!
//! 仅用于本地演示和测试。只追加；本层不做归属校验，
//! 调用方先解析 tag/device 完成归属检查。

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StorageError;
use crate::in_memory::table::Table;
use crate::models::{MessageCreate, MessageRecord};
use crate::repository::MessageFilter;
use crate::traits::MessageStore;

/// 消息内存存储
pub struct InMemoryMessageStore {
    messages: Table<MessageRecord>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: Table::new(),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_message(&self, input: MessageCreate) -> Result<MessageRecord, StorageError> {
        Ok(self.messages.insert(|id| MessageRecord {
            id,
            uuid: Uuid::new_v4(),
            channel_id: input.channel_id.clone(),
            publisher: input.publisher.clone(),
            protocol: input.protocol.clone(),
            subtopic: input.subtopic.clone(),
            base_name: input.base_name.clone(),
            base_unit: input.base_unit.clone(),
            base_value: input.base_value,
            base_time: input.base_time,
            name: input.name.clone(),
            unit: input.unit.clone(),
            value: input.value,
            time: input.time,
            string_value: input.string_value.clone(),
            bool_value: input.bool_value,
            data_value: input.data_value.clone(),
            sum_value: input.sum_value,
            device_id: input.device_id,
            tag_id: input.tag_id,
            user_id: input.user_id,
        }))
    }

    async fn list_messages(
        &self,
        filter: MessageFilter,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        Ok(self.messages.find(&filter))
    }
}
