//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。
//! 用户以 UUID 为主键，不走通用内存表。

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{UserCreate, UserRecord};
use crate::traits::UserStore;

/// 用户内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserStore {
    /// 创建新的用户存储
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    /// 创建用户：邮箱唯一性检查与插入在同一写临界区内完成。
    async fn create_user(&self, input: UserCreate) -> Result<UserRecord, StorageError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.values().any(|user| user.email == input.email) {
            return Err(StorageError::bad_request("Email must be unique."));
        }
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: input.email,
            password_hash: input.password_hash,
            is_active: true,
            organization_id: input.organization_id,
            group_id: input.group_id,
            refresh_jti: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, StorageError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match users.get_mut(&user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_refresh_jti(
        &self,
        user_id: Uuid,
        jti: Option<&str>,
    ) -> Result<bool, StorageError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match users.get_mut(&user_id) {
            Some(user) => {
                user.refresh_jti = jti.map(str::to_string);
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_refresh_jti(&self, user_id: Uuid) -> Result<Option<String>, StorageError> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.get(&user_id).and_then(|user| user.refresh_jti.clone()))
    }
}
