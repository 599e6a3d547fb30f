//! 存储层错误类型
//!
//! 定义统一的存储错误分类，供所有作用域仓库返回：
//! - NotFound：实体不存在
//! - PermissionDenied：归属链校验失败，或一次性认领已被消费
//! - BadRequest：唯一性约束冲突
//! - Conflict：幂等状态迁移被重复触发
//! - PartialDelete：批量删除部分生效（披露实际删除条数）
//! - Database：底层 SQL 执行错误
//!
//! 所有错误对当前操作都是终止性的，内部不做重试；
//! 错误原样向上传递，由路由层映射为 HTTP 状态码。

use thiserror::Error;

/// 存储错误分类。
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    /// 批量删除的归属校验失败：只删除了属于调用方的行。
    #[error("You don't have permission to delete all tags. {deleted} tags deleted.")]
    PartialDelete { requested: usize, deleted: usize },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
