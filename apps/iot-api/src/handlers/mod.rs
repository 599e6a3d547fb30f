//! Handlers 模块

pub mod actions;
pub mod alerts;
pub mod auth;
pub mod devices;
pub mod groups;
pub mod health;
pub mod messages;
pub mod notifications;
pub mod organizations;
pub mod tags;

pub use actions::*;
pub use alerts::*;
pub use auth::*;
pub use devices::*;
pub use groups::*;
pub use health::*;
pub use messages::*;
pub use notifications::*;
pub use organizations::*;
pub use tags::*;

use iot_storage::Page;

/// 通用分页查询参数（limit 默认 10，offset 默认 0）。
#[derive(serde::Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::new(self.limit.unwrap_or(10), self.offset.unwrap_or(0))
    }
}
