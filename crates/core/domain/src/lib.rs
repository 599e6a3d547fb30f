pub mod kinds;

pub use kinds::{ActionState, AlertState, DeviceKind};

use uuid::Uuid;

/// 调用方上下文：所有模块共享的执行上下文。
///
/// 携带通过认证的用户身份与其组织/分组归属，
/// 所有作用域仓库据此做归属链（owner chain）校验。
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: Uuid,
    pub organization_id: Option<i64>,
    pub group_id: Option<i64>,
}

impl CallerContext {
    /// 构造显式身份的调用方上下文。
    pub fn new(user_id: Uuid, organization_id: Option<i64>, group_id: Option<i64>) -> Self {
        Self {
            user_id,
            organization_id,
            group_id,
        }
    }
}

impl Default for CallerContext {
    /// 空上下文（仅用于测试或占位）。
    fn default() -> Self {
        Self {
            user_id: Uuid::nil(),
            organization_id: None,
            group_id: None,
        }
    }
}
