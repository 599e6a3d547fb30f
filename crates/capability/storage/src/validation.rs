//! 授权策略辅助函数
//!
//! 归属链（owner chain）规则的统一实现：调用方只有在实体沿
//! user_id / device_id / tag_id 链最终归属于自己时才可读写该实体。
//! 违反一律返回 PermissionDenied；实体缺失与归属违规的检查顺序
//! 由各作用域仓库按操作逐一保持。

use domain::CallerContext;
use uuid::Uuid;

use crate::error::StorageError;

/// 校验归属链终点等于调用方。
///
/// `owner` 为空（实体未认领）同样视为归属违规。
pub fn ensure_owner(owner: Option<Uuid>, ctx: &CallerContext) -> Result<(), StorageError> {
    if owner != Some(ctx.user_id) {
        return Err(StorageError::permission_denied(
            "User does not have permission to access this data.",
        ));
    }
    Ok(())
}

/// 同 `ensure_owner`，但携带操作方给出的拒绝说明。
pub fn ensure_owner_with(
    owner: Option<Uuid>,
    ctx: &CallerContext,
    message: &str,
) -> Result<(), StorageError> {
    if owner != Some(ctx.user_id) {
        return Err(StorageError::permission_denied(message));
    }
    Ok(())
}
