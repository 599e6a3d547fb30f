//! 领域枚举：设备类型、告警状态、动作状态。
//!
//! 存储层与 API 层共用这些枚举；数据库中以小写字符串存储，
//! 通过 `as_str`/`parse` 互转，解析失败由调用方映射为请求错误。

use std::fmt;
use std::str::FromStr;

/// 设备类型：节点或网关。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Node,
    Gateway,
}

impl DeviceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Node => "node",
            DeviceKind::Gateway => "gateway",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "node" => Ok(DeviceKind::Node),
            "gateway" => Ok(DeviceKind::Gateway),
            other => Err(UnknownKind::new("device kind", other)),
        }
    }
}

/// 告警状态：启用或停用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Enabled,
    Disabled,
}

impl AlertState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertState::Enabled => "enabled",
            AlertState::Disabled => "disabled",
        }
    }
}

impl fmt::Display for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertState {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "enabled" => Ok(AlertState::Enabled),
            "disabled" => Ok(AlertState::Disabled),
            other => Err(UnknownKind::new("alert state", other)),
        }
    }
}

/// 动作状态：等待、完成、失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Pending,
    Completed,
    Failed,
}

impl ActionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionState::Pending => "pending",
            ActionState::Completed => "completed",
            ActionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionState {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(ActionState::Pending),
            "completed" => Ok(ActionState::Completed),
            "failed" => Ok(ActionState::Failed),
            other => Err(UnknownKind::new("action state", other)),
        }
    }
}

/// 枚举解析失败：携带字段名与非法取值。
#[derive(Debug, Clone)]
pub struct UnknownKind {
    pub field: &'static str,
    pub value: String,
}

impl UnknownKind {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.field, self.value)
    }
}

impl std::error::Error for UnknownKind {}
