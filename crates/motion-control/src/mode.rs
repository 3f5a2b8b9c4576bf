//! 控制模式
//!
//! 用户请求 [`ControlMode`]，构造控制器时对照执行器能力解析为 [`DriveMode`]。
//! `Default` 直接采用执行器自身的默认模式；显式模式不支持时返回
//! [`ConfigError`]，不会静默降级。

use crate::actuator::Actuator;
use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 请求的控制模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ControlMode {
    /// 使用执行器默认模式
    #[default]
    Default,
    /// 外部闭环，直接下发电流 / 力
    ExternalForce,
    /// 执行器内部速度环
    InternalVelocity,
    /// 执行器内部速度 + 位置环
    InternalVelocityPosition,
}

/// 解析后的实际控制模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DriveMode {
    /// 外部闭环，直接下发电流 / 力
    ExternalForce,
    /// 执行器内部速度环
    InternalVelocity,
    /// 执行器内部速度 + 位置环
    InternalVelocityPosition,
}

impl DriveMode {
    /// 是否由执行器内部闭环
    pub fn is_internal(self) -> bool {
        !matches!(self, DriveMode::ExternalForce)
    }
}

impl From<DriveMode> for ControlMode {
    fn from(mode: DriveMode) -> Self {
        match mode {
            DriveMode::ExternalForce => ControlMode::ExternalForce,
            DriveMode::InternalVelocity => ControlMode::InternalVelocity,
            DriveMode::InternalVelocityPosition => ControlMode::InternalVelocityPosition,
        }
    }
}

impl ControlMode {
    /// 对照执行器能力解析控制模式
    ///
    /// # 返回
    ///
    /// - `Ok(mode)`: 解析后的模式
    /// - `Err(ConfigError::UnsupportedControlMode)`: 执行器不支持显式请求的模式
    pub fn resolve(self, actuator: &dyn Actuator) -> Result<DriveMode, ConfigError> {
        let (mode, supported) = match self {
            ControlMode::Default => return Ok(actuator.default_control_mode()),
            ControlMode::ExternalForce => (DriveMode::ExternalForce, actuator.supports_current()),
            ControlMode::InternalVelocity => (
                DriveMode::InternalVelocity,
                actuator.supports_internal_velocity(),
            ),
            ControlMode::InternalVelocityPosition => (
                DriveMode::InternalVelocityPosition,
                actuator.supports_internal_position(),
            ),
        };

        if supported {
            Ok(mode)
        } else {
            Err(ConfigError::UnsupportedControlMode {
                requested: self,
                actuator: actuator.name().to_string(),
            })
        }
    }
}
