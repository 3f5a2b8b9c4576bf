//! Controller - 控制器通用接口
//!
//! 每个控制器绑定一个执行器，构造时解析控制模式，使能时获取执行器所有权。
//!
//! # 状态机
//!
//! ```text
//! Disabled ──enable()──▶ Enabled ──disable()──▶ Disabled
//!     ▲                    │
//!     └── 执行器被占用 ────┘（enable 失败，保持 Disabled）
//! ```
//!
//! - `enable()` 在已使能时是幂等的
//! - `disable()` 只在自己是所有者时释放执行器
//! - 控制器被 drop 时自动释放执行器
//! - 未使能时 `update()` 不下发任何命令

mod position;
mod velocity;

pub use position::{PositionController, PositionControllerConfig};
pub use velocity::{VelocityController, VelocityControllerConfig};

use crate::actuator::{ControllerId, SharedActuator};
use crate::error::ConfigError;
use crate::mode::{ControlMode, DriveMode};
use tracing::{trace, warn};

/// 控制器共享状态：身份、执行器、解析后的模式、使能标志
pub struct ControllerCore {
    id: ControllerId,
    actuator: SharedActuator,
    mode: DriveMode,
    enabled: bool,
}

impl std::fmt::Debug for ControllerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerCore")
            .field("id", &self.id)
            .field("actuator", &self.actuator.name())
            .field("mode", &self.mode)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl ControllerCore {
    /// 绑定执行器并解析控制模式
    ///
    /// # 错误
    ///
    /// 执行器不支持显式请求的模式时返回 [`ConfigError::UnsupportedControlMode`]。
    pub fn new(actuator: SharedActuator, requested: ControlMode) -> Result<Self, ConfigError> {
        let mode = requested.resolve(actuator.as_ref())?;
        Ok(Self {
            id: ControllerId::next(),
            actuator,
            mode,
            enabled: false,
        })
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn actuator(&self) -> &SharedActuator {
        &self.actuator
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 获取执行器所有权并使能
    ///
    /// # 返回
    ///
    /// 执行器空闲或已被本控制器持有时返回 `true`
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            return true;
        }
        if !self.actuator.ownership().try_acquire(self.id) {
            warn!(
                "Controller {} cannot enable: actuator '{}' is owned by {:?}",
                self.id.get(),
                self.actuator.name(),
                self.actuator.ownership().owner()
            );
            return false;
        }

        self.enabled = true;
        trace!(
            "Controller {} enabled on '{}' ({:?})",
            self.id.get(),
            self.actuator.name(),
            self.mode
        );
        true
    }

    /// 失能，是所有者时释放执行器
    pub fn disable(&mut self) {
        self.actuator.ownership().release(self.id);
        if self.enabled {
            trace!(
                "Controller {} disabled on '{}'",
                self.id.get(),
                self.actuator.name()
            );
        }
        self.enabled = false;
    }
}

impl Drop for ControllerCore {
    fn drop(&mut self) {
        self.actuator.ownership().release(self.id);
    }
}

/// 控制器通用接口
pub trait Controller: Send {
    /// 执行一次控制计算并下发命令（未使能时为空操作）
    fn update(&mut self);

    fn core(&self) -> &ControllerCore;

    fn core_mut(&mut self) -> &mut ControllerCore;

    /// 清除内部补偿器状态，在每次从 Disabled 进入 Enabled 时调用
    fn reset(&mut self) {}

    /// 使能控制器
    ///
    /// # 返回
    ///
    /// - `true`: 已使能（包括本来就已使能）
    /// - `false`: 执行器被其他控制器占用，保持失能
    fn enable(&mut self) -> bool {
        if self.core().is_enabled() {
            return true;
        }
        if !self.core_mut().enable() {
            return false;
        }
        self.reset();
        true
    }

    /// 失能控制器
    fn disable(&mut self) {
        self.core_mut().disable();
    }

    fn is_enabled(&self) -> bool {
        self.core().is_enabled()
    }

    fn id(&self) -> ControllerId {
        self.core().id()
    }

    fn actuator(&self) -> &SharedActuator {
        self.core().actuator()
    }

    fn mode(&self) -> DriveMode {
        self.core().mode()
    }
}
