//! 速度控制器
//!
//! - 外部闭环模式：`set_current(pid.calc(v_ref, v_fdb))`
//! - 内部模式：把速度参考直接透传给执行器内部速度环

use super::{Controller, ControllerCore};
use crate::actuator::SharedActuator;
use crate::compensator::{Compensator, MotorPid, PidConfig};
use crate::error::ConfigError;
use crate::mode::ControlMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 速度控制器参数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VelocityControllerConfig {
    /// 速度环 PID（仅外部闭环模式使用）
    pub pid: PidConfig,
    pub control_mode: ControlMode,
}

/// 速度控制器
#[derive(Debug)]
pub struct VelocityController {
    core: ControllerCore,
    pid: MotorPid,
    velocity_ref: f64,
}

impl VelocityController {
    /// 创建速度控制器
    ///
    /// # 错误
    ///
    /// 执行器不支持请求的控制模式时返回 [`ConfigError`]。
    pub fn new(
        actuator: SharedActuator,
        config: VelocityControllerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            core: ControllerCore::new(actuator, config.control_mode)?,
            pid: MotorPid::new(config.pid),
            velocity_ref: 0.0,
        })
    }

    /// 设置速度参考
    ///
    /// 内部模式且已使能时立即下发，不必等下一次 `update()`。
    pub fn set_ref(&mut self, velocity: f64) {
        self.velocity_ref = velocity;
        if self.core.is_enabled() && self.core.mode().is_internal() {
            self.core.actuator().set_internal_velocity(velocity);
        }
    }

    /// 当前速度参考
    pub fn velocity_ref(&self) -> f64 {
        self.velocity_ref
    }

    /// 最近一次 PID 输出
    pub fn output(&self) -> f64 {
        self.pid.output()
    }

    /// 更新 PID 参数
    pub fn set_pid_config(&mut self, config: PidConfig) {
        self.pid.set_config(config);
    }
}

impl Controller for VelocityController {
    fn update(&mut self) {
        if !self.core.is_enabled() {
            return;
        }
        let actuator = self.core.actuator();
        if self.core.mode().is_internal() {
            actuator.set_internal_velocity(self.velocity_ref);
        } else {
            let current = self.pid.calc(self.velocity_ref, actuator.velocity());
            actuator.set_current(current);
        }
    }

    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn reset(&mut self) {
        self.pid.reset();
    }
}
