//! 位置控制器（位置环 → 速度环级联）
//!
//! 位置环每 `pos_vel_freq_ratio` 次 `update()` 计算一次，输出作为速度参考：
//!
//! | 模式 | 下发 |
//! |---|---|
//! | `ExternalForce` | 速度环 PID → `set_current` |
//! | `InternalVelocity` | 位置环输出 → `set_internal_velocity` |
//! | `InternalVelocityPosition` | 位置参考 → `set_internal_position` |

use super::{Controller, ControllerCore};
use crate::actuator::SharedActuator;
use crate::compensator::{Compensator, MotorPid, PidConfig};
use crate::error::ConfigError;
use crate::mode::{ControlMode, DriveMode};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 位置控制器参数
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PositionControllerConfig {
    /// 位置环 PID，输出为速度参考
    pub position_pid: PidConfig,
    /// 速度环 PID，仅外部闭环模式使用
    pub velocity_pid: PidConfig,
    /// 速度环与位置环的频率比（0 按 1 处理）
    pub pos_vel_freq_ratio: u32,
    pub control_mode: ControlMode,
}

impl Default for PositionControllerConfig {
    fn default() -> Self {
        Self {
            position_pid: PidConfig {
                kp: 10.0,
                ki: 0.0,
                kd: 0.0,
                abs_output_max: 360.0,
            },
            velocity_pid: PidConfig::default(),
            pos_vel_freq_ratio: 1,
            control_mode: ControlMode::Default,
        }
    }
}

/// 位置控制器
#[derive(Debug)]
pub struct PositionController {
    core: ControllerCore,
    position_pid: MotorPid,
    velocity_pid: MotorPid,
    ratio: u32,
    counter: u32,
    position_ref: f64,
    velocity_ref: f64,
}

impl PositionController {
    /// 创建位置控制器
    ///
    /// # 错误
    ///
    /// 执行器不支持请求的控制模式时返回 [`ConfigError`]。
    pub fn new(
        actuator: SharedActuator,
        config: PositionControllerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            core: ControllerCore::new(actuator, config.control_mode)?,
            position_pid: MotorPid::new(config.position_pid),
            velocity_pid: MotorPid::new(config.velocity_pid),
            ratio: config.pos_vel_freq_ratio.max(1),
            counter: 0,
            position_ref: 0.0,
            velocity_ref: 0.0,
        })
    }

    /// 设置位置参考
    pub fn set_ref(&mut self, position: f64) {
        self.position_ref = position;
    }

    pub fn position_ref(&self) -> f64 {
        self.position_ref
    }

    /// 位置环输出的速度参考
    pub fn velocity_ref(&self) -> f64 {
        self.velocity_ref
    }
}

impl Controller for PositionController {
    fn update(&mut self) {
        if !self.core.is_enabled() {
            return;
        }
        let actuator = self.core.actuator();

        if self.core.mode() == DriveMode::InternalVelocityPosition {
            actuator.set_internal_position(self.position_ref);
            return;
        }

        if self.counter == 0 {
            self.velocity_ref = self.position_pid.calc(self.position_ref, actuator.angle());
        }
        self.counter = (self.counter + 1) % self.ratio;

        match self.core.mode() {
            DriveMode::InternalVelocity => actuator.set_internal_velocity(self.velocity_ref),
            _ => {
                let current = self.velocity_pid.calc(self.velocity_ref, actuator.velocity());
                actuator.set_current(current);
            },
        }
    }

    fn core(&self) -> &ControllerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ControllerCore {
        &mut self.core
    }

    fn reset(&mut self) {
        self.position_pid.reset();
        self.velocity_pid.reset();
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::Actuator;
    use crate::sim::{SimCommand, SimulatedActuator, SimulatedActuatorConfig};
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn sim(default_mode: DriveMode) -> Arc<SimulatedActuator> {
        Arc::new(SimulatedActuator::new(
            "p",
            SimulatedActuatorConfig {
                default_mode,
                ..Default::default()
            },
        ))
    }

    #[test]
    fn test_internal_position_mode_sends_position() {
        let actuator = sim(DriveMode::InternalVelocityPosition);
        let mut controller =
            PositionController::new(actuator.clone(), PositionControllerConfig::default()).unwrap();
        assert!(controller.enable());

        controller.set_ref(42.0);
        controller.update();
        assert_eq!(actuator.last_command(), SimCommand::Position(42.0));
    }

    #[test]
    fn test_internal_velocity_mode_converges() {
        let actuator = sim(DriveMode::InternalVelocity);
        let mut controller =
            PositionController::new(actuator.clone(), PositionControllerConfig::default()).unwrap();
        assert!(controller.enable());
        controller.set_ref(30.0);

        for _ in 0..2000 {
            controller.update();
            actuator.step(0.001);
        }
        assert_abs_diff_eq!(actuator.angle(), 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_position_loop_runs_at_divided_rate() {
        let actuator = sim(DriveMode::InternalVelocity);
        let config = PositionControllerConfig {
            pos_vel_freq_ratio: 4,
            ..Default::default()
        };
        let mut controller = PositionController::new(actuator.clone(), config).unwrap();
        assert!(controller.enable());
        controller.set_ref(1.0);

        controller.update();
        let first = controller.velocity_ref();
        assert_abs_diff_eq!(first, 10.0);

        // 接下来 3 次不重新计算位置环
        actuator.set_state(0.5, 0.0);
        for _ in 0..3 {
            controller.update();
            assert_eq!(controller.velocity_ref(), first);
        }
        controller.update();
        assert_ne!(controller.velocity_ref(), first);
    }

    #[test]
    fn test_external_mode_sends_current() {
        let actuator = sim(DriveMode::ExternalForce);
        let mut controller =
            PositionController::new(actuator.clone(), PositionControllerConfig::default()).unwrap();
        assert!(controller.enable());
        controller.set_ref(5.0);
        controller.update();
        assert!(matches!(actuator.last_command(), SimCommand::Current(c) if c > 0.0));
    }

    #[test]
    fn test_zero_ratio_is_treated_as_one() {
        let actuator = sim(DriveMode::InternalVelocity);
        let config = PositionControllerConfig {
            pos_vel_freq_ratio: 0,
            ..Default::default()
        };
        let mut controller = PositionController::new(actuator.clone(), config).unwrap();
        assert!(controller.enable());
        controller.set_ref(1.0);
        controller.update();
        actuator.set_state(1.0, 0.0);
        controller.update();
        // 位置环每次都计算：误差为 0，增量式比例输出回到 0
        assert_abs_diff_eq!(controller.velocity_ref(), 0.0);
    }
}
