//! 仿真执行器
//!
//! 一阶转子模型，用于测试和命令行仿真：
//!
//! ```text
//! 电流模式:       τ = kt·i,  ω̇ = (τ - b·ω) / J,  θ̇ = ω
//! 内部速度模式:   ω = ω_cmd
//! 内部位置模式:   θ = θ_cmd,  ω = Δθ / dt
//! 无命令:         只受阻尼
//! ```
//!
//! 状态只在 [`SimulatedActuator::step`] 中推进。

use crate::actuator::{Actuator, Ownership};
use crate::mode::DriveMode;
use parking_lot::Mutex;

/// 仿真参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedActuatorConfig {
    /// 转动惯量
    pub inertia: f64,
    /// 粘性阻尼
    pub damping: f64,
    /// 电流 → 力矩系数
    pub torque_constant: f64,
    pub supports_current: bool,
    pub supports_internal_velocity: bool,
    pub supports_internal_position: bool,
    pub default_mode: DriveMode,
}

impl Default for SimulatedActuatorConfig {
    fn default() -> Self {
        Self {
            inertia: 1.0,
            damping: 0.1,
            torque_constant: 1.0,
            supports_current: true,
            supports_internal_velocity: true,
            supports_internal_position: true,
            default_mode: DriveMode::ExternalForce,
        }
    }
}

/// 最近一次收到的命令
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SimCommand {
    #[default]
    None,
    Current(f64),
    Velocity(f64),
    Position(f64),
}

#[derive(Debug, Default)]
struct SimState {
    angle: f64,
    velocity: f64,
    command: SimCommand,
}

/// 仿真执行器
#[derive(Debug)]
pub struct SimulatedActuator {
    name: String,
    config: SimulatedActuatorConfig,
    ownership: Ownership,
    state: Mutex<SimState>,
}

impl SimulatedActuator {
    pub fn new(name: impl Into<String>, config: SimulatedActuatorConfig) -> Self {
        Self {
            name: name.into(),
            config,
            ownership: Ownership::new(),
            state: Mutex::new(SimState::default()),
        }
    }

    /// 只支持内部速度环、默认内部速度模式的执行器
    pub fn velocity_driven(name: impl Into<String>) -> Self {
        Self::new(
            name,
            SimulatedActuatorConfig {
                supports_current: false,
                supports_internal_position: false,
                default_mode: DriveMode::InternalVelocity,
                ..Default::default()
            },
        )
    }

    pub fn config(&self) -> &SimulatedActuatorConfig {
        &self.config
    }

    /// 直接设置位置和速度
    pub fn set_state(&self, angle: f64, velocity: f64) {
        let mut state = self.state.lock();
        state.angle = angle;
        state.velocity = velocity;
    }

    /// 最近一次收到的命令
    pub fn last_command(&self) -> SimCommand {
        self.state.lock().command
    }

    /// 最近一次的电流命令（其他命令时为 0）
    pub fn last_current(&self) -> f64 {
        match self.last_command() {
            SimCommand::Current(current) => current,
            _ => 0.0,
        }
    }

    /// 推进仿真 `dt` 秒
    pub fn step(&self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let SimulatedActuatorConfig {
            inertia,
            damping,
            torque_constant,
            ..
        } = self.config;
        let mut state = self.state.lock();

        match state.command {
            SimCommand::Velocity(velocity) => {
                state.velocity = velocity;
                state.angle += velocity * dt;
            },
            SimCommand::Position(position) => {
                state.velocity = (position - state.angle) / dt;
                state.angle = position;
            },
            SimCommand::Current(current) => {
                let torque = torque_constant * current;
                state.velocity += (torque - damping * state.velocity) / inertia * dt;
                state.angle += state.velocity * dt;
            },
            SimCommand::None => {
                state.velocity -= damping * state.velocity / inertia * dt;
                state.angle += state.velocity * dt;
            },
        }
    }
}

impl Actuator for SimulatedActuator {
    fn name(&self) -> &str {
        &self.name
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn default_control_mode(&self) -> DriveMode {
        self.config.default_mode
    }

    fn angle(&self) -> f64 {
        self.state.lock().angle
    }

    fn velocity(&self) -> f64 {
        self.state.lock().velocity
    }

    fn reset_angle(&self) {
        self.state.lock().angle = 0.0;
    }

    fn supports_current(&self) -> bool {
        self.config.supports_current
    }

    fn set_current(&self, current: f64) {
        self.state.lock().command = SimCommand::Current(current);
    }

    fn supports_internal_velocity(&self) -> bool {
        self.config.supports_internal_velocity
    }

    fn set_internal_velocity(&self, velocity: f64) {
        self.state.lock().command = SimCommand::Velocity(velocity);
    }

    fn supports_internal_position(&self) -> bool {
        self.config.supports_internal_position
    }

    fn set_internal_position(&self, position: f64) {
        self.state.lock().command = SimCommand::Position(position);
    }
}
