//! # Motion Control - 执行器仲裁与轨迹执行
//!
//! 在 [`motion_profile`] 规划出的曲线之上，负责"怎么动"：
//!
//! - `actuator` - 执行器能力接口 [`Actuator`] 与单一所有者仲裁 [`Ownership`]
//! - `mode` - 控制模式解析（请求的 [`ControlMode`] → 实际的 [`DriveMode`]）
//! - `compensator` - 增量式电机 PID [`MotorPid`] 与 PD 补偿器 [`Pd`]
//! - `controller` - 速度控制器 [`VelocityController`]、位置控制器 [`PositionController`]
//! - `trajectory` - 多执行器同步轨迹执行器 [`TrajectoryExecutor`]
//! - `sim` - 仿真执行器 [`SimulatedActuator`]（`mock` feature）
//!
//! ## 调用时序
//!
//! ```text
//! 后台任务:       set_target / set_relative_target / stop / enable / disable
//! 低频 tick:      profile_update(dt)        ~200 Hz
//! 高频 tick:      error_update()            ~500 Hz
//!                 controller_update()       ~1 kHz
//! ```
//!
//! 所有执行器方法都只需要 `&self`，一个 `Arc<TrajectoryExecutor<N>>`
//! 可以同时交给 tick 线程和后台线程。
//!
//! ## Feature Flags
//!
//! - `mock` - 启用 [`SimulatedActuator`]
//! - `serde` - 为所有配置结构体启用序列化

pub mod actuator;
pub mod compensator;
pub mod controller;
pub mod error;
pub mod mode;
pub mod trajectory;

#[cfg(any(test, feature = "mock"))]
pub mod sim;

// 重新导出常用类型
pub use actuator::{Actuator, ControllerId, Ownership, SharedActuator};
pub use compensator::{Compensator, MotorPid, Pd, PdConfig, PidConfig};
pub use controller::{
    Controller, ControllerCore, PositionController, PositionControllerConfig, VelocityController,
    VelocityControllerConfig,
};
pub use error::{ConfigError, EnableError, TrajectoryError};
pub use mode::{ControlMode, DriveMode};
pub use trajectory::{ExecutorConfig, SwapGuard, TrajectoryExecutor};

#[cfg(any(test, feature = "mock"))]
pub use sim::{SimCommand, SimulatedActuator, SimulatedActuatorConfig};

pub use motion_profile;
