//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use motion_sdk::prelude::*;
//! ```

// 规划层
pub use motion_profile::{PlannerConfig, SCurveProfile, VelocityProfile};

// 控制层
pub use motion_control::{
    Actuator, Compensator, ControlMode, Controller, DriveMode, ExecutorConfig, MotorPid, Pd,
    PdConfig, PidConfig, PositionController, PositionControllerConfig, SharedActuator,
    TrajectoryExecutor, VelocityController, VelocityControllerConfig,
};

// 工具层
pub use motion_tools::{AxisGroupConfig, TickSchedule, TickTarget};

// 错误类型
pub use motion_control::{ConfigError, EnableError, TrajectoryError};
pub use motion_profile::PlanError;
pub use motion_tools::ConfigFileError;
