//! Motion SDK - 加加速度受限的多执行器运动控制
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **规划层** (`profile`): S 形曲线规划与查询，纯计算
//! - **控制层** (`control`): 执行器能力接口、所有权仲裁、补偿器、控制器、轨迹执行器
//! - **工具层** (`tools`): 配置文件、tick 调度、曲线采样
//!
//! # 快速开始
//!
//! ```rust
//! use motion_sdk::prelude::*;
//!
//! let profile = SCurveProfile::new(PlannerConfig::default(), 0.0, 0.0, 0.0, 90.0).unwrap();
//! assert!(profile.total_time() > 0.0);
//! ```
//!
//! 执行器的接入方式：为驱动层的电机实现 [`Actuator`]，为每个电机创建一个
//! [`VelocityController`]，再交给 [`TrajectoryExecutor`]。

pub mod logging;
pub mod prelude;

// 各层模块
pub use motion_control as control;
pub use motion_profile as profile;
pub use motion_tools as tools;

// 规划层
pub use motion_profile::{PlanError, PlannerConfig, SCurveProfile, VelocityProfile};

// 控制层
pub use motion_control::{
    Actuator, ConfigError, ControlMode, Controller, DriveMode, EnableError, ExecutorConfig,
    PositionController, PositionControllerConfig, SharedActuator, TrajectoryError,
    TrajectoryExecutor, VelocityController, VelocityControllerConfig,
};

// 工具层
pub use motion_tools::{AxisGroupConfig, ConfigFileError, TickSchedule};

pub use logging::{init_logger, init_logger_with_filter};
