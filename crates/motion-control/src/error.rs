//! 控制层错误类型定义

use crate::mode::ControlMode;
use motion_profile::PlanError;
use thiserror::Error;

/// 配置错误（构造期，不可恢复）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 执行器不支持请求的控制模式
    #[error("Actuator '{actuator}' does not support control mode {requested:?}")]
    UnsupportedControlMode {
        requested: ControlMode,
        actuator: String,
    },
}

/// 多执行器使能失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnableError {
    /// 第 `index` 个执行器已被其他控制器占用，已回滚全部使能
    #[error("Actuator '{actuator}' (binding {index}) is owned by another controller")]
    OwnershipConflict { index: usize, actuator: String },
}

/// 轨迹设置失败
///
/// 任何错误都不会修改执行器当前的曲线和时间。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// 执行器未使能
    #[error("Trajectory executor is not enabled")]
    NotEnabled,

    /// 协作锁被占用
    #[error("Trajectory executor is locked")]
    Busy,

    /// 规划失败
    #[error("Planning failed: {0}")]
    Planning(#[from] PlanError),
}
