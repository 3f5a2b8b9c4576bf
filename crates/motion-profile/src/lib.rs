//! # Motion Profile - 加加速度受限的速度曲线规划
//!
//! 本 crate 只负责"算"：给定起点状态（位置、速度、加速度）和目标位置，
//! 在速度 / 加速度 / 加加速度上限内规划一条 S 形曲线，并按时间查询。
//! 不涉及任何电机、控制回路或线程。
//!
//! ## 包含模块
//!
//! - `ramp` - 单侧加速过程 [`JerkRamp`]（加加速 → 可选匀加速 → 减加速）
//! - `s_curve` - 点到点运动曲线 [`SCurveProfile`]（入口斜坡 + 可选匀速段 + 出口斜坡）
//! - `profile` - 速度曲线通用查询接口 [`VelocityProfile`]
//! - `config` - 规划参数 [`PlannerConfig`]
//! - `error` - 规划失败原因 [`PlanError`]
//!
//! ## Feature Flags
//!
//! - `serde` - 为 [`PlannerConfig`] 启用序列化
//!
//! ## 使用示例
//!
//! ```rust
//! use motion_profile::{PlannerConfig, SCurveProfile, VelocityProfile};
//!
//! let config = PlannerConfig::new(360.0, 180.0, 360.0);
//! let profile = SCurveProfile::new(config, 0.0, 0.0, 0.0, 90.0).unwrap();
//!
//! assert!((profile.calc_x(profile.total_time()) - 90.0).abs() < 1e-3);
//! ```

pub mod config;
pub mod error;
pub mod profile;
pub mod ramp;
pub mod s_curve;

// 重新导出常用类型
pub use config::PlannerConfig;
pub use error::PlanError;
pub use profile::VelocityProfile;
pub use ramp::JerkRamp;
pub use s_curve::{ProfilePhase, SCurveProfile};
