//! # Motion Tools - 配置、调度与采样工具
//!
//! **依赖原则**: 只依赖 `motion-profile` 和 `motion-control` 的公共数据结构，
//! 不引入任何硬件或仿真依赖
//!
//! ## 包含模块
//!
//! - `config` - 轴组 TOML 配置文件（规划参数、补偿器参数、tick 频率、仿真参数）
//! - `runner` - 按配置频率分发 `profile_update` / `error_update` / `controller_update`
//! - `sampling` - 按固定频率采样速度曲线（纯函数）
//!
//! ## 使用示例
//!
//! ```rust
//! use motion_tools::config::AxisGroupConfig;
//!
//! let config = AxisGroupConfig::from_toml_str(
//!     r#"
//!     control_mode = "internal_velocity"
//!
//!     [planner]
//!     v_max = 360.0
//!     a_max = 60.0
//!     j_max = 100.0
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.planner.v_max, 360.0);
//! ```

pub mod config;
pub mod runner;
pub mod sampling;

// 重新导出常用类型
pub use config::{AxisGroupConfig, ConfigFileError, RateConfig, SimulationConfig};
pub use runner::{RunStats, TickSchedule, TickTarget};
pub use sampling::{ProfileSample, ProfileSummary, sample_profile, summarize, write_csv};
