//! # 轴组配置
//!
//! 一个轴组 = 若干执行器共享一条 S 形曲线。配置文件示例：
//!
//! ```toml
//! control_mode = "internal_velocity"
//! velocity_feedforward = false
//!
//! [planner]
//! v_max = 360.0
//! a_max = 60.0
//! j_max = 100.0
//!
//! [error_pd]
//! kp = 20.0
//! kd = 20.0
//! abs_output_max = 600.0
//!
//! [velocity_pid]
//! kp = 45.0
//! ki = 0.07
//! kd = 5.0
//! abs_output_max = 8000.0
//!
//! [rates]
//! controller_hz = 1000.0
//! error_divider = 2
//! profile_hz = 200.0
//!
//! [simulation]
//! actuators = 2
//! inertia = 1.0
//! damping = 0.1
//! torque_constant = 1.0
//! default_mode = "internal_velocity"
//! ```
//!
//! 缺省的段落使用默认值。

use motion_control::{
    ControlMode, DriveMode, ExecutorConfig, PdConfig, PidConfig, VelocityControllerConfig,
};
use motion_profile::PlannerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// 配置文件错误
#[derive(Error, Debug)]
pub enum ConfigFileError {
    /// 读写文件失败
    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML 解析失败
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 参数不合法
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// tick 频率
///
/// `controller_update` 以 `controller_hz` 运行，`error_update` 每
/// `error_divider` 次运行一次，`profile_update` 以 `profile_hz` 运行
/// （必须整除 `controller_hz`）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    pub controller_hz: f64,
    pub error_divider: u32,
    pub profile_hz: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            controller_hz: 1000.0,
            error_divider: 2,
            profile_hz: 200.0,
        }
    }
}

impl RateConfig {
    /// `profile_update` 相对 `controller_update` 的分频
    pub fn profile_divider(&self) -> u32 {
        (self.controller_hz / self.profile_hz).round().max(1.0) as u32
    }

    /// `controller_update` 周期（秒）
    pub fn controller_period(&self) -> f64 {
        1.0 / self.controller_hz
    }

    /// `profile_update` 的 dt（秒）
    pub fn profile_period(&self) -> f64 {
        self.profile_divider() as f64 / self.controller_hz
    }

    fn validate(&self) -> Result<(), ConfigFileError> {
        if !(self.controller_hz.is_finite() && self.controller_hz > 0.0) {
            return Err(invalid(format!(
                "rates.controller_hz must be > 0, got {}",
                self.controller_hz
            )));
        }
        if !(self.profile_hz.is_finite() && self.profile_hz > 0.0) {
            return Err(invalid(format!(
                "rates.profile_hz must be > 0, got {}",
                self.profile_hz
            )));
        }
        if self.profile_hz > self.controller_hz {
            return Err(invalid(format!(
                "rates.profile_hz ({}) must not exceed rates.controller_hz ({})",
                self.profile_hz, self.controller_hz
            )));
        }
        let ratio = self.controller_hz / self.profile_hz;
        if (ratio - ratio.round()).abs() > 1e-9 {
            return Err(invalid(format!(
                "rates.profile_hz ({}) must divide rates.controller_hz ({})",
                self.profile_hz, self.controller_hz
            )));
        }
        if self.error_divider == 0 {
            return Err(invalid("rates.error_divider must be >= 1".to_string()));
        }
        Ok(())
    }
}

/// 仿真执行器参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// 执行器数量
    pub actuators: usize,
    pub inertia: f64,
    pub damping: f64,
    pub torque_constant: f64,
    pub default_mode: DriveMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            actuators: 2,
            inertia: 1.0,
            damping: 0.1,
            torque_constant: 1.0,
            default_mode: DriveMode::InternalVelocity,
        }
    }
}

/// 轴组配置
///
/// 默认值为双电机升降机构的参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisGroupConfig {
    /// 每个速度控制器请求的控制模式
    pub control_mode: ControlMode,
    /// 是否把曲线速度叠加到位置误差补偿上
    pub velocity_feedforward: bool,
    pub planner: PlannerConfig,
    pub error_pd: PdConfig,
    pub velocity_pid: PidConfig,
    pub rates: RateConfig,
    pub simulation: SimulationConfig,
}

impl Default for AxisGroupConfig {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Default,
            velocity_feedforward: false,
            planner: PlannerConfig::default(),
            error_pd: PdConfig::default(),
            velocity_pid: PidConfig::default(),
            rates: RateConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl AxisGroupConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigFileError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded axis group config from {}", path.display());
        Ok(config)
    }

    /// 序列化为 TOML 文本
    pub fn to_toml_string(&self) -> Result<String, ConfigFileError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigFileError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验参数
    ///
    /// - 规划上限为正的有限值
    /// - 补偿器输出上限非负
    /// - tick 频率为正，分频 ≥ 1
    /// - 至少一个执行器，仿真惯量为正
    pub fn validate(&self) -> Result<(), ConfigFileError> {
        let PlannerConfig {
            v_max,
            a_max,
            j_max,
        } = self.planner;
        for (name, value) in [("v_max", v_max), ("a_max", a_max), ("j_max", j_max)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("planner.{name} must be > 0, got {value}")));
            }
        }

        if !(self.error_pd.abs_output_max >= 0.0) {
            return Err(invalid(format!(
                "error_pd.abs_output_max must be >= 0, got {}",
                self.error_pd.abs_output_max
            )));
        }
        if !(self.velocity_pid.abs_output_max >= 0.0) {
            return Err(invalid(format!(
                "velocity_pid.abs_output_max must be >= 0, got {}",
                self.velocity_pid.abs_output_max
            )));
        }

        self.rates.validate()?;

        if self.simulation.actuators == 0 {
            return Err(invalid("simulation.actuators must be >= 1".to_string()));
        }
        if !(self.simulation.inertia > 0.0) {
            return Err(invalid(format!(
                "simulation.inertia must be > 0, got {}",
                self.simulation.inertia
            )));
        }
        Ok(())
    }

    /// 轨迹执行器参数
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            planner: self.planner,
            error_pd: self.error_pd,
            velocity_feedforward: self.velocity_feedforward,
        }
    }

    /// 速度控制器参数
    pub fn velocity_controller_config(&self) -> VelocityControllerConfig {
        VelocityControllerConfig {
            pid: self.velocity_pid,
            control_mode: self.control_mode,
        }
    }
}

fn invalid(message: String) -> ConfigFileError {
    ConfigFileError::Invalid(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AxisGroupConfig::default();
        config.validate().unwrap();
        assert_eq!(config.rates.profile_divider(), 5);
        assert_eq!(config.executor_config().error_pd.kp, 20.0);
        assert_eq!(config.velocity_controller_config().pid.abs_output_max, 8000.0);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("axis.toml");

        let mut config = AxisGroupConfig::default();
        config.planner.v_max = 120.0;
        config.control_mode = ControlMode::ExternalForce;
        config.save_to_file(&path).unwrap();

        let loaded = AxisGroupConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = AxisGroupConfig::from_toml_str(
            r#"
            [rates]
            controller_hz = 2000.0
            error_divider = 1
            profile_hz = 500.0
            "#,
        )
        .unwrap();
        assert_eq!(config.planner, PlannerConfig::default());
        assert_eq!(config.rates.profile_divider(), 4);
        assert!((config.rates.profile_period() - 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AxisGroupConfig::from_toml_str(
            r#"
            [planner]
            v_max = 0.0
            a_max = 1.0
            j_max = 1.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigFileError::Invalid(ref msg) if msg.contains("v_max")));

        let mut config = AxisGroupConfig::default();
        config.rates.profile_hz = 300.0;
        assert!(matches!(config.validate(), Err(ConfigFileError::Invalid(_))));

        let mut config = AxisGroupConfig::default();
        config.simulation.actuators = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = AxisGroupConfig::from_toml_str("planner = [").unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AxisGroupConfig::load_from_file("/nonexistent/axis.toml").unwrap_err();
        assert!(matches!(err, ConfigFileError::Io(_)));
    }
}
