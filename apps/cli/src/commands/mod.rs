//! 命令定义和实现

pub mod config;
pub mod plan;
pub mod simulate;

pub use config::ConfigCommand;
pub use plan::PlanCommand;
pub use simulate::SimulateCommand;

use anyhow::{Context, Result};
use motion_sdk::AxisGroupConfig;
use std::path::Path;

/// 加载轴组配置，未指定文件时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<AxisGroupConfig> {
    match path {
        Some(path) => AxisGroupConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AxisGroupConfig::default()),
    }
}
