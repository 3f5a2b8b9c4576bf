//! 配置管理命令
//!
//! 输出默认的轴组配置模板，检查已有配置文件。

use anyhow::{Context, Result};
use clap::Subcommand;
use motion_sdk::AxisGroupConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 输出默认配置（TOML）
    Template {
        /// 输出文件，缺省输出到 stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 检查配置文件
    Check {
        /// 配置文件路径
        path: PathBuf,
    },
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            ConfigCommand::Template { output } => Self::template(output.as_deref()),
            ConfigCommand::Check { path } => Self::check(&path),
        }
    }

    fn template(output: Option<&Path>) -> Result<()> {
        let content = AxisGroupConfig::default().to_toml_string()?;
        match output {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("✅ 配置模板已写入: {}", path.display());
            },
            None => print!("{content}"),
        }
        Ok(())
    }

    fn check(path: &Path) -> Result<()> {
        let config = AxisGroupConfig::load_from_file(path)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        println!("✅ 配置有效: {}", path.display());
        println!(
            "   规划上限: v={} a={} j={}",
            config.planner.v_max, config.planner.a_max, config.planner.j_max
        );
        println!("   控制模式: {:?}", config.control_mode);
        println!(
            "   tick: controller {} Hz, error 每 {} 次, profile {} Hz (dt={:.4}s)",
            config.rates.controller_hz,
            config.rates.error_divider,
            config.rates.profile_hz,
            config.rates.profile_period()
        );
        println!("   仿真执行器: {}", config.simulation.actuators);
        Ok(())
    }
}
