//! # Motion CLI
//!
//! 规划、采样、仿真加加速度受限的运动曲线。
//!
//! ```bash
//! # 规划并以 CSV 输出采样点
//! motion-cli plan --from 0 --to 90 --rate 100
//!
//! # 在两个仿真电机上执行，1 秒后改目标
//! motion-cli simulate --target 90 --retarget-at 1.0 --retarget 150
//!
//! # 按墙钟节拍运行（Ctrl-C 停止）
//! motion-cli simulate --config axis.toml --target 180 --realtime
//!
//! # 输出默认配置
//! motion-cli config template > axis.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{ConfigCommand, PlanCommand, SimulateCommand};

/// Motion CLI - S 形曲线规划与仿真工具
#[derive(Parser, Debug)]
#[command(name = "motion-cli")]
#[command(about = "Plan and simulate jerk-limited point-to-point motion", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 规划一条曲线并输出采样点
    Plan {
        #[command(flatten)]
        args: PlanCommand,
    },

    /// 在仿真执行器上运行轨迹执行器
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },

    /// 配置文件管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    motion_sdk::init_logger_with_filter("motion_cli=info,warn");

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { args } => args.execute(),
        Commands::Simulate { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan_with_negative_target() {
        let cli = Cli::try_parse_from(["motion-cli", "plan", "--from", "10", "--to", "-45"])
            .unwrap();
        match cli.command {
            Commands::Plan { args } => {
                assert_eq!(args.from, 10.0);
                assert_eq!(args.to, -45.0);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_retarget_requires_both_flags() {
        let result = Cli::try_parse_from([
            "motion-cli",
            "simulate",
            "--target",
            "90",
            "--retarget-at",
            "1.0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_config_template() {
        let cli = Cli::try_parse_from(["motion-cli", "config", "template"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommand::Template { output: None })
        ));
    }
}
