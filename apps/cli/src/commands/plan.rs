//! 规划命令
//!
//! 规划一条曲线，按固定频率采样后输出到 stdout，统计信息输出到 stderr。

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use motion_sdk::prelude::*;
use motion_sdk::tools::{ProfileSample, sample_profile, summarize, write_csv};
use std::io::{self, Write};

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// 规划命令参数
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// 起点位置
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub from: f64,

    /// 目标位置
    #[arg(long, allow_negative_numbers = true)]
    pub to: f64,

    /// 起点速度
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub v0: f64,

    /// 起点加速度
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub a0: f64,

    /// 速度上限
    #[arg(long, default_value_t = 360.0)]
    pub v_max: f64,

    /// 加速度上限
    #[arg(long, default_value_t = 60.0)]
    pub a_max: f64,

    /// 加加速度上限
    #[arg(long, default_value_t = 100.0)]
    pub j_max: f64,

    /// 采样频率（Hz）
    #[arg(short, long, default_value_t = 100.0)]
    pub rate: f64,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

impl PlanCommand {
    pub fn execute(&self) -> Result<()> {
        let profile = self.plan()?;
        let samples = sample_profile(&profile, self.rate);

        let stdout = io::stdout();
        self.write_samples(&samples, stdout.lock())?;

        let summary = summarize(&samples);
        eprintln!(
            "✅ 规划完成: 总时长 {:.4}s, 峰值速度 {:.4}, 匀速段: {}",
            profile.total_time(),
            profile.peak_velocity() * profile.direction(),
            if profile.has_constant_phase() { "有" } else { "无" }
        );
        eprintln!(
            "   采样 {} 点, |v|max={:.4}, |a|max={:.4}, |j|max≈{:.4}",
            samples.len(),
            summary.max_abs_velocity,
            summary.max_abs_acceleration,
            summary.max_abs_jerk
        );
        Ok(())
    }

    fn plan(&self) -> Result<SCurveProfile> {
        let config = PlannerConfig::new(self.v_max, self.a_max, self.j_max);
        SCurveProfile::new(config, self.from, self.v0, self.a0, self.to).with_context(|| {
            format!(
                "Failed to plan {} -> {} (v0={}, a0={})",
                self.from, self.to, self.v0, self.a0
            )
        })
    }

    fn write_samples<W: Write>(&self, samples: &[ProfileSample], mut writer: W) -> Result<()> {
        match self.format {
            OutputFormat::Csv => write_csv(samples, &mut writer)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, samples)?;
                writeln!(writer)?;
            },
        }
        writer.flush()?;
        Ok(())
    }
}
