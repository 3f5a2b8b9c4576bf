//! 仿真命令
//!
//! 在 N 个仿真电机上运行 [`TrajectoryExecutor`]，输出跟踪统计。
//!
//! - 默认：确定性仿真，按 tick 推进，不休眠
//! - `--realtime`：控制线程以 `spin_sleep` 按墙钟节拍运行，后台线程下发目标，
//!   采样点经 `crossbeam-channel` 回到主线程；Ctrl-C 停止

use super::load_config;
use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use motion_sdk::control::{SimulatedActuator, SimulatedActuatorConfig};
use motion_sdk::prelude::*;
use motion_sdk::tools::{RunStats, SimulationConfig};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 到达目标后额外运行的时间（秒）
const SETTLE_TIME: f64 = 1.0;

/// 支持的最大执行器数量
const MAX_ACTUATORS: usize = 4;

/// 仿真命令参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 轴组配置文件（缺省使用默认配置）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 目标位置
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: f64,

    /// 仿真时长（秒），缺省按曲线时长估计
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// 改目标的时刻（秒）
    #[arg(long, requires = "retarget")]
    pub retarget_at: Option<f64>,

    /// 新目标位置
    #[arg(long, requires = "retarget_at", allow_negative_numbers = true)]
    pub retarget: Option<f64>,

    /// 按墙钟节拍运行
    #[arg(long)]
    pub realtime: bool,

    /// 跟踪数据输出文件（CSV）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 一个 tick 结束时的状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub t: f64,
    pub position_ref: f64,
    pub velocity_ref: f64,
    pub average_position: f64,
}

impl TraceSample {
    fn tracking_error(&self) -> f64 {
        (self.position_ref - self.average_position).abs()
    }
}

/// 仿真结果
#[derive(Debug, Default)]
pub struct SimulationReport {
    pub duration: f64,
    pub final_positions: Vec<f64>,
    pub final_reference: f64,
    pub peak_tracking_error: f64,
    /// 改目标失败的原因
    pub retarget_error: Option<TrajectoryError>,
    /// 实时运行统计（仅 `--realtime`）
    pub stats: Option<RunStats>,
    pub trace: Vec<TraceSample>,
}

impl SimulationReport {
    fn record(&mut self, sample: TraceSample) {
        self.peak_tracking_error = self.peak_tracking_error.max(sample.tracking_error());
        self.final_reference = sample.position_ref;
        self.duration = sample.t;
        self.trace.push(sample);
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "t,position_ref,velocity_ref,average_position")?;
        for s in &self.trace {
            writeln!(
                writer,
                "{:.6},{:.6},{:.6},{:.6}",
                s.t, s.position_ref, s.velocity_ref, s.average_position
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    fn print(&self) {
        println!("✅ 仿真结束: {:.3}s", self.duration);
        for (i, position) in self.final_positions.iter().enumerate() {
            println!("   axis{}: {:.4}", i, position);
        }
        println!("   位置参考: {:.4}", self.final_reference);
        println!("   最大跟踪误差: {:.4}", self.peak_tracking_error);
        if let Some(err) = &self.retarget_error {
            println!("⚠️  改目标失败: {}", err);
        }
        if let Some(stats) = &self.stats {
            println!(
                "   实时 tick: {}, 超时: {}, 最大滞后: {:?}",
                stats.ticks, stats.overruns, stats.max_lateness
            );
        }
    }
}

/// 仿真对象：N 个仿真电机 + 轨迹执行器
#[derive(Clone)]
struct Plant<const N: usize> {
    sims: [Arc<SimulatedActuator>; N],
    executor: Arc<TrajectoryExecutor<N>>,
}

impl<const N: usize> Plant<N> {
    fn build(config: &AxisGroupConfig) -> Result<Self> {
        let sim_config = simulated_actuator_config(&config.simulation);
        let sims: [Arc<SimulatedActuator>; N] = std::array::from_fn(|i| {
            Arc::new(SimulatedActuator::new(format!("axis{i}"), sim_config))
        });

        let mut controllers = Vec::with_capacity(N);
        for sim in &sims {
            controllers.push(VelocityController::new(
                sim.clone(),
                config.velocity_controller_config(),
            )?);
        }
        let controllers: [VelocityController; N] = controllers
            .try_into()
            .map_err(|_| anyhow!("Expected {N} velocity controllers"))?;

        let executor = TrajectoryExecutor::new(controllers, config.executor_config());
        executor.enable()?;

        Ok(Self {
            sims,
            executor: Arc::new(executor),
        })
    }

    fn step(&self, dt: f64) {
        for sim in &self.sims {
            sim.step(dt);
        }
    }

    fn sample(&self, t: f64) -> TraceSample {
        TraceSample {
            t,
            position_ref: self.executor.position_ref(),
            velocity_ref: self.executor.velocity_ref(),
            average_position: self.executor.current_average_position(),
        }
    }

    fn final_positions(&self) -> Vec<f64> {
        self.sims.iter().map(|sim| sim.angle()).collect()
    }
}

fn simulated_actuator_config(config: &SimulationConfig) -> SimulatedActuatorConfig {
    SimulatedActuatorConfig {
        inertia: config.inertia,
        damping: config.damping,
        torque_constant: config.torque_constant,
        default_mode: config.default_mode,
        ..Default::default()
    }
}

impl SimulateCommand {
    pub fn execute(&self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let report = self.simulate(&config)?;

        report.print();
        if let Some(path) = &self.output {
            report.write_csv(path)?;
            println!("💾 跟踪数据已保存到: {}", path.display());
        }
        Ok(())
    }

    /// 按配置的执行器数量运行仿真
    pub fn simulate(&self, config: &AxisGroupConfig) -> Result<SimulationReport> {
        match config.simulation.actuators {
            1 => self.run::<1>(config),
            2 => self.run::<2>(config),
            3 => self.run::<3>(config),
            4 => self.run::<4>(config),
            n => bail!("simulation.actuators must be between 1 and {MAX_ACTUATORS}, got {n}"),
        }
    }

    fn run<const N: usize>(&self, config: &AxisGroupConfig) -> Result<SimulationReport> {
        let plant = Plant::<N>::build(config)?;
        let schedule = TickSchedule::new(&config.rates)?;
        let duration = match self.duration {
            Some(duration) => duration,
            None => self.estimate_duration(config.planner)?,
        };
        info!(
            "Simulating {} actuators for {:.3}s at {} Hz",
            N, duration, config.rates.controller_hz
        );

        let mut report = if self.realtime {
            self.run_realtime(&plant, schedule, duration)?
        } else {
            self.run_offline(&plant, schedule, duration)?
        };
        report.final_positions = plant.final_positions();
        Ok(report)
    }

    /// 粗略估计：最长一段曲线结束后再运行 [`SETTLE_TIME`]
    fn estimate_duration(&self, planner: PlannerConfig) -> Result<f64> {
        let first = SCurveProfile::new(planner, 0.0, 0.0, 0.0, self.target)?.total_time();
        let second = match self.retarget_plan() {
            Some((at, target)) => {
                let from_start = SCurveProfile::new(planner, 0.0, 0.0, 0.0, target)?;
                let from_target = SCurveProfile::new(planner, self.target, 0.0, 0.0, target)?;
                at + from_start.total_time().max(from_target.total_time())
            },
            None => 0.0,
        };
        Ok(first.max(second) + SETTLE_TIME)
    }

    fn retarget_plan(&self) -> Option<(f64, f64)> {
        self.retarget_at.zip(self.retarget)
    }

    fn run_offline<const N: usize>(
        &self,
        plant: &Plant<N>,
        mut schedule: TickSchedule,
        duration: f64,
    ) -> Result<SimulationReport> {
        plant
            .executor
            .set_target(self.target)
            .with_context(|| format!("Failed to start move to {}", self.target))?;

        let mut report = SimulationReport::default();
        let mut pending = self.retarget_plan();
        let dt = schedule.period();

        schedule.run_for(plant.executor.as_ref(), duration, |t| {
            plant.step(dt);
            report.record(plant.sample(t));

            if let Some((at, target)) = pending
                && t >= at
            {
                pending = None;
                if let Err(err) = plant.executor.set_target(target) {
                    warn!("Retarget to {} at {:.3}s failed: {}", target, t, err);
                    report.retarget_error = Some(err);
                }
            }
        });

        Ok(report)
    }

    fn run_realtime<const N: usize>(
        &self,
        plant: &Plant<N>,
        mut schedule: TickSchedule,
        duration: f64,
    ) -> Result<SimulationReport> {
        let stop = Arc::new(AtomicBool::new(false));
        {
            let stop = stop.clone();
            ctrlc::set_handler(move || stop.store(true, Ordering::Release))
                .context("Failed to install Ctrl-C handler")?;
        }

        let (tx, rx) = crossbeam_channel::unbounded::<TraceSample>();

        let control = {
            let plant = plant.clone();
            let stop = stop.clone();
            thread::Builder::new()
                .name("motion-control".to_string())
                .spawn(move || {
                    let dt = schedule.period();
                    schedule.run_realtime(plant.executor.as_ref(), &stop, |t| {
                        plant.step(dt);
                        // 主线程已退出时丢弃
                        let _ = tx.send(plant.sample(t));
                        t < duration
                    })
                })
                .context("Failed to spawn control thread")?
        };

        let targets = {
            let executor = plant.executor.clone();
            let stop = stop.clone();
            let target = self.target;
            let retarget = self.retarget_plan();
            thread::Builder::new()
                .name("motion-targets".to_string())
                .spawn(move || issue_targets(&executor, target, retarget, &stop))
                .context("Failed to spawn target thread")?
        };

        let mut report = SimulationReport::default();
        for sample in rx {
            report.record(sample);
        }

        stop.store(true, Ordering::Release);
        let stats = control
            .join()
            .map_err(|_| anyhow!("Control thread panicked"))?;
        let retarget_result = targets
            .join()
            .map_err(|_| anyhow!("Target thread panicked"))?;

        match retarget_result {
            Ok(()) => {},
            Err(TargetError::Start(err)) => {
                return Err(err).context(format!("Failed to start move to {}", self.target));
            },
            Err(TargetError::Retarget(err)) => report.retarget_error = Some(err),
        }
        report.stats = Some(stats);
        Ok(report)
    }
}

#[derive(Debug)]
enum TargetError {
    Start(TrajectoryError),
    Retarget(TrajectoryError),
}

/// 后台线程：立即下发目标，到时间后改目标
fn issue_targets<const N: usize>(
    executor: &TrajectoryExecutor<N>,
    target: f64,
    retarget: Option<(f64, f64)>,
    stop: &AtomicBool,
) -> std::result::Result<(), TargetError> {
    if let Err(err) = executor.set_target(target) {
        stop.store(true, Ordering::Release);
        return Err(TargetError::Start(err));
    }

    let Some((at, target)) = retarget else {
        return Ok(());
    };
    let start = Instant::now();
    while start.elapsed().as_secs_f64() < at {
        if stop.load(Ordering::Acquire) {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(1));
    }

    executor.set_target(target).map_err(|err| {
        warn!("Retarget to {} failed: {}", target, err);
        TargetError::Retarget(err)
    })
}
