//! Tick 调度
//!
//! 按 [`RateConfig`] 把一个基准 tick 分发为三种更新：
//!
//! ```text
//! tick k:   k % profile_divider == 0  →  profile_update(profile_dt)
//!           k % error_divider   == 0  →  error_update()
//!           每次                      →  controller_update()
//! ```
//!
//! 同一周期内的顺序固定为 profile → error → controller。
//!
//! - [`TickSchedule::run_for`]: 确定性仿真，不休眠
//! - [`TickSchedule::run_realtime`]: 使用 `spin_sleep` 按墙钟节拍运行

use crate::config::{ConfigFileError, RateConfig};
use motion_control::TrajectoryExecutor;
use spin_sleep::SpinSleeper;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// 被调度的对象
pub trait TickTarget {
    fn profile_update(&self, dt: f64);
    fn error_update(&self);
    fn controller_update(&self);
}

impl<const N: usize> TickTarget for TrajectoryExecutor<N> {
    fn profile_update(&self, dt: f64) {
        TrajectoryExecutor::profile_update(self, dt);
    }

    fn error_update(&self) {
        TrajectoryExecutor::error_update(self);
    }

    fn controller_update(&self) {
        TrajectoryExecutor::controller_update(self);
    }
}

/// 实时运行统计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    /// 已执行的基准 tick 数
    pub ticks: u64,
    /// 超过一个周期才开始执行的 tick 数
    pub overruns: u64,
    /// 最大滞后
    pub max_lateness: Duration,
}

/// Tick 调度器
#[derive(Debug, Clone)]
pub struct TickSchedule {
    period: f64,
    profile_dt: f64,
    profile_divider: u64,
    error_divider: u64,
    tick: u64,
}

impl TickSchedule {
    /// 由频率配置创建
    ///
    /// # 错误
    ///
    /// 频率不合法时返回 [`ConfigFileError::Invalid`]。
    pub fn new(rates: &RateConfig) -> Result<Self, ConfigFileError> {
        if !(rates.controller_hz.is_finite() && rates.controller_hz > 0.0) {
            return Err(ConfigFileError::Invalid(format!(
                "Invalid controller_hz: {} (must be > 0)",
                rates.controller_hz
            )));
        }
        if !(rates.profile_hz > 0.0) || rates.error_divider == 0 {
            return Err(ConfigFileError::Invalid(format!(
                "Invalid rates: profile_hz={}, error_divider={}",
                rates.profile_hz, rates.error_divider
            )));
        }
        if rates.controller_hz > 10000.0 {
            warn!(
                "Very high control frequency: {} Hz. This may cause performance issues.",
                rates.controller_hz
            );
        }

        Ok(Self {
            period: rates.controller_period(),
            profile_dt: rates.profile_period(),
            profile_divider: u64::from(rates.profile_divider()),
            error_divider: u64::from(rates.error_divider),
            tick: 0,
        })
    }

    /// 基准周期（秒）
    pub fn period(&self) -> f64 {
        self.period
    }

    /// 已执行的 tick 数
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// 已经过的调度时间（秒）
    pub fn time(&self) -> f64 {
        self.tick as f64 * self.period
    }

    /// 执行一个基准 tick
    pub fn tick<T: TickTarget + ?Sized>(&mut self, target: &T) {
        if self.tick % self.profile_divider == 0 {
            target.profile_update(self.profile_dt);
        }
        if self.tick % self.error_divider == 0 {
            target.error_update();
        }
        target.controller_update();
        self.tick += 1;
    }

    /// 确定性运行 `duration` 秒
    ///
    /// 每个 tick 之后调用 `after_tick(time)`（例如推进仿真模型）。
    pub fn run_for<T, F>(&mut self, target: &T, duration: f64, mut after_tick: F)
    where
        T: TickTarget + ?Sized,
        F: FnMut(f64),
    {
        let ticks = (duration / self.period).round().max(0.0) as u64;
        for _ in 0..ticks {
            self.tick(target);
            after_tick(self.time());
        }
    }

    /// 按墙钟节拍运行，直到 `stop` 被置位或 `after_tick` 返回 `false`
    ///
    /// 使用绝对截止时间计算下一次唤醒，单次超时不会累积漂移。
    pub fn run_realtime<T, F>(
        &mut self,
        target: &T,
        stop: &AtomicBool,
        mut after_tick: F,
    ) -> RunStats
    where
        T: TickTarget + ?Sized,
        F: FnMut(f64) -> bool,
    {
        let period = Duration::from_secs_f64(self.period);
        let sleeper = SpinSleeper::default();
        let start = Instant::now();
        let mut stats = RunStats::default();
        let mut deadline = start;

        while !stop.load(Ordering::Acquire) {
            let now = Instant::now();
            if now > deadline {
                let lateness = now - deadline;
                if lateness > period {
                    stats.overruns += 1;
                    trace!("tick {} late by {:?}", self.tick, lateness);
                }
                stats.max_lateness = stats.max_lateness.max(lateness);
            }

            self.tick(target);
            stats.ticks += 1;
            if !after_tick(self.time()) {
                break;
            }

            deadline += period;
            let now = Instant::now();
            if deadline > now {
                sleeper.sleep(deadline - now);
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<&'static str>>,
        profile_dt: RefCell<Vec<f64>>,
    }

    impl TickTarget for Recorder {
        fn profile_update(&self, dt: f64) {
            self.calls.borrow_mut().push("profile");
            self.profile_dt.borrow_mut().push(dt);
        }

        fn error_update(&self) {
            self.calls.borrow_mut().push("error");
        }

        fn controller_update(&self) {
            self.calls.borrow_mut().push("controller");
        }
    }

    fn count(recorder: &Recorder, name: &str) -> usize {
        recorder.calls.borrow().iter().filter(|c| **c == name).count()
    }

    #[test]
    fn test_dividers() {
        let mut schedule = TickSchedule::new(&RateConfig::default()).unwrap();
        let recorder = Recorder::default();

        schedule.run_for(&recorder, 0.1, |_| {});

        assert_eq!(schedule.ticks(), 100);
        assert_eq!(count(&recorder, "controller"), 100);
        assert_eq!(count(&recorder, "error"), 50);
        assert_eq!(count(&recorder, "profile"), 20);
        assert!(
            recorder
                .profile_dt
                .borrow()
                .iter()
                .all(|dt| (dt - 0.005).abs() < 1e-12)
        );
    }

    #[test]
    fn test_order_within_tick() {
        let mut schedule = TickSchedule::new(&RateConfig::default()).unwrap();
        let recorder = Recorder::default();
        schedule.tick(&recorder);
        assert_eq!(
            *recorder.calls.borrow(),
            vec!["profile", "error", "controller"]
        );
    }

    #[test]
    fn test_invalid_rates() {
        let rates = RateConfig {
            controller_hz: 0.0,
            ..Default::default()
        };
        assert!(TickSchedule::new(&rates).is_err());

        let rates = RateConfig {
            error_divider: 0,
            ..Default::default()
        };
        assert!(TickSchedule::new(&rates).is_err());
    }

    #[test]
    fn test_run_realtime_stops_on_callback() {
        let rates = RateConfig {
            controller_hz: 2000.0,
            error_divider: 1,
            profile_hz: 1000.0,
        };
        let mut schedule = TickSchedule::new(&rates).unwrap();
        let recorder = Recorder::default();
        let stop = AtomicBool::new(false);

        let stats = schedule.run_realtime(&recorder, &stop, |_| schedule_done(&recorder));
        assert_eq!(stats.ticks, 10);
        assert_eq!(count(&recorder, "profile"), 5);
    }

    fn schedule_done(recorder: &Recorder) -> bool {
        count(recorder, "controller") < 10
    }

    #[test]
    fn test_run_realtime_respects_stop_flag() {
        let mut schedule = TickSchedule::new(&RateConfig::default()).unwrap();
        let recorder = Recorder::default();
        let stop = AtomicBool::new(true);

        let stats = schedule.run_realtime(&recorder, &stop, |_| true);
        assert_eq!(stats.ticks, 0);
    }
}
