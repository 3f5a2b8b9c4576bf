//! SCurveProfile - 点到点 S 形运动曲线
//!
//! 从任意起点状态 `(x_start, v_start, a_start)` 运动到静止的目标位置 `x_end`，
//! 速度、加速度、加加速度均不超过 [`PlannerConfig`] 给出的上限。
//!
//! # 阶段划分
//!
//! ```text
//!   t <= 0        起点状态
//!   [0, t0)       刹车段：初加速度与运动方向相反时，以恒定加加速度把加速度降到 0
//!   [t0, t1)      入口斜坡：JerkRamp(v_start', v_peak)，可能带虚拟时间偏移 ts1
//!   [t1, t2)      匀速段：以 v_peak 匀速运动（距离不足时不存在）
//!   [t2, T)       出口斜坡：JerkRamp(0, v_peak) 按时间反向播放
//!   t >= T        目标状态
//! ```
//!
//! 所有计算都在"运动方向坐标系"中进行：`v_start`、`a_start` 先乘以方向符号，
//! 查询结果再乘回去。
//!
//! 没有匀速段时，用二分查找确定峰值速度，使入口斜坡与出口斜坡的距离之和
//! 等于剩余行程。

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::profile::VelocityProfile;
use crate::ramp::JerkRamp;
use tracing::{debug, trace};

/// 行程小于该值时视为零长度运动
pub const ZERO_DISTANCE_EPSILON: f64 = 1e-6;

/// 二分查找的距离容差
pub const MAX_SEARCH_ERROR: f64 = 1e-3;

/// 二分查找的最大迭代次数
///
/// 每次迭代构造两条 [`JerkRamp`]（常数次浮点运算）。区间 `[v_peak_min, v_max]`
/// 每次减半，约 13 次后宽度降到 `v_max / 8192`，之后继续细化到
/// [`SEARCH_REFINE_ERROR`]；最坏情况 64 次，即 128 次斜坡构造，
/// 此时区间已收缩到 `f64` 精度。
const MAX_SEARCH_ITERATIONS: usize = 64;

/// 二分查找提前结束的残差，远小于 [`MAX_SEARCH_ERROR`]，使斜坡衔接处的位置跳变可忽略
const SEARCH_REFINE_ERROR: f64 = 1e-9;

/// 曲线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfilePhase {
    /// 起点之前（`t <= 0`）
    Before,
    /// 刹车段
    Braking,
    /// 入口斜坡
    Entry,
    /// 匀速段
    Cruise,
    /// 出口斜坡
    Exit,
    /// 运动结束
    Done,
}

/// 点到点 S 形运动曲线
///
/// 只能通过 [`SCurveProfile::new`] 或 [`SCurveProfile::at_rest`] 构造，
/// 构造成功后不可变。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SCurveProfile {
    /// 运动方向（+1 / -1）
    direction: f64,
    has_cruise: bool,
    v_peak: f64,

    // 方向坐标系下的起点状态
    v_start: f64,
    a_start: f64,
    j_max: f64,

    /// 刹车段结束时刻
    t0: f64,
    /// 刹车段结束位置
    x0: f64,
    x_start: f64,
    /// 入口斜坡结束位置
    x1: f64,
    x_end: f64,

    entry: JerkRamp,
    /// 入口斜坡的虚拟时间偏移
    ts1: f64,
    /// 入口斜坡在 ts1 处已"走过"的距离
    xs1: f64,
    /// 入口斜坡结束时刻
    t1: f64,
    /// 匀速段结束时刻
    t2: f64,
    exit: JerkRamp,

    total_time: f64,
}

/// 起点状态经过刹车 / 偏移处理后的入口条件
#[derive(Debug, Clone, Copy)]
struct EntryState {
    t0: f64,
    x0: f64,
    dx0: f64,
    /// 入口斜坡的理想起始速度
    v_start: f64,
    ts1: f64,
    /// 可达的最低峰值速度
    v_peak_min: f64,
}

/// 一次试算得到的两段斜坡
#[derive(Debug, Clone, Copy)]
struct RampPair {
    entry: JerkRamp,
    exit: JerkRamp,
    xs1: f64,
    /// 入口斜坡实际走过的距离
    dx1: f64,
    /// 出口斜坡走过的距离
    dx3: f64,
}

impl RampPair {
    fn build(entry_state: &EntryState, v_peak: f64, a_max: f64, j_max: f64) -> Self {
        let entry = JerkRamp::new(entry_state.v_start, v_peak, a_max, j_max);
        let exit = JerkRamp::new(0.0, v_peak, a_max, j_max);
        let xs1 = entry.distance(entry_state.ts1);

        Self {
            entry,
            exit,
            xs1,
            dx1: entry.total_distance() - xs1,
            dx3: exit.total_distance(),
        }
    }
}

impl SCurveProfile {
    /// 规划一条从 `(x_start, v_start, a_start)` 到静止于 `x_end` 的曲线
    ///
    /// # 参数
    ///
    /// - `config`: 规划上限，按绝对值解释
    /// - `x_start` / `v_start` / `a_start`: 起点位置、速度、加速度
    /// - `x_end`: 目标位置
    ///
    /// # 返回
    ///
    /// - `Ok(profile)`: 规划成功
    /// - `Err(PlanError)`: 起点状态超限或目标不可达
    ///
    /// 行程小于 [`ZERO_DISTANCE_EPSILON`] 时直接返回零时长曲线，不检查上限。
    pub fn new(
        config: PlannerConfig,
        x_start: f64,
        v_start: f64,
        a_start: f64,
        x_end: f64,
    ) -> Result<Self, PlanError> {
        if ![x_start, v_start, a_start, x_end].iter().all(|v| v.is_finite()) {
            return Err(PlanError::NonFiniteState {
                x_start,
                v_start,
                a_start,
                x_end,
            });
        }

        let PlannerConfig {
            v_max,
            a_max,
            j_max,
        } = config.magnitudes();

        let direction = if x_end > x_start { 1.0 } else { -1.0 };
        let vs = v_start * direction;
        let a_s = a_start * direction;
        let len = (x_end - x_start).abs();

        if len < ZERO_DISTANCE_EPSILON {
            return Ok(Self::degenerate(direction, x_start, vs, a_s, x_end));
        }

        let limits_valid = [v_max, a_max, j_max]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0);
        if !limits_valid {
            return Err(PlanError::InvalidLimits {
                v_max,
                a_max,
                j_max,
            });
        }

        if vs.abs() > v_max {
            return Err(PlanError::InitialVelocityExceedsLimit {
                velocity: v_start,
                limit: v_max,
            });
        }
        if a_s.abs() > a_max {
            return Err(PlanError::InitialAccelerationExceedsLimit {
                acceleration: a_start,
                limit: a_max,
            });
        }

        let entry_state = Self::entry_state(direction, x_start, vs, a_s, v_max, j_max)?;
        let remaining = len - entry_state.dx0;

        // 先假设以 v_max 匀速
        let pair = RampPair::build(&entry_state, v_max, a_max, j_max);
        let x_const = remaining - pair.dx1 - pair.dx3;

        let (v_peak, pair, cruise_len) = if x_const > 0.0 {
            (v_max, pair, x_const)
        } else {
            let (v_peak, pair) =
                Self::search_peak_velocity(&entry_state, remaining, v_max, a_max, j_max)?;
            (v_peak, pair, 0.0)
        };

        let t1 = entry_state.t0 + pair.entry.total_time() - entry_state.ts1;
        let t2 = t1 + cruise_len / v_peak;
        let x1 = entry_state.x0 + direction * pair.dx1;

        let profile = Self {
            direction,
            has_cruise: cruise_len > 0.0,
            v_peak,
            v_start: vs,
            a_start: a_s,
            j_max,
            t0: entry_state.t0,
            x0: entry_state.x0,
            x_start,
            x1,
            x_end,
            entry: pair.entry,
            ts1: entry_state.ts1,
            xs1: pair.xs1,
            t1,
            t2,
            exit: pair.exit,
            total_time: t2 + pair.exit.total_time(),
        };

        debug!(
            "Planned S-curve {:.4} -> {:.4}: v_peak={:.4}, cruise={}, total_time={:.4}s",
            x_start, x_end, v_peak, profile.has_cruise, profile.total_time
        );

        Ok(profile)
    }

    /// 静止于 `x` 的零时长曲线
    pub fn at_rest(x: f64) -> Self {
        Self::degenerate(1.0, x, 0.0, 0.0, x)
    }

    fn degenerate(direction: f64, x_start: f64, vs: f64, a_s: f64, x_end: f64) -> Self {
        Self {
            direction,
            has_cruise: false,
            v_peak: 0.0,
            v_start: vs,
            a_start: a_s,
            j_max: 0.0,
            t0: 0.0,
            x0: x_start,
            x_start,
            x1: x_start,
            x_end,
            entry: JerkRamp::default(),
            ts1: 0.0,
            xs1: 0.0,
            t1: 0.0,
            t2: 0.0,
            exit: JerkRamp::default(),
            total_time: 0.0,
        }
    }

    /// 处理初加速度：反向时插入刹车段，同向时记录虚拟时间偏移
    fn entry_state(
        direction: f64,
        x_start: f64,
        vs: f64,
        a_s: f64,
        v_max: f64,
        j_max: f64,
    ) -> Result<EntryState, PlanError> {
        if a_s < 0.0 {
            let t0 = -a_s / j_max;
            let v_braked = vs - 0.5 * a_s * a_s / j_max;
            if v_braked.abs() > v_max {
                return Err(PlanError::BrakingExceedsVelocityLimit {
                    velocity: v_braked * direction,
                    limit: v_max,
                });
            }
            let dx0 = vs * t0 + a_s * t0 * t0 / 3.0;

            Ok(EntryState {
                t0,
                x0: x_start + direction * dx0,
                dx0,
                v_start: v_braked,
                ts1: 0.0,
                v_peak_min: v_braked.max(0.0),
            })
        } else {
            let v_peak_min = vs + 0.5 * a_s * a_s / j_max;
            if v_max < v_peak_min {
                return Err(PlanError::PeakVelocityUnreachable {
                    required: v_peak_min,
                    limit: v_max,
                });
            }
            let ts1 = a_s / j_max;

            Ok(EntryState {
                t0: 0.0,
                x0: x_start,
                dx0: 0.0,
                v_start: vs - 0.5 * a_s * ts1,
                ts1,
                v_peak_min: v_peak_min.max(0.0),
            })
        }
    }

    /// 二分查找峰值速度，使入口 + 出口斜坡距离等于剩余行程
    fn search_peak_velocity(
        entry_state: &EntryState,
        remaining: f64,
        v_max: f64,
        a_max: f64,
        j_max: f64,
    ) -> Result<(f64, RampPair), PlanError> {
        let mut lo = entry_state.v_peak_min;
        let mut hi = v_max;
        let mut v_peak = hi;
        let mut pair = RampPair::build(entry_state, v_peak, a_max, j_max);
        let mut residual = pair.dx1 + pair.dx3 - remaining;

        for iteration in 0..MAX_SEARCH_ITERATIONS {
            if residual.abs() < SEARCH_REFINE_ERROR || hi - lo <= f64::EPSILON * v_max {
                break;
            }

            v_peak = 0.5 * (lo + hi);
            pair = RampPair::build(entry_state, v_peak, a_max, j_max);
            residual = pair.dx1 + pair.dx3 - remaining;
            trace!(iteration, v_peak, residual, "peak velocity search");

            if residual > 0.0 {
                hi = v_peak;
            } else {
                lo = v_peak;
            }
        }

        if residual.abs() >= MAX_SEARCH_ERROR {
            debug!(
                "Peak velocity search failed: residual={:.6} in [{:.6}, {:.6}]",
                residual, lo, hi
            );
            return Err(PlanError::SearchDiverged { residual });
        }

        Ok((v_peak, pair))
    }

    /// 是否存在匀速段
    pub fn has_constant_phase(&self) -> bool {
        self.has_cruise
    }

    /// 峰值速度（运动方向坐标系，通常为正）
    pub fn peak_velocity(&self) -> f64 {
        self.v_peak
    }

    /// 运动方向（+1 / -1）
    pub fn direction(&self) -> f64 {
        self.direction
    }

    /// 起点位置
    pub fn start_position(&self) -> f64 {
        self.x_start
    }

    /// 目标位置
    pub fn target_position(&self) -> f64 {
        self.x_end
    }

    /// 阶段分界时刻 `[t0, t1, t2, total_time]`
    pub fn boundaries(&self) -> [f64; 4] {
        [self.t0, self.t1, self.t2, self.total_time]
    }

    /// 入口斜坡
    pub fn entry_ramp(&self) -> &JerkRamp {
        &self.entry
    }

    /// 出口斜坡
    pub fn exit_ramp(&self) -> &JerkRamp {
        &self.exit
    }

    /// 时刻 `t` 所处阶段
    pub fn phase_at(&self, t: f64) -> ProfilePhase {
        if t <= 0.0 {
            ProfilePhase::Before
        } else if t < self.t0 {
            ProfilePhase::Braking
        } else if t < self.t1 {
            ProfilePhase::Entry
        } else if t < self.t2 {
            ProfilePhase::Cruise
        } else if t < self.total_time {
            ProfilePhase::Exit
        } else {
            ProfilePhase::Done
        }
    }

    /// 入口斜坡的内部时间
    #[inline]
    fn entry_time(&self, t: f64) -> f64 {
        t - self.t0 + self.ts1
    }
}

impl VelocityProfile for SCurveProfile {
    fn calc_x(&self, t: f64) -> f64 {
        let d = self.direction;
        match self.phase_at(t) {
            ProfilePhase::Before => self.x_start,
            ProfilePhase::Braking => {
                let dx = self.v_start * t
                    + 0.5 * self.a_start * t * t
                    + self.j_max * t * t * t / 6.0;
                self.x_start + d * dx
            },
            ProfilePhase::Entry => {
                self.x0 + d * (self.entry.distance(self.entry_time(t)) - self.xs1)
            },
            ProfilePhase::Cruise => self.x1 + d * self.v_peak * (t - self.t1),
            ProfilePhase::Exit => self.x_end - d * self.exit.distance(self.total_time - t),
            ProfilePhase::Done => self.x_end,
        }
    }

    fn calc_v(&self, t: f64) -> f64 {
        let d = self.direction;
        match self.phase_at(t) {
            ProfilePhase::Before => d * self.v_start,
            ProfilePhase::Braking => {
                d * (self.v_start + self.a_start * t + 0.5 * self.j_max * t * t)
            },
            ProfilePhase::Entry => d * self.entry.velocity(self.entry_time(t)),
            ProfilePhase::Cruise => d * self.v_peak,
            ProfilePhase::Exit => d * self.exit.velocity(self.total_time - t),
            ProfilePhase::Done => 0.0,
        }
    }

    fn calc_a(&self, t: f64) -> f64 {
        let d = self.direction;
        match self.phase_at(t) {
            ProfilePhase::Before => d * self.a_start,
            ProfilePhase::Braking => d * (self.a_start + self.j_max * t),
            ProfilePhase::Entry => d * self.entry.acceleration(self.entry_time(t)),
            ProfilePhase::Cruise => 0.0,
            ProfilePhase::Exit => -d * self.exit.acceleration(self.total_time - t),
            ProfilePhase::Done => 0.0,
        }
    }

    fn total_time(&self) -> f64 {
        self.total_time
    }

    fn success(&self) -> bool {
        true
    }
}

impl Default for SCurveProfile {
    fn default() -> Self {
        Self::at_rest(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn config() -> PlannerConfig {
        PlannerConfig::new(360.0, 180.0, 360.0)
    }

    /// 检查各阶段分界处的速度、加速度连续性
    fn assert_continuous(profile: &SCurveProfile) {
        let eps = 1e-9;
        for boundary in profile.boundaries() {
            if boundary <= 0.0 {
                continue;
            }
            assert_abs_diff_eq!(
                profile.calc_v(boundary - eps),
                profile.calc_v(boundary + eps),
                epsilon = 1e-3
            );
            assert_abs_diff_eq!(
                profile.calc_a(boundary - eps),
                profile.calc_a(boundary + eps),
                epsilon = 1e-3
            );
            assert_abs_diff_eq!(
                profile.calc_x(boundary - eps),
                profile.calc_x(boundary + eps),
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn test_short_move_without_cruise() {
        let profile = SCurveProfile::new(config(), 0.0, 0.0, 0.0, 90.0).unwrap();

        assert!(profile.success());
        assert!(!profile.has_constant_phase());
        assert_abs_diff_eq!(profile.peak_velocity(), 90.0, epsilon = 1e-2);
        assert_abs_diff_eq!(profile.total_time(), 2.0, epsilon = 1e-3);
        assert_abs_diff_eq!(profile.calc_x(0.0), 0.0);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), 90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time() / 2.0), 45.0, epsilon = 1e-2);
        assert_continuous(&profile);
    }

    #[test]
    fn test_long_move_with_cruise() {
        let profile = SCurveProfile::new(config(), 0.0, 0.0, 0.0, 1000.0).unwrap();

        assert!(profile.has_constant_phase());
        assert_eq!(profile.peak_velocity(), 360.0);
        // 2.5s 入口 + 100/360 s 匀速 + 2.5s 出口
        assert_abs_diff_eq!(profile.total_time(), 5.0 + 100.0 / 360.0, epsilon = 1e-9);
        assert_eq!(profile.phase_at(2.6), ProfilePhase::Cruise);
        assert_abs_diff_eq!(profile.calc_v(2.6), 360.0);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), 1000.0, epsilon = 1e-9);
        assert_continuous(&profile);
    }

    #[test]
    fn test_negative_direction() {
        let profile = SCurveProfile::new(config(), 10.0, 0.0, 0.0, -80.0).unwrap();

        assert_eq!(profile.direction(), -1.0);
        let mid = profile.total_time() / 2.0;
        assert!(profile.calc_v(mid) < 0.0);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), -80.0, epsilon = 1e-3);
        assert_continuous(&profile);
    }

    #[test]
    fn test_cruise_boundary_is_inclusive() {
        // v_max 恰好等于无匀速段所需峰值速度：x_const == 0
        let config = PlannerConfig::new(1.0, 1.0, 1.0);
        let profile = SCurveProfile::new(config, 0.0, 0.0, 0.0, 2.0).unwrap();

        assert!(!profile.has_constant_phase());
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_opposing_acceleration_inserts_braking() {
        let profile = SCurveProfile::new(config(), 0.0, 50.0, -90.0, 300.0).unwrap();

        let [t0, ..] = profile.boundaries();
        assert_abs_diff_eq!(t0, 0.25, epsilon = 1e-12);
        assert_eq!(profile.phase_at(0.1), ProfilePhase::Braking);
        assert_abs_diff_eq!(profile.calc_a(0.0), -90.0);
        assert_abs_diff_eq!(profile.calc_a(1e-9), -90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(profile.calc_v(0.0), 50.0);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), 300.0, epsilon = 1e-3);
        assert_continuous(&profile);
    }

    #[test]
    fn test_aligned_acceleration_uses_virtual_offset() {
        let profile = SCurveProfile::new(config(), 5.0, 20.0, 90.0, 400.0).unwrap();

        let [t0, ..] = profile.boundaries();
        assert_eq!(t0, 0.0);
        assert_eq!(profile.phase_at(1e-6), ProfilePhase::Entry);
        assert_abs_diff_eq!(profile.calc_a(0.0), 90.0);
        assert_abs_diff_eq!(profile.calc_a(1e-9), 90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(profile.calc_v(1e-9), 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), 400.0, epsilon = 1e-3);
        assert_continuous(&profile);
    }

    #[test]
    fn test_start_state_is_reproduced_in_world_frame() {
        // 负方向运动时，起点速度 / 加速度仍按原坐标系返回
        let profile = SCurveProfile::new(config(), 0.0, -30.0, -40.0, -200.0).unwrap();
        assert_eq!(profile.calc_v(0.0), -30.0);
        assert_eq!(profile.calc_a(0.0), -40.0);
        assert_eq!(profile.calc_x(-1.0), 0.0);
    }

    #[test]
    fn test_degenerate_profile() {
        let profile = SCurveProfile::new(config(), 12.0, 3.0, 1.0, 12.0).unwrap();

        assert!(profile.success());
        assert_eq!(profile.total_time(), 0.0);
        for t in [-1.0, 0.0, 0.5, 10.0] {
            assert_eq!(profile.calc_x(t), 12.0);
        }
        assert_eq!(profile.calc_v(0.0), 3.0);
        assert_eq!(profile.calc_v(1.0), 0.0);
    }

    #[test]
    fn test_degenerate_profile_skips_limit_checks() {
        let config = PlannerConfig::new(0.0, 0.0, 0.0);
        let profile = SCurveProfile::new(config, 1.0, 100.0, 100.0, 1.0 + 1e-7).unwrap();
        assert_eq!(profile.total_time(), 0.0);
    }

    #[test]
    fn test_at_rest() {
        let profile = SCurveProfile::at_rest(-4.0);
        assert_eq!(profile.total_time(), 0.0);
        assert_eq!(profile.calc_x(3.0), -4.0);
        assert_eq!(profile.calc_v(0.0), 0.0);
        assert_eq!(profile.calc_a(0.0), 0.0);
        assert_eq!(profile.phase_at(1.0), ProfilePhase::Done);
    }

    #[test]
    fn test_rejects_initial_state_over_limits() {
        assert!(matches!(
            SCurveProfile::new(config(), 0.0, 400.0, 0.0, 90.0),
            Err(PlanError::InitialVelocityExceedsLimit { .. })
        ));
        assert!(matches!(
            SCurveProfile::new(config(), 0.0, 0.0, -200.0, 90.0),
            Err(PlanError::InitialAccelerationExceedsLimit { .. })
        ));
    }

    #[test]
    fn test_rejects_braking_over_velocity_limit() {
        let config = PlannerConfig::new(100.0, 50.0, 10.0);
        // 远离目标方向运动且继续反向加速
        let result = SCurveProfile::new(config, 0.0, -90.0, -50.0, 100.0);
        assert!(matches!(
            result,
            Err(PlanError::BrakingExceedsVelocityLimit { .. })
        ));
    }

    #[test]
    fn test_rejects_unreachable_peak_velocity() {
        let config = PlannerConfig::new(100.0, 50.0, 10.0);
        let result = SCurveProfile::new(config, 0.0, 90.0, 50.0, 1000.0);
        assert!(matches!(
            result,
            Err(PlanError::PeakVelocityUnreachable { .. })
        ));
    }

    #[test]
    fn test_rejects_overshooting_move() {
        // 以最高速度冲向 1 个单位外的目标，无法在行程内停下
        let config = PlannerConfig::new(100.0, 10.0, 10.0);
        let result = SCurveProfile::new(config, 0.0, 100.0, 0.0, 1.0);
        assert!(matches!(result, Err(PlanError::SearchDiverged { .. })));
    }

    #[test]
    fn test_rejects_invalid_limits() {
        let config = PlannerConfig::new(100.0, 10.0, 0.0);
        assert!(matches!(
            SCurveProfile::new(config, 0.0, 0.0, 0.0, 10.0),
            Err(PlanError::InvalidLimits { .. })
        ));

        assert!(matches!(
            SCurveProfile::new(PlannerConfig::default(), 0.0, f64::NAN, 0.0, 10.0),
            Err(PlanError::NonFiniteState { .. })
        ));
    }

    #[test]
    fn test_phase_order() {
        let profile = SCurveProfile::new(config(), 0.0, 0.0, 0.0, 1000.0).unwrap();
        let [_, t1, t2, total] = profile.boundaries();

        assert_eq!(profile.phase_at(0.0), ProfilePhase::Before);
        assert_eq!(profile.phase_at(t1 / 2.0), ProfilePhase::Entry);
        assert_eq!(profile.phase_at((t1 + t2) / 2.0), ProfilePhase::Cruise);
        assert_eq!(profile.phase_at((t2 + total) / 2.0), ProfilePhase::Exit);
        assert_eq!(profile.phase_at(total), ProfilePhase::Done);
    }

    #[test]
    fn test_search_terminates_on_wide_bracket() {
        // 速度上限远大于可达峰值，区间需要多次减半
        let config = PlannerConfig::new(1e6, 1.0, 1.0);
        let profile = SCurveProfile::new(config, 0.0, 0.0, 0.0, 0.01).unwrap();

        assert!(!profile.has_constant_phase());
        assert!(profile.peak_velocity() < 1.0);
        assert_abs_diff_eq!(profile.calc_x(profile.total_time()), 0.01, epsilon = 1e-12);
        let [_, t1, _, _] = profile.boundaries();
        let jump = (profile.calc_x(t1 + 1e-9) - profile.calc_x(t1 - 1e-9)).abs();
        assert!(jump < MAX_SEARCH_ERROR, "position jump {jump}");
    }
}
