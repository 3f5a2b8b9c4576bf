//! JerkRamp - 单侧加速过程
//!
//! 从 `v_start` 加速到 `v_peak`，起止加速度均为 0，加加速度恒为 `±j_max`。
//!
//! # 分段
//!
//! ```text
//! 有匀加速段（j_max·Δv > a_max²）:
//!   [0, t1)      加加速   a = j·t
//!   [t1, t2)     匀加速   a = a_max
//!   [t2, T)      减加速   a = j·(T - t)
//!
//! 无匀加速段:
//!   [0, t1)      加加速   峰值加速度 ap = √(j·Δv)
//!   [t1, T)      减加速
//! ```
//!
//! 超出 `[0, T]` 时：`t <= 0` 为起始状态，`t >= T` 为终止状态（加速度为 0）。

/// 单侧加速过程
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JerkRamp {
    /// 是否有匀加速段
    has_plateau: bool,
    v_start: f64,
    v_peak: f64,
    j_max: f64,

    /// 实际使用的峰值加速度
    a_peak: f64,

    /// 加加速段与匀加速段时刻分界
    t1: f64,
    /// 加加速段与匀加速段距离分界
    x1: f64,
    /// 加加速段与匀加速段速度分界
    v1: f64,
    /// 匀加速段与减加速段时刻分界
    t2: f64,

    total_time: f64,
    total_distance: f64,
}

impl JerkRamp {
    /// 构造从 `v_start` 到 `v_peak` 的加速过程
    ///
    /// `a_max`、`j_max` 必须为正；`v_peak < v_start` 视为零长度过程。
    pub fn new(v_start: f64, v_peak: f64, a_max: f64, j_max: f64) -> Self {
        let dv = (v_peak - v_start).max(0.0);
        let has_plateau = j_max * dv > a_max * a_max;

        if has_plateau {
            let t1 = a_max / j_max;
            let t2 = dv / a_max;
            let v1 = v_start + 0.5 * a_max * t1;
            let x1 = v_start * t1 + a_max * t1 * t1 / 6.0;

            Self {
                has_plateau,
                v_start,
                v_peak,
                j_max,
                a_peak: a_max,
                t1,
                x1,
                v1,
                t2,
                total_time: t2 + t1,
                total_distance: (v_peak * v_peak - v_start * v_start) / (2.0 * a_max)
                    + 0.5 * (v_start + v_peak) * t1,
            }
        } else {
            let a_peak = (j_max * dv).sqrt();
            let t1 = if j_max > 0.0 { a_peak / j_max } else { 0.0 };
            let v1 = v_start + 0.5 * a_peak * t1;
            let x1 = v_start * t1 + a_peak * t1 * t1 / 6.0;
            let half_time = if j_max > 0.0 { (dv / j_max).sqrt() } else { 0.0 };

            Self {
                has_plateau,
                v_start,
                v_peak,
                j_max,
                a_peak,
                t1,
                x1,
                v1,
                t2: t1,
                total_time: 2.0 * half_time,
                total_distance: (v_start + v_peak) * half_time,
            }
        }
    }

    /// 时刻 `t` 的位移（相对起点）
    pub fn distance(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t < self.t1 {
            return self.v_start * t + self.j_max * t * t * t / 6.0;
        }
        // 除匀加速段外，两种情况的计算方式相同
        if self.has_plateau && t < self.t2 {
            let dt = t - self.t1;
            return self.x1 + self.v1 * dt + 0.5 * self.a_peak * dt * dt;
        }
        if t < self.total_time {
            let rt = self.total_time - t;
            return self.total_distance - self.v_peak * rt + self.j_max * rt * rt * rt / 6.0;
        }
        self.total_distance
    }

    /// 时刻 `t` 的速度
    pub fn velocity(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.v_start;
        }
        if t < self.t1 {
            return self.v_start + 0.5 * self.j_max * t * t;
        }
        if self.has_plateau && t < self.t2 {
            return self.v1 + self.a_peak * (t - self.t1);
        }
        if t < self.total_time {
            let rt = self.total_time - t;
            return self.v_peak - 0.5 * self.j_max * rt * rt;
        }
        self.v_peak
    }

    /// 时刻 `t` 的加速度
    pub fn acceleration(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t < self.t1 {
            return self.j_max * t;
        }
        if self.has_plateau && t < self.t2 {
            return self.a_peak;
        }
        if t < self.total_time {
            return self.j_max * (self.total_time - t);
        }
        0.0
    }

    /// 是否有匀加速段
    pub fn has_plateau(&self) -> bool {
        self.has_plateau
    }

    /// 实际峰值加速度
    pub fn peak_acceleration(&self) -> f64 {
        self.a_peak
    }

    /// 起始速度
    pub fn start_velocity(&self) -> f64 {
        self.v_start
    }

    /// 终止速度
    pub fn peak_velocity(&self) -> f64 {
        self.v_peak
    }

    /// 加加速段结束时刻
    pub fn jerk_phase_end(&self) -> f64 {
        self.t1
    }

    /// 匀加速段结束时刻（无匀加速段时等于 [`jerk_phase_end`](Self::jerk_phase_end)）
    pub fn plateau_end(&self) -> f64 {
        self.t2
    }

    /// 总时长
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// 总位移
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }
}
