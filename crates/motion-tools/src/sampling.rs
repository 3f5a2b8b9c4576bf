//! 速度曲线采样（纯函数）

use motion_profile::VelocityProfile;
use serde::Serialize;
use std::io;

/// 一个采样点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSample {
    pub t: f64,
    pub x: f64,
    pub v: f64,
    pub a: f64,
}

/// 采样结果统计
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProfileSummary {
    pub total_time: f64,
    pub max_abs_velocity: f64,
    pub max_abs_acceleration: f64,
    /// 由相邻采样点加速度差分估计
    pub max_abs_jerk: f64,
}

/// 以 `rate_hz` 采样整条曲线
///
/// 采样点为 `0, 1/rate, 2/rate, ...`，最后一个点总是 `total_time`。
/// `rate_hz` 非正时返回空列表。
pub fn sample_profile(profile: &dyn VelocityProfile, rate_hz: f64) -> Vec<ProfileSample> {
    if !(rate_hz.is_finite() && rate_hz > 0.0) {
        return Vec::new();
    }

    let total = profile.total_time();
    let sample = |t: f64| ProfileSample {
        t,
        x: profile.calc_x(t),
        v: profile.calc_v(t),
        a: profile.calc_a(t),
    };

    let steps = (total * rate_hz).floor() as usize;
    let mut samples: Vec<_> = (0..=steps).map(|k| sample(k as f64 / rate_hz)).collect();
    if samples.last().is_none_or(|last| last.t < total) {
        samples.push(sample(total));
    }
    samples
}

/// 统计采样结果
pub fn summarize(samples: &[ProfileSample]) -> ProfileSummary {
    let mut summary = ProfileSummary {
        total_time: samples.last().map_or(0.0, |s| s.t),
        ..Default::default()
    };

    for sample in samples {
        summary.max_abs_velocity = summary.max_abs_velocity.max(sample.v.abs());
        summary.max_abs_acceleration = summary.max_abs_acceleration.max(sample.a.abs());
    }
    for pair in samples.windows(2) {
        let dt = pair[1].t - pair[0].t;
        if dt > 0.0 {
            let jerk = ((pair[1].a - pair[0].a) / dt).abs();
            summary.max_abs_jerk = summary.max_abs_jerk.max(jerk);
        }
    }
    summary
}

/// 以 CSV（`t,x,v,a`）写出采样结果
pub fn write_csv<W: io::Write>(samples: &[ProfileSample], mut writer: W) -> io::Result<()> {
    writeln!(writer, "t,x,v,a")?;
    for s in samples {
        writeln!(writer, "{:.6},{:.6},{:.6},{:.6}", s.t, s.x, s.v, s.a)?;
    }
    Ok(())
}
