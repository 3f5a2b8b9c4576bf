//! Compensator - 单级反馈补偿器
//!
//! 两种实现共享同一接口：`calc(reference, feedback) -> output`，输出限幅在
//! `±abs_output_max` 内，可随时 `reset()`。
//!
//! # 算法
//!
//! ```text
//! PD:        e = ref - fdb
//!            out = Kp·e + Kd·(e - e₁)
//!
//! 电机 PID（增量式，输出本身即为积分器）:
//!            out += Kp·(e - e₁) + Ki·e + Kd·(e - 2·e₁ + e₂)
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 反馈补偿器通用接口
pub trait Compensator: Send {
    /// 参数类型
    type Config;

    /// 输入参考值与反馈值，计算并返回新的输出
    fn calc(&mut self, reference: f64, feedback: f64) -> f64;

    /// 清除历史误差与输出
    fn reset(&mut self);

    /// 更新参数（不清除历史状态）
    fn set_config(&mut self, config: Self::Config);

    /// 最近一次的输出
    fn output(&self) -> f64;
}

/// 把 `value` 限制在 `±limit` 内
#[inline]
fn clamp_abs(value: f64, limit: f64) -> f64 {
    let limit = limit.abs();
    if value > limit {
        limit
    } else if value < -limit {
        -limit
    } else {
        value
    }
}

/// PD 参数
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PdConfig {
    pub kp: f64,
    pub kd: f64,
    /// 输出绝对值上限
    pub abs_output_max: f64,
}

impl Default for PdConfig {
    /// 升降机构位置误差补偿的典型参数
    fn default() -> Self {
        Self {
            kp: 20.0,
            kd: 20.0,
            abs_output_max: 600.0,
        }
    }
}

/// PD 补偿器
#[derive(Debug, Clone, Default)]
pub struct Pd {
    config: PdConfig,
    prev_error: f64,
    output: f64,
}

impl Pd {
    pub fn new(config: PdConfig) -> Self {
        Self {
            config,
            prev_error: 0.0,
            output: 0.0,
        }
    }

    pub fn config(&self) -> &PdConfig {
        &self.config
    }
}

impl Compensator for Pd {
    type Config = PdConfig;

    fn calc(&mut self, reference: f64, feedback: f64) -> f64 {
        let error = reference - feedback;
        let raw = self.config.kp * error + self.config.kd * (error - self.prev_error);
        self.prev_error = error;
        self.output = clamp_abs(raw, self.config.abs_output_max);
        self.output
    }

    fn reset(&mut self) {
        self.prev_error = 0.0;
        self.output = 0.0;
    }

    fn set_config(&mut self, config: PdConfig) {
        self.config = config;
    }

    fn output(&self) -> f64 {
        self.output
    }
}

/// 电机 PID 参数
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PidConfig {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// 输出绝对值上限
    pub abs_output_max: f64,
}

impl Default for PidConfig {
    /// 升降机构速度环的典型参数
    fn default() -> Self {
        Self {
            kp: 45.0,
            ki: 0.07,
            kd: 5.0,
            abs_output_max: 8000.0,
        }
    }
}

/// 增量式电机 PID
///
/// 输出在每次调用时累加，相同输入重复调用会继续积分。
#[derive(Debug, Clone, Default)]
pub struct MotorPid {
    config: PidConfig,
    /// e₁
    prev_error1: f64,
    /// e₂
    prev_error2: f64,
    output: f64,
}

impl MotorPid {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            prev_error1: 0.0,
            prev_error2: 0.0,
            output: 0.0,
        }
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}

impl Compensator for MotorPid {
    type Config = PidConfig;

    fn calc(&mut self, reference: f64, feedback: f64) -> f64 {
        let PidConfig {
            kp,
            ki,
            kd,
            abs_output_max,
        } = self.config;
        let error = reference - feedback;

        self.output += kp * (error - self.prev_error1)
            + ki * error
            + kd * (error - 2.0 * self.prev_error1 + self.prev_error2);
        self.output = clamp_abs(self.output, abs_output_max);

        self.prev_error2 = self.prev_error1;
        self.prev_error1 = error;
        self.output
    }

    fn reset(&mut self) {
        self.prev_error1 = 0.0;
        self.prev_error2 = 0.0;
        self.output = 0.0;
    }

    fn set_config(&mut self, config: PidConfig) {
        self.config = config;
    }

    fn output(&self) -> f64 {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pd_first_step() {
        let mut pd = Pd::new(PdConfig {
            kp: 2.0,
            kd: 0.5,
            abs_output_max: 100.0,
        });
        // e = 4, e₁ = 0 → 2·4 + 0.5·4
        assert_abs_diff_eq!(pd.calc(5.0, 1.0), 10.0);
        // e = 4, e₁ = 4 → 只剩比例项
        assert_abs_diff_eq!(pd.calc(5.0, 1.0), 8.0);
    }

    #[test]
    fn test_pd_is_idempotent_for_same_history() {
        let config = PdConfig {
            kp: 3.0,
            kd: 1.5,
            abs_output_max: 50.0,
        };
        let mut a = Pd::new(config);
        let mut b = Pd::new(config);
        a.calc(1.0, 0.0);
        b.calc(1.0, 0.0);
        assert_eq!(a.calc(2.0, 0.5), b.calc(2.0, 0.5));
    }

    #[test]
    fn test_pd_output_clamped() {
        let mut pd = Pd::new(PdConfig {
            kp: 100.0,
            kd: 0.0,
            abs_output_max: 10.0,
        });
        assert_eq!(pd.calc(5.0, 0.0), 10.0);
        assert_eq!(pd.calc(-5.0, 0.0), -10.0);
        assert_eq!(pd.output(), -10.0);
    }

    #[test]
    fn test_pd_reset() {
        let mut pd = Pd::new(PdConfig::default());
        pd.calc(1.0, 0.0);
        pd.reset();
        assert_eq!(pd.output(), 0.0);
        // 历史误差被清除，重新得到首步输出
        assert_abs_diff_eq!(pd.calc(1.0, 0.0), 40.0);
    }

    #[test]
    fn test_motor_pid_integrates() {
        let mut pid = MotorPid::new(PidConfig {
            kp: 1.0,
            ki: 0.5,
            kd: 0.0,
            abs_output_max: 100.0,
        });

        // e = 2: Δ = 1·2 + 0.5·2
        assert_abs_diff_eq!(pid.calc(2.0, 0.0), 3.0);
        // e = 2, e₁ = 2: Δ = 0.5·2
        assert_abs_diff_eq!(pid.calc(2.0, 0.0), 4.0);
        assert_abs_diff_eq!(pid.calc(2.0, 0.0), 5.0);
    }

    #[test]
    fn test_motor_pid_derivative_term() {
        let mut pid = MotorPid::new(PidConfig {
            kp: 0.0,
            ki: 0.0,
            kd: 1.0,
            abs_output_max: 100.0,
        });
        // e: 1, 3, 3 → Δ = (1), (3 - 2), (3 - 6 + 1)
        assert_abs_diff_eq!(pid.calc(1.0, 0.0), 1.0);
        assert_abs_diff_eq!(pid.calc(3.0, 0.0), 2.0);
        assert_abs_diff_eq!(pid.calc(3.0, 0.0), 0.0);
    }

    #[test]
    fn test_motor_pid_clamp_and_reset() {
        let mut pid = MotorPid::new(PidConfig {
            kp: 0.0,
            ki: 10.0,
            kd: 0.0,
            abs_output_max: 25.0,
        });
        for _ in 0..10 {
            pid.calc(1.0, 0.0);
        }
        assert_eq!(pid.output(), 25.0);

        pid.reset();
        assert_eq!(pid.output(), 0.0);
        assert_abs_diff_eq!(pid.calc(-1.0, 0.0), -10.0);
    }

    #[test]
    fn test_set_config_keeps_history() {
        let mut pid = MotorPid::new(PidConfig {
            kp: 0.0,
            ki: 1.0,
            kd: 0.0,
            abs_output_max: 100.0,
        });
        pid.calc(1.0, 0.0);
        pid.set_config(PidConfig {
            kp: 0.0,
            ki: 2.0,
            kd: 0.0,
            abs_output_max: 100.0,
        });
        assert_abs_diff_eq!(pid.calc(1.0, 0.0), 3.0);
        assert_eq!(pid.config().ki, 2.0);
    }
}
