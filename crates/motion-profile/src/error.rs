//! 规划错误类型定义

use thiserror::Error;

/// 规划失败原因
///
/// 规划失败不会产生任何副作用：[`SCurveProfile::new`](crate::SCurveProfile::new)
/// 只在成功时返回曲线。
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PlanError {
    /// 规划参数非法（非有限值，或非零位移时速度/加速度/加加速度上限为 0）
    #[error("Invalid planner limits: v_max={v_max}, a_max={a_max}, j_max={j_max}")]
    InvalidLimits { v_max: f64, a_max: f64, j_max: f64 },

    /// 起点状态或目标位置不是有限值
    #[error("Non-finite motion state: x_start={x_start}, v_start={v_start}, a_start={a_start}, x_end={x_end}")]
    NonFiniteState {
        x_start: f64,
        v_start: f64,
        a_start: f64,
        x_end: f64,
    },

    /// 初速度超限
    #[error("Initial velocity {velocity} exceeds limit {limit}")]
    InitialVelocityExceedsLimit { velocity: f64, limit: f64 },

    /// 初加速度超限
    #[error("Initial acceleration {acceleration} exceeds limit {limit}")]
    InitialAccelerationExceedsLimit { acceleration: f64, limit: f64 },

    /// 反向加速度刹车后的速度已经超限
    #[error("Velocity after braking the initial acceleration ({velocity}) exceeds limit {limit}")]
    BrakingExceedsVelocityLimit { velocity: f64, limit: f64 },

    /// 同向初加速度需要的最低峰值速度超过速度上限
    #[error("Required peak velocity {required} exceeds limit {limit}")]
    PeakVelocityUnreachable { required: f64, limit: f64 },

    /// 峰值速度二分查找无法把距离误差收敛到容差内
    #[error("Peak velocity search did not converge (distance residual {residual})")]
    SearchDiverged { residual: f64 },
}

#[cfg(test)]
mod tests {
    use super::PlanError;

    #[test]
    fn test_plan_error_display() {
        let err = PlanError::InitialVelocityExceedsLimit {
            velocity: 12.0,
            limit: 10.0,
        };
        assert_eq!(format!("{}", err), "Initial velocity 12 exceeds limit 10");

        let err = PlanError::SearchDiverged { residual: 0.5 };
        let msg = format!("{}", err);
        assert!(msg.contains("did not converge") && msg.contains("0.5"));
    }
}
