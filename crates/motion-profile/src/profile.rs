//! 速度曲线通用接口

/// 速度曲线
///
/// 构造完成后不可变，按"自起点经过的时间"查询。
/// 位置、速度、加速度都应在时间上连续。
pub trait VelocityProfile {
    /// 时刻 `t` 的位置
    fn calc_x(&self, t: f64) -> f64;

    /// 时刻 `t` 的速度
    fn calc_v(&self, t: f64) -> f64;

    /// 时刻 `t` 的加速度
    fn calc_a(&self, t: f64) -> f64;

    /// 运动总时长（秒）
    fn total_time(&self) -> f64;

    /// 曲线是否规划成功
    ///
    /// 没有默认实现：每种曲线都必须明确声明。
    fn success(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 停在原地的曲线
    struct Hold(f64);

    impl VelocityProfile for Hold {
        fn calc_x(&self, _t: f64) -> f64 {
            self.0
        }

        fn calc_v(&self, _t: f64) -> f64 {
            0.0
        }

        fn calc_a(&self, _t: f64) -> f64 {
            0.0
        }

        fn total_time(&self) -> f64 {
            0.0
        }

        fn success(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_success_is_declared_by_implementor() {
        let profile: &dyn VelocityProfile = &Hold(3.0);
        assert!(profile.success());
        assert_eq!(profile.calc_x(10.0), 3.0);
    }
}
