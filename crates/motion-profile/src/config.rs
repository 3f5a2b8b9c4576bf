//! 规划参数

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// S 形曲线规划参数
///
/// 三个值都按绝对值（幅值）解释，运动方向由起止位置决定。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// 最大速度（位置单位/s）
    pub v_max: f64,

    /// 最大加速度（位置单位/s²）
    pub a_max: f64,

    /// 最大加加速度（位置单位/s³）
    pub j_max: f64,
}

impl PlannerConfig {
    /// 创建规划参数
    pub fn new(v_max: f64, a_max: f64, j_max: f64) -> Self {
        Self {
            v_max,
            a_max,
            j_max,
        }
    }

    /// 取绝对值后的参数
    pub fn magnitudes(&self) -> Self {
        Self {
            v_max: self.v_max.abs(),
            a_max: self.a_max.abs(),
            j_max: self.j_max.abs(),
        }
    }
}

impl Default for PlannerConfig {
    /// 升降机构的典型参数（°/s, °/s², °/s³）
    fn default() -> Self {
        Self {
            v_max: 360.0,
            a_max: 60.0,
            j_max: 100.0,
        }
    }
}
