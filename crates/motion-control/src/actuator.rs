//! Actuator - 执行器能力接口
//!
//! 执行器（电机）对控制层只暴露反馈读取和可选的命令接口，具体总线协议
//! 由驱动层负责。每个执行器内嵌一个 [`Ownership`] 槽位，保证同一时刻最多
//! 只有一个控制器在向它下发命令。
//!
//! # 能力
//!
//! | 能力 | 查询 | 命令 |
//! |---|---|---|
//! | 电流 / 力 | `supports_current` | `set_current` |
//! | 内部速度环 | `supports_internal_velocity` | `set_internal_velocity` |
//! | 内部位置环 | `supports_internal_position` | `set_internal_position` |
//!
//! 不支持的命令默认实现为空操作。

use crate::mode::DriveMode;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// 控制器唯一标识（非零）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    /// 分配一个进程内唯一的新 ID
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// 原始值
    pub fn get(self) -> u64 {
        self.0
    }
}

/// 执行器所有权槽位
///
/// 0 表示空闲，否则为当前所有者的 [`ControllerId`]。
#[derive(Debug, Default)]
pub struct Ownership {
    owner: AtomicU64,
}

impl Ownership {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试获取所有权
    ///
    /// 空闲或已被 `id` 持有时成功（可重入）；被其他控制器持有时失败。
    pub fn try_acquire(&self, id: ControllerId) -> bool {
        match self
            .owner
            .compare_exchange(0, id.0, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(current) => current == id.0,
        }
    }

    /// 释放所有权（只有当前所有者可以释放）
    ///
    /// # 返回
    ///
    /// `id` 确实是所有者并已释放时返回 `true`
    pub fn release(&self, id: ControllerId) -> bool {
        self.owner
            .compare_exchange(id.0, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 当前所有者
    pub fn owner(&self) -> Option<ControllerId> {
        match self.owner.load(Ordering::Acquire) {
            0 => None,
            id => Some(ControllerId(id)),
        }
    }

    /// `id` 是否为当前所有者
    pub fn is_owned_by(&self, id: ControllerId) -> bool {
        self.owner.load(Ordering::Acquire) == id.0
    }
}

/// 执行器能力接口
///
/// 所有方法都只需要 `&self`：实现者自行处理内部可变性，
/// 以便同一执行器被多个控制器（依次）引用。
pub trait Actuator: Send + Sync {
    /// 执行器名称（用于日志和错误信息）
    fn name(&self) -> &str;

    /// 所有权槽位
    fn ownership(&self) -> &Ownership;

    /// 执行器默认控制模式
    fn default_control_mode(&self) -> DriveMode {
        DriveMode::ExternalForce
    }

    /// 当前角度（°）
    fn angle(&self) -> f64;

    /// 当前速度
    fn velocity(&self) -> f64;

    /// 把当前位置设为零点
    fn reset_angle(&self);

    fn supports_current(&self) -> bool {
        false
    }

    /// 下发电流 / 力命令
    fn set_current(&self, _current: f64) {
        warn!("Actuator '{}' does not accept current commands", self.name());
    }

    fn supports_internal_velocity(&self) -> bool {
        false
    }

    /// 下发内部速度环目标
    fn set_internal_velocity(&self, _velocity: f64) {
        warn!(
            "Actuator '{}' does not accept internal velocity commands",
            self.name()
        );
    }

    fn supports_internal_position(&self) -> bool {
        false
    }

    /// 下发内部位置环目标
    fn set_internal_position(&self, _position: f64) {
        warn!(
            "Actuator '{}' does not accept internal position commands",
            self.name()
        );
    }

    /// 是否支持某个实际控制模式
    fn supports(&self, mode: DriveMode) -> bool {
        match mode {
            DriveMode::ExternalForce => self.supports_current(),
            DriveMode::InternalVelocity => self.supports_internal_velocity(),
            DriveMode::InternalVelocityPosition => self.supports_internal_position(),
        }
    }
}

/// 共享执行器句柄
pub type SharedActuator = Arc<dyn Actuator>;
