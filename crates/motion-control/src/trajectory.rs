//! TrajectoryExecutor - 多执行器同步轨迹执行
//!
//! N 个速度控制器共享一条 [`SCurveProfile`]，每个执行器各自用一个 PD
//! 补偿器把"共享位置参考 - 自身角度"转换为速度参考。
//!
//! # 调用方
//!
//! ```text
//! 后台线程        set_target / set_relative_target / stop / enable / disable
//!                       │ 构造新曲线（不持锁）
//!                       ▼
//!                 ArcSwap<PublishedProfile>   ← 原子发布 (epoch + 曲线)
//!                       │
//! 低频 tick       profile_update(dt)   发现新 epoch → elapsed 归零、清除 stopped
//!                       │ position_ref / velocity_ref
//! 高频 tick       error_update()       PD(position_ref, angle) → set_ref
//!                 controller_update()  速度环 → 执行器命令
//! ```
//!
//! # 并发
//!
//! - 所有方法只需要 `&self`，`TrajectoryExecutor<N>` 是 `Send + Sync`
//! - tick 路径只使用 `try_lock`，竞争时跳过本次 tick，从不自旋等待
//! - 协作锁 ([`TrajectoryExecutor::try_lock`]) 被持有时，tick 全部跳过，
//!   `set_target` 返回 [`TrajectoryError::Busy`]
//! - 曲线通过 `ArcSwap` 整体替换，tick 永远不会读到"半新半旧"的曲线

use crate::actuator::SharedActuator;
use crate::compensator::{Compensator, Pd, PdConfig};
use crate::controller::{Controller, VelocityController};
use crate::error::{EnableError, TrajectoryError};
use arc_swap::ArcSwap;
use motion_profile::{PlannerConfig, SCurveProfile, VelocityProfile};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 执行器参数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutorConfig {
    /// 曲线规划上限
    pub planner: PlannerConfig,
    /// 位置误差 PD，所有执行器共用同一组参数
    pub error_pd: PdConfig,
    /// 是否把曲线速度叠加到 PD 输出上
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity_feedforward: bool,
}

/// 已发布的曲线
#[derive(Debug)]
struct PublishedProfile {
    epoch: u64,
    profile: SCurveProfile,
}

/// tick 侧游标
#[derive(Debug)]
struct Cursor {
    /// 当前跟随的曲线 epoch
    epoch: u64,
    elapsed: f64,
    position_ref: f64,
    velocity_ref: f64,
    stopped: bool,
}

impl Cursor {
    /// 相对于 `published` 的 (elapsed, stopped)，尚未切换到新 epoch 时视为 (0, false)
    fn view(&self, published: &PublishedProfile) -> (f64, bool) {
        if self.epoch == published.epoch {
            (self.elapsed, self.stopped)
        } else {
            (0.0, false)
        }
    }
}

struct Binding {
    controller: VelocityController,
    compensator: Pd,
}

/// 协作锁守卫，drop 时解锁
#[must_use = "the executor is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SwapGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SwapGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 多执行器同步轨迹执行器
///
/// # 示例
///
/// ```rust
/// # #[cfg(feature = "mock")]
/// # {
/// use motion_control::{
///     ExecutorConfig, SimulatedActuator, TrajectoryExecutor, VelocityController,
///     VelocityControllerConfig,
/// };
/// use std::sync::Arc;
///
/// let left = Arc::new(SimulatedActuator::velocity_driven("left"));
/// let right = Arc::new(SimulatedActuator::velocity_driven("right"));
/// let config = VelocityControllerConfig::default();
///
/// let executor = TrajectoryExecutor::new(
///     [
///         VelocityController::new(left.clone(), config).unwrap(),
///         VelocityController::new(right.clone(), config).unwrap(),
///     ],
///     ExecutorConfig::default(),
/// );
///
/// executor.enable().unwrap();
/// executor.set_target(90.0).unwrap();
/// # }
/// ```
pub struct TrajectoryExecutor<const N: usize> {
    config: ExecutorConfig,
    bindings: [Mutex<Binding>; N],
    actuators: [SharedActuator; N],
    published: ArcSwap<PublishedProfile>,
    next_epoch: AtomicU64,
    cursor: Mutex<Cursor>,
    enabled: AtomicBool,
    locked: AtomicBool,
}

impl<const N: usize> TrajectoryExecutor<N> {
    /// 接管 N 个速度控制器
    ///
    /// 初始曲线为静止于 0 的零时长曲线，执行器处于失能状态。
    pub fn new(controllers: [VelocityController; N], config: ExecutorConfig) -> Self {
        const { assert!(N > 0, "TrajectoryExecutor needs at least one actuator") };

        let actuators = controllers.each_ref().map(|c| c.actuator().clone());
        let bindings = controllers.map(|controller| {
            Mutex::new(Binding {
                controller,
                compensator: Pd::new(config.error_pd),
            })
        });

        Self {
            config,
            bindings,
            actuators,
            published: ArcSwap::from_pointee(PublishedProfile {
                epoch: 0,
                profile: SCurveProfile::at_rest(0.0),
            }),
            next_epoch: AtomicU64::new(1),
            cursor: Mutex::new(Cursor {
                epoch: 0,
                elapsed: 0.0,
                position_ref: 0.0,
                velocity_ref: 0.0,
                stopped: true,
            }),
            enabled: AtomicBool::new(false),
            locked: AtomicBool::new(false),
        }
    }

    // ==================== tick ====================

    /// 推进曲线时间并采样位置 / 速度参考
    ///
    /// 失能、被锁或已停止时为空操作。
    pub fn profile_update(&self, dt: f64) {
        if !self.is_active() {
            return;
        }
        let Some(mut cursor) = self.cursor.try_lock() else {
            trace!("profile_update skipped: cursor busy");
            return;
        };

        let published = self.published.load();
        if cursor.epoch != published.epoch {
            cursor.epoch = published.epoch;
            cursor.elapsed = 0.0;
            cursor.stopped = false;
        }
        if cursor.stopped {
            return;
        }

        cursor.elapsed += dt;
        cursor.position_ref = published.profile.calc_x(cursor.elapsed);
        cursor.velocity_ref = published.profile.calc_v(cursor.elapsed);
    }

    /// 位置误差补偿：PD(position_ref, angle) → 速度控制器参考
    pub fn error_update(&self) {
        if !self.is_active() {
            return;
        }
        let Some((position_ref, velocity_ref)) = self
            .cursor
            .try_lock()
            .map(|c| (c.position_ref, c.velocity_ref))
        else {
            trace!("error_update skipped: cursor busy");
            return;
        };

        for binding in &self.bindings {
            let Some(mut guard) = binding.try_lock() else {
                continue;
            };
            let binding = &mut *guard;
            let angle = binding.controller.actuator().angle();
            let mut velocity = binding.compensator.calc(position_ref, angle);
            if self.config.velocity_feedforward {
                velocity += velocity_ref;
            }
            binding.controller.set_ref(velocity);
        }
    }

    /// 执行所有速度控制器
    pub fn controller_update(&self) {
        if !self.is_active() {
            return;
        }
        for binding in &self.bindings {
            if let Some(mut guard) = binding.try_lock() {
                guard.controller.update();
            }
        }
    }

    // ==================== 后台操作 ====================

    /// 以当前平均状态为起点，规划到绝对位置 `target`
    ///
    /// # 错误
    ///
    /// - [`TrajectoryError::NotEnabled`]: 执行器未使能
    /// - [`TrajectoryError::Busy`]: 协作锁被占用
    /// - [`TrajectoryError::Planning`]: 规划失败
    ///
    /// 失败时曲线与时间保持不变。
    pub fn set_target(&self, target: f64) -> Result<(), TrajectoryError> {
        self.check_ready()?;
        self.plan_and_publish(self.current_average_position(), target)
    }

    /// 以当前平均位置为基准，规划到 `平均位置 + delta`
    pub fn set_relative_target(&self, delta: f64) -> Result<(), TrajectoryError> {
        self.check_ready()?;
        let position = self.current_average_position();
        self.plan_and_publish(position, position + delta)
    }

    fn check_ready(&self) -> Result<(), TrajectoryError> {
        if !self.is_enabled() {
            return Err(TrajectoryError::NotEnabled);
        }
        if self.is_locked() {
            return Err(TrajectoryError::Busy);
        }
        Ok(())
    }

    fn plan_and_publish(&self, position: f64, target: f64) -> Result<(), TrajectoryError> {
        let acceleration = {
            let current = self.published.load();
            let (elapsed, _) = self.cursor.lock().view(&current);
            current.profile.calc_a(elapsed)
        };
        let velocity = self.current_average_velocity();

        let profile =
            SCurveProfile::new(self.config.planner, position, velocity, acceleration, target)
                .inspect_err(|e| {
                    debug!(
                        "Retarget to {:.4} rejected (x={:.4}, v={:.4}, a={:.4}): {}",
                        target, position, velocity, acceleration, e
                    )
                })?;

        let Some(_guard) = self.try_lock() else {
            return Err(TrajectoryError::Busy);
        };
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        self.published
            .store(Arc::new(PublishedProfile { epoch, profile }));

        debug!(
            "Retargeted to {:.4} (epoch {}, {:.3}s)",
            target,
            epoch,
            profile.total_time()
        );
        Ok(())
    }

    /// 停止：位置参考冻结在当前平均位置，速度参考归零
    ///
    /// 不受协作锁影响。
    pub fn stop(&self) {
        let position = self.current_average_position();
        let published = self.published.load();
        let mut cursor = self.cursor.lock();

        if cursor.epoch != published.epoch {
            cursor.epoch = published.epoch;
            cursor.elapsed = 0.0;
        }
        cursor.stopped = true;
        cursor.position_ref = position;
        cursor.velocity_ref = 0.0;
    }

    /// 使能全部控制器（全部成功或全部回滚）
    ///
    /// 成功后保持在当前平均位置（已停止状态），等待 `set_target`。
    ///
    /// # 错误
    ///
    /// 任一执行器被其他控制器占用时返回 [`EnableError::OwnershipConflict`]，
    /// 此前已使能的控制器全部失能。
    pub fn enable(&self) -> Result<(), EnableError> {
        if self.is_enabled() {
            return Ok(());
        }

        let mut guards: Vec<_> = self.bindings.iter().map(|b| b.lock()).collect();
        for index in 0..guards.len() {
            if !guards[index].controller.enable() {
                for guard in guards.iter_mut().take(index) {
                    guard.controller.disable();
                }
                let actuator = self.actuators[index].name().to_string();
                warn!(
                    "Enable rolled back: actuator '{}' (binding {}) is owned by another controller",
                    actuator, index
                );
                return Err(EnableError::OwnershipConflict { index, actuator });
            }
        }
        for guard in guards.iter_mut() {
            guard.compensator.reset();
        }
        drop(guards);

        self.stop();
        self.enabled.store(true, Ordering::Release);
        debug!("Trajectory executor enabled ({} actuators)", N);
        Ok(())
    }

    /// 停止并失能全部控制器
    pub fn disable(&self) {
        self.stop();
        self.enabled.store(false, Ordering::Release);
        for binding in &self.bindings {
            binding.lock().controller.disable();
        }
        debug!("Trajectory executor disabled");
    }

    // ==================== 协作锁 ====================

    /// 获取协作锁
    ///
    /// 持有期间 tick 全部跳过，`set_target` 返回 `Busy`。已被持有时返回 `None`。
    pub fn try_lock(&self) -> Option<SwapGuard<'_>> {
        self.locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SwapGuard {
                flag: &self.locked,
            })
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    // ==================== 状态查询 ====================

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// tick 是否会执行（已使能且未被锁）
    fn is_active(&self) -> bool {
        self.is_enabled() && !self.is_locked()
    }

    /// 当前曲线已经过的时间
    pub fn elapsed(&self) -> f64 {
        let published = self.published.load();
        self.cursor.lock().view(&published).0
    }

    /// 是否处于停止状态
    pub fn is_stopped(&self) -> bool {
        let published = self.published.load();
        self.cursor.lock().view(&published).1
    }

    /// 共享位置参考
    pub fn position_ref(&self) -> f64 {
        self.cursor.lock().position_ref
    }

    /// 共享速度参考（曲线采样值）
    pub fn velocity_ref(&self) -> f64 {
        self.cursor.lock().velocity_ref
    }

    /// 当前曲线的副本
    pub fn profile(&self) -> SCurveProfile {
        self.published.load().profile
    }

    /// 所有执行器的平均角度
    pub fn current_average_position(&self) -> f64 {
        self.actuators.iter().map(|a| a.angle()).sum::<f64>() / N as f64
    }

    /// 所有执行器的平均速度
    pub fn current_average_velocity(&self) -> f64 {
        self.actuators.iter().map(|a| a.velocity()).sum::<f64>() / N as f64
    }

    /// 每个控制器的使能状态
    pub fn controllers_enabled(&self) -> [bool; N] {
        std::array::from_fn(|i| self.bindings[i].lock().controller.is_enabled())
    }

    /// 每个控制器当前的速度参考
    pub fn controller_refs(&self) -> [f64; N] {
        std::array::from_fn(|i| self.bindings[i].lock().controller.velocity_ref())
    }

    pub fn actuators(&self) -> &[SharedActuator; N] {
        &self.actuators
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl<const N: usize> std::fmt::Debug for TrajectoryExecutor<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrajectoryExecutor")
            .field("actuators", &N)
            .field("enabled", &self.is_enabled())
            .field("locked", &self.is_locked())
            .field("config", &self.config)
            .finish()
    }
}
