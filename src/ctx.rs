//! 设备上下文与同步协议
//!
//! [`WlCtx`] 是显式传递的设备上下文 (不使用模块级单例)。其核心是单一的
//! store 锁: 配置字段的任何读写、电源状态迁移、硬件下发步骤都必须在
//! 持有该锁的前提下进行, 保证两个并发写者不会交错各自的
//! wake/push/sleep 序列。
//!
//! 统计刷新 ([`WlInner::update_stats`]) 同样在该锁内执行, 与配置写入
//! 互斥。唤醒/休眠是潜在的慢操作 (固件往返) 且持锁执行 —— 没有超时和
//! 取消, 挂死的唤醒会无限期阻塞后续属性 I/O, 这是接受的限制。

use alloc::boxed::Box;
use alloc::sync::Arc;

use bitflags::bitflags;
use log::{debug, error, warn};
use spin::{Mutex, MutexGuard};

use crate::config::Conf;
use crate::device::{ConfField, DeviceOps, DeviceState, RecoveryQueue, TickClock};
use crate::error::DiagError;
use crate::stats::{FwStats, Stats};

/// 统计缓存生命周期窗口 (tick)
///
/// 两次硬件统计刷新之间强制的最小间隔。读取频率再高, 每个窗口内
/// 也至多唤醒硬件一次 —— 用计数器新鲜度换取更少的电源状态迁移。
pub const STATS_LIFETIME: u64 = 1000;

bitflags! {
    /// 设备上下文标志位
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WlFlags: u32 {
        /// GPIO 上电标志
        const GPIO_POWER = 1 << 0;
    }
}

/// store 锁保护的内部状态
///
/// 方法都要求调用者已经持有锁 (通过 [`WlCtx::lock`] 获得)。
pub struct WlInner {
    pub state: DeviceState,
    pub flags: WlFlags,
    pub conf: Conf,
    pub stats: Stats,
    dev: Box<dyn DeviceOps>,
}

impl WlInner {
    /// 将固件从 ELP 休眠唤醒 (配对使用, 见 [`Self::elp_sleep`])
    ///
    /// 设备断电或已唤醒时为空操作成功; 调用者随后通过 `state` 判断
    /// 是否真的可以访问硬件。唤醒失败时缓存与配置均不受影响。
    pub fn elp_wakeup(&mut self) -> Result<(), DiagError> {
        match self.state {
            DeviceState::Off | DeviceState::Awake => Ok(()),
            DeviceState::Asleep => {
                if self.dev.wake().is_err() {
                    warn!("wlcore: elp wakeup failed");
                    return Err(DiagError::DeviceWake);
                }
                self.state = DeviceState::Awake;
                Ok(())
            }
        }
    }

    /// 允许固件回到 ELP 休眠
    pub fn elp_sleep(&mut self) {
        if self.state == DeviceState::Awake {
            self.dev.sleep();
            self.state = DeviceState::Asleep;
        }
    }

    /// 按生命周期窗口刷新固件统计缓存
    ///
    /// 缓存尚未分配或设备断电时直接返回 (读者拿到现有快照, 可能为零)。
    /// 唤醒失败时返回旧快照并上报非致命错误; 窗口内的重复读取不会
    /// 触发第二次硬件访问。
    pub fn update_stats(&mut self, now: u64) -> Result<(), DiagError> {
        if self.stats.fw_stats.is_none() || self.state == DeviceState::Off {
            return Ok(());
        }

        // 窗口内的读取直接命中缓存, 不触发电源状态迁移
        if now.wrapping_sub(self.stats.fw_stats_update) < STATS_LIFETIME {
            return Ok(());
        }

        self.elp_wakeup()?;

        if self.state == DeviceState::Awake {
            let counters = self.dev.read_counters();
            if let Some(fw) = self.stats.fw_stats.as_mut() {
                **fw = counters;
            }
            // now 由单调时钟提供, 时间戳只会前进
            self.stats.fw_stats_update = now;
        }

        self.elp_sleep();
        Ok(())
    }

    /// 清零整个统计块和两个驱动侧错误计数
    ///
    /// 纯内存操作, 不要求设备唤醒; 缓存从未分配时为空操作。
    pub fn reset_stats(&mut self) {
        let Some(fw) = self.stats.fw_stats.as_mut() else {
            return;
        };
        **fw = FwStats::default();
        self.stats.retry_count = 0;
        self.stats.excessive_retries = 0;
    }

    /// 芯片上电并重置统计缓存
    ///
    /// 设备 (重新) 初始化时计数器清零, 时间戳重置为当前 tick。
    pub fn power_on(&mut self, now: u64) -> Result<(), DiagError> {
        if self.dev.power_on().is_err() {
            error!("wlcore: power on failed");
            return Err(DiagError::DeviceWake);
        }
        self.flags.insert(WlFlags::GPIO_POWER);
        self.state = DeviceState::Awake;
        if let Some(fw) = self.stats.fw_stats.as_mut() {
            **fw = FwStats::default();
        }
        self.stats.fw_stats_update = now;
        Ok(())
    }

    /// 芯片断电
    pub fn power_off(&mut self) {
        self.dev.power_off();
        self.flags.remove(WlFlags::GPIO_POWER);
        self.state = DeviceState::Off;
    }

    /// 唤醒-下发-休眠序列
    ///
    /// 必须在持锁期间紧跟配置存储的修改调用, 使存储更新与硬件下发
    /// 之间不可能插入其它写者。下发失败不回滚存储 (新值在固件下次
    /// 读取该配置路径时生效), 但失败会上报给调用者, 设备仍回到休眠。
    pub fn push_config(&mut self, field: ConfField, value: u32) -> Result<(), DiagError> {
        self.elp_wakeup()?;
        if self.state != DeviceState::Awake {
            // 断电状态下跳过下发, 新值在下次初始化时生效
            debug!("wlcore: device off, config push deferred");
            return Ok(());
        }

        let ret = match self.dev.apply_config(field, value) {
            Ok(()) => Ok(()),
            Err(_) => {
                error!("wlcore: failed to push {:?} = {} to fw", field, value);
                Err(DiagError::HardwarePush)
            }
        };

        self.elp_sleep();
        ret
    }
}

/// 设备上下文
///
/// 创建于设备 attach, 销毁于 detach; 所有属性操作通过 `Arc<WlCtx>`
/// 共享同一个上下文。
pub struct WlCtx {
    inner: Mutex<WlInner>,
    clock: Arc<dyn TickClock>,
    recovery: Arc<dyn RecoveryQueue>,
}

impl WlCtx {
    pub fn new(
        dev: Box<dyn DeviceOps>,
        clock: Arc<dyn TickClock>,
        recovery: Arc<dyn RecoveryQueue>,
    ) -> Self {
        Self {
            inner: Mutex::new(WlInner {
                state: DeviceState::Off,
                flags: WlFlags::empty(),
                conf: Conf::default(),
                stats: Stats::default(),
                dev,
            }),
            clock,
            recovery,
        }
    }

    /// 获取 store 锁
    pub(crate) fn lock(&self) -> MutexGuard<'_, WlInner> {
        self.inner.lock()
    }

    /// 当前 tick
    pub(crate) fn now(&self) -> u64 {
        self.clock.now()
    }

    /// 刷新固件统计缓存 (限速)
    pub fn update_stats(&self) -> Result<(), DiagError> {
        let now = self.clock.now();
        self.inner.lock().update_stats(now)
    }

    /// 清零统计缓存
    pub fn reset_stats(&self) {
        self.inner.lock().reset_stats();
    }

    /// GPIO 电源控制
    pub fn set_power(&self, on: bool) -> Result<(), DiagError> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        if on {
            inner.power_on(now)
        } else {
            inner.power_off();
            Ok(())
        }
    }

    /// 提交一次恢复动作
    ///
    /// 异步执行, 提交总是成功, 不等待恢复结果。
    pub fn queue_recovery(&self) {
        let _inner = self.inner.lock();
        self.recovery.schedule();
    }
}
