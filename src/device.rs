//! 设备句柄抽象
//!
//! 硬件传输层与固件命令层在本 crate 中是外部协作者, 统一收敛为
//! [`DeviceOps`] 能力对象: 唤醒/休眠、读计数器、下发单个配置字段、
//! 上电/断电。具体的寄存器访问与固件协议不在此处建模。

use crate::stats::FwStats;

/// 设备电源状态
///
/// 所有配置下发与统计刷新要求 Off→Awake 迁移 (已是 Awake 则为空操作),
/// 并与返回 Asleep 配对。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// 断电, 跳过一切硬件访问
    Off,
    /// 已上电, 固件处于省电休眠 (ELP)
    Asleep,
    /// 已唤醒, 可以收发固件命令
    Awake,
}

/// 可下发到固件的配置字段标识 (ACX 命令的抽象)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfField {
    /// 唤醒条件 (DTIM/beacon 监听间隔)
    WakeUpConditions,
    /// 分片阈值
    FragThreshold,
    /// beacon 过滤开关
    BeaconFilter,
    /// ELP 省电授权级别
    SleepAuth,
    /// rx streaming 参数重算
    RxStreaming,
}

/// 设备操作错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    WakeFailed,
    CommandFailed,
    PoweredOff,
}

/// 设备操作接口
///
/// 由平台/传输层实现; 所有方法都只会在持有 store 锁时被调用,
/// 实现方无需自带同步。
pub trait DeviceOps: Send + Sync {
    /// 将固件从 ELP 休眠唤醒
    fn wake(&mut self) -> Result<(), DeviceError>;

    /// 允许固件回到 ELP 休眠
    fn sleep(&mut self);

    /// 读取固件维护的统计计数器块
    fn read_counters(&mut self) -> FwStats;

    /// 下发单个配置字段到固件
    fn apply_config(&mut self, field: ConfField, value: u32) -> Result<(), DeviceError>;

    /// 芯片上电
    fn power_on(&mut self) -> Result<(), DeviceError>;

    /// 芯片断电
    fn power_off(&mut self);
}

/// 单调 tick 时钟源 (jiffies 的抽象)
///
/// 显式注入而非读取全局时间, 便于测试控制统计缓存的生命周期窗口。
pub trait TickClock: Send + Sync {
    fn now(&self) -> u64;
}

/// 恢复动作工作队列
///
/// `start_recovery` 节点的契约只有 "提交总是成功",
/// 恢复动作本身的结果不回传。
pub trait RecoveryQueue: Send + Sync {
    fn schedule(&self);
}
