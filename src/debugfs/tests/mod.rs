use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::ctx::WlCtx;
use crate::debugfs::DebugfsRoot;
use crate::device::{ConfField, DeviceError, DeviceOps, DeviceState, RecoveryQueue, TickClock};
use crate::error::DiagError;
use crate::stats::FwStats;

// 测试辅助函数 (fixtures)

/// 硬件访问事件, 由 mock 设备按发生顺序记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Wake,
    Sleep,
    ReadCounters,
    Push(ConfField, u32),
    PowerOn,
    PowerOff,
}

/// mock 设备: 记录事件序列, 可注入唤醒/下发失败
struct MockDev {
    log: Arc<StdMutex<Vec<Event>>>,
    fail_wake: Arc<AtomicBool>,
    fail_push: Arc<AtomicBool>,
    counters: Arc<StdMutex<FwStats>>,
}

impl DeviceOps for MockDev {
    fn wake(&mut self) -> Result<(), DeviceError> {
        if self.fail_wake.load(Ordering::SeqCst) {
            return Err(DeviceError::WakeFailed);
        }
        self.log.lock().unwrap().push(Event::Wake);
        Ok(())
    }

    fn sleep(&mut self) {
        self.log.lock().unwrap().push(Event::Sleep);
    }

    fn read_counters(&mut self) -> FwStats {
        self.log.lock().unwrap().push(Event::ReadCounters);
        self.counters.lock().unwrap().clone()
    }

    fn apply_config(&mut self, field: ConfField, value: u32) -> Result<(), DeviceError> {
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(DeviceError::CommandFailed);
        }
        self.log.lock().unwrap().push(Event::Push(field, value));
        Ok(())
    }

    fn power_on(&mut self) -> Result<(), DeviceError> {
        self.log.lock().unwrap().push(Event::PowerOn);
        Ok(())
    }

    fn power_off(&mut self) {
        self.log.lock().unwrap().push(Event::PowerOff);
    }
}

/// 可手动推进的 tick 时钟
struct FakeClock(Arc<AtomicU64>);

impl TickClock for FakeClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// 只计提交次数的恢复队列
struct FakeRecovery(Arc<AtomicUsize>);

impl RecoveryQueue for FakeRecovery {
    fn schedule(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// 组装好的测试环境: 上下文 + 节点树 + 全部 mock 控制句柄
pub struct TestRig {
    pub ctx: Arc<WlCtx>,
    pub debugfs: DebugfsRoot,
    pub log: Arc<StdMutex<Vec<Event>>>,
    pub clock: Arc<AtomicU64>,
    pub fail_wake: Arc<AtomicBool>,
    pub fail_push: Arc<AtomicBool>,
    pub counters: Arc<StdMutex<FwStats>>,
    pub recoveries: Arc<AtomicUsize>,
}

impl TestRig {
    pub fn read(&self, path: &str) -> Result<String, DiagError> {
        self.debugfs.lookup_path(path)?.read()
    }

    pub fn write(&self, path: &str, buf: &str) -> Result<(), DiagError> {
        self.debugfs.lookup_path(path)?.write(buf)
    }

    pub fn advance(&self, ticks: u64) {
        self.clock.fetch_add(ticks, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.log.lock().unwrap().clear();
    }

    /// 上电并让固件回到 ELP 休眠, 作为多数用例的起始状态
    pub fn power_on_asleep(&self) {
        self.ctx.set_power(true).unwrap();
        self.ctx.lock().state = DeviceState::Asleep;
        self.clear_events();
    }
}

/// 创建完整的测试环境 (已完成 debugfs 初始化, 设备断电)
pub fn create_test_rig() -> TestRig {
    let log = Arc::new(StdMutex::new(Vec::new()));
    let clock = Arc::new(AtomicU64::new(0));
    let fail_wake = Arc::new(AtomicBool::new(false));
    let fail_push = Arc::new(AtomicBool::new(false));
    let counters = Arc::new(StdMutex::new(FwStats::default()));
    let recoveries = Arc::new(AtomicUsize::new(0));

    let dev = MockDev {
        log: log.clone(),
        fail_wake: fail_wake.clone(),
        fail_push: fail_push.clone(),
        counters: counters.clone(),
    };

    let ctx = Arc::new(WlCtx::new(
        Box::new(dev),
        Arc::new(FakeClock(clock.clone())),
        Arc::new(FakeRecovery(recoveries.clone())),
    ));

    let debugfs = DebugfsRoot::init(ctx.clone()).unwrap();

    TestRig {
        ctx,
        debugfs,
        log,
        clock,
        fail_wake,
        fail_push,
        counters,
        recoveries,
    }
}

pub mod composite;
pub mod concurrency;
pub mod stats;
