use super::*;
use crate::ctx::STATS_LIFETIME;

#[test]
fn test_read_within_window_hits_cache_without_wake() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().tx.starts = 7;

    // 初始化时间戳在当前窗口内, 读取不触发任何硬件访问
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "0\n");
    assert!(rig.events().is_empty());
}

#[test]
fn test_refresh_after_lifetime_window() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().tx.starts = 7;
    rig.advance(STATS_LIFETIME);

    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "7\n");
    assert_eq!(
        rig.events(),
        vec![Event::Wake, Event::ReadCounters, Event::Sleep]
    );
    // 刷新结束后固件回到休眠
    assert_eq!(rig.ctx.lock().state, DeviceState::Asleep);
}

#[test]
fn test_two_reads_in_one_window_are_identical() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().rx.rx_done = 11;
    rig.advance(STATS_LIFETIME);

    assert_eq!(rig.read("fw-statistics/rx_rx_done").unwrap(), "11\n");
    let stamp = rig.ctx.lock().stats.fw_stats_update;

    // 窗口内硬件侧计数继续变化, 但缓存与时间戳保持不变
    rig.counters.lock().unwrap().rx.rx_done = 99;
    rig.advance(STATS_LIFETIME - 1);
    assert_eq!(rig.read("fw-statistics/rx_rx_done").unwrap(), "11\n");
    assert_eq!(rig.ctx.lock().stats.fw_stats_update, stamp);

    let reads = rig
        .events()
        .iter()
        .filter(|e| **e == Event::ReadCounters)
        .count();
    assert_eq!(reads, 1);
}

#[test]
fn test_refresh_once_more_after_next_window() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().isr.irqs = 1;
    rig.advance(STATS_LIFETIME);
    assert_eq!(rig.read("fw-statistics/isr_irqs").unwrap(), "1\n");

    rig.counters.lock().unwrap().isr.irqs = 2;
    rig.advance(STATS_LIFETIME);
    assert_eq!(rig.read("fw-statistics/isr_irqs").unwrap(), "2\n");

    let wakes = rig.events().iter().filter(|e| **e == Event::Wake).count();
    assert_eq!(wakes, 2);
}

#[test]
fn test_wake_failure_returns_stale_cache() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().tx.starts = 5;
    rig.advance(STATS_LIFETIME);
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "5\n");

    rig.counters.lock().unwrap().tx.starts = 9;
    rig.advance(STATS_LIFETIME);
    rig.fail_wake.store(true, Ordering::SeqCst);

    // 唤醒失败: 刷新上报非致命错误, 读者仍拿到旧快照
    assert_eq!(rig.ctx.update_stats().unwrap_err(), DiagError::DeviceWake);
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "5\n");

    // 恢复后下一次读取补上刷新
    rig.fail_wake.store(false, Ordering::SeqCst);
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "9\n");
}

#[test]
fn test_device_off_skips_refresh() {
    let rig = create_test_rig();
    rig.counters.lock().unwrap().tx.starts = 3;
    rig.advance(2 * STATS_LIFETIME);

    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "0\n");
    assert!(rig.events().is_empty());
}

#[test]
fn test_reset_then_read_returns_zero() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().tx.starts = 7;
    rig.advance(STATS_LIFETIME);
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "7\n");
    rig.ctx.lock().stats.retry_count = 4;
    rig.ctx.lock().stats.excessive_retries = 2;

    rig.debugfs.reset();

    // 同一窗口内不会穿透到硬件, 读到的就是清零后的缓存
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "0\n");
    assert_eq!(rig.read("retry_count").unwrap(), "0\n");
    assert_eq!(rig.read("excessive_retries").unwrap(), "0\n");
}

#[test]
fn test_reset_without_allocation_is_noop() {
    let rig = create_test_rig();
    let node = rig.debugfs.lookup_path("fw-statistics/tx_starts").unwrap();
    let ctx = rig.ctx.clone();

    let TestRig { debugfs, .. } = rig;
    debugfs.exit();

    assert!(ctx.lock().stats.fw_stats.is_none());
    ctx.reset_stats();
    // 统计记录释放后, 节点读取退化为 0 且不访问硬件
    assert_eq!(node.read().unwrap(), "0\n");
}

#[test]
fn test_power_cycle_zeroes_counters() {
    let rig = create_test_rig();
    rig.power_on_asleep();
    rig.counters.lock().unwrap().tx.starts = 7;
    rig.advance(STATS_LIFETIME);
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "7\n");

    // 重新上电: 计数器块清零, 时间戳重置到当前 tick
    rig.ctx.set_power(false).unwrap();
    rig.ctx.set_power(true).unwrap();
    let stamp = rig.ctx.lock().stats.fw_stats_update;
    assert_eq!(stamp, rig.clock.load(Ordering::SeqCst));
    assert_eq!(rig.read("fw-statistics/tx_starts").unwrap(), "0\n");
}
