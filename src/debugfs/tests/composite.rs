use super::*;
use crate::config::WakeUpEvent;

#[test]
fn test_dtim_one_selects_single_dtim_mode() {
    let rig = create_test_rig();

    rig.write("dtim_interval", "1").unwrap();
    assert_eq!(rig.ctx.lock().conf.conn.wake_up_event, WakeUpEvent::Dtim);
    assert_eq!(rig.read("dtim_interval").unwrap(), "1\n");
    // 两种模式互斥: beacon 侧读到 0 (未激活)
    assert_eq!(rig.read("beacon_interval").unwrap(), "0\n");
}

#[test]
fn test_dtim_multi_selects_n_dtim_mode() {
    let rig = create_test_rig();

    rig.write("dtim_interval", "5").unwrap();
    assert_eq!(rig.ctx.lock().conf.conn.wake_up_event, WakeUpEvent::NDtim);
    assert_eq!(rig.read("dtim_interval").unwrap(), "5\n");
    assert_eq!(rig.read("beacon_interval").unwrap(), "0\n");
}

#[test]
fn test_beacon_write_switches_mode() {
    let rig = create_test_rig();

    rig.write("dtim_interval", "5").unwrap();
    rig.write("beacon_interval", "3").unwrap();

    // 共享的 listen_interval 字段被 beacon 侧接管
    assert_eq!(rig.ctx.lock().conf.conn.wake_up_event, WakeUpEvent::NBeacons);
    assert_eq!(rig.read("beacon_interval").unwrap(), "3\n");
    assert_eq!(rig.read("dtim_interval").unwrap(), "0\n");
}

#[test]
fn test_beacon_one_selects_single_beacon_mode() {
    let rig = create_test_rig();

    rig.write("beacon_interval", "1").unwrap();
    assert_eq!(rig.ctx.lock().conf.conn.wake_up_event, WakeUpEvent::Beacon);
    assert_eq!(rig.read("beacon_interval").unwrap(), "1\n");
}

#[test]
fn test_dtim_out_of_range_leaves_interval_unchanged() {
    let rig = create_test_rig();
    rig.write("dtim_interval", "5").unwrap();

    assert_eq!(rig.write("dtim_interval", "0").unwrap_err(), DiagError::Range);
    assert_eq!(rig.write("dtim_interval", "11").unwrap_err(), DiagError::Range);

    // 范围校验在模式决策之前, 失败不触碰存储
    assert_eq!(rig.read("dtim_interval").unwrap(), "5\n");
    assert_eq!(rig.ctx.lock().conf.conn.wake_up_event, WakeUpEvent::NDtim);
}

#[test]
fn test_beacon_out_of_range_rejected() {
    let rig = create_test_rig();

    assert_eq!(
        rig.write("beacon_interval", "0").unwrap_err(),
        DiagError::Range
    );
    assert_eq!(
        rig.write("beacon_interval", "256").unwrap_err(),
        DiagError::Range
    );
}

#[test]
fn test_composite_write_never_touches_hardware() {
    let rig = create_test_rig();
    rig.power_on_asleep();

    // 间隔在下次进入省电模式时生效, 写入本身不下发
    rig.write("dtim_interval", "3").unwrap();
    rig.write("beacon_interval", "7").unwrap();
    assert!(rig.events().is_empty());
}
