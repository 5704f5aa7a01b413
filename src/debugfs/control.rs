//! 控制与复合属性
//!
//! 根目录下不走参数描述表的节点: GPIO 电源控制、恢复触发、驱动状态
//! 转储、固件日志开关、beacon 过滤, 以及共享 `listen_interval` 字段的
//! dtim_interval/beacon_interval 复合属性和 rx_streaming 子树。
//!
//! 复合属性的模式策略: 两个属性名共用一个存储字段, 由 `wake_up_event`
//! 枚举决定哪种语义生效。读取时模式不匹配返回 0 (表示未激活); 写入时
//! 间隔与模式在同一次持锁中原子更新, 写入值恰为 1 和大于 1 选择不同
//! 的枚举变体。

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use log::warn;

use crate::config::{FwlogOutput, WakeUpEvent};
use crate::ctx::{WlCtx, WlFlags};
use crate::debugfs::node::{DebugfsAttr, DebugfsNode, ShowFn, StoreFn};
use crate::debugfs::params::parse_ul;
use crate::device::ConfField;
use crate::error::DiagError;

fn add_attr(
    dir: &Arc<DebugfsNode>,
    name: &str,
    show: Option<Arc<ShowFn>>,
    store: Option<Arc<StoreFn>>,
) -> Result<(), DiagError> {
    dir.add_child(
        name,
        DebugfsNode::new_attribute(DebugfsAttr {
            name: name.to_string(),
            show,
            store,
        }),
    )
}

/// gpio_power: 读返回上电标志, 写 0/1 切换芯片电源
fn add_gpio_power(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            Ok(format!(
                "{}\n",
                inner.flags.contains(WlFlags::GPIO_POWER) as u32
            ))
        })
    };

    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value in gpio_power");
            })?;
            ctx.set_power(value != 0)
        })
    };

    add_attr(root, "gpio_power", Some(show), Some(store))
}

/// start_recovery: 只写节点, 任何写入都提交一次异步恢复动作
///
/// 契约只有"提交总是成功", 不等待也不回传恢复结果。
fn add_start_recovery(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let store = {
        let ctx = ctx.clone();
        Arc::new(move |_buf: &str| {
            ctx.queue_recovery();
            Ok(())
        })
    };

    add_attr(root, "start_recovery", None, Some(store))
}

/// driver_state: 持锁转储上下文关键字段, 每行 `name = value`
fn add_driver_state(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            let mut out = String::new();
            out.push_str(&format!("state = {:?}\n", inner.state));
            out.push_str(&format!(
                "gpio_power = {}\n",
                inner.flags.contains(WlFlags::GPIO_POWER) as u32
            ));
            out.push_str(&format!("sleep_auth = {}\n", inner.conf.sleep_auth));
            out.push_str(&format!(
                "frag_threshold = {}\n",
                inner.conf.tx.frag_threshold
            ));
            out.push_str(&format!(
                "listen_interval = {}\n",
                inner.conf.conn.listen_interval
            ));
            out.push_str(&format!(
                "wake_up_event = {:?}\n",
                inner.conf.conn.wake_up_event
            ));
            out.push_str(&format!(
                "fw_stats_update = {}\n",
                inner.stats.fw_stats_update
            ));
            out.push_str(&format!("retry_count = {}\n", inner.stats.retry_count));
            out.push_str(&format!(
                "excessive_retries = {}\n",
                inner.stats.excessive_retries
            ));
            Ok(out)
        })
    };

    add_attr(root, "driver_state", Some(show), None)
}

/// fwlog_enable: 固件日志回传开关 (0 = 调试引脚, 1 = 回传宿主)
fn add_fwlog_enable(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            let enabled = (inner.conf.fwlog.output == FwlogOutput::Host) as u32;
            Ok(format!("{}\n", enabled))
        })
    };

    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value in fwlog_enable");
            })?;
            if value > 1 {
                warn!("fwlog_enable value is not in valid range");
                return Err(DiagError::Range);
            }

            let mut inner = ctx.lock();
            inner.conf.fwlog.output = if value != 0 {
                FwlogOutput::Host
            } else {
                FwlogOutput::DbgPins
            };
            // 输出路径在固件下次重启时生效
            Ok(())
        })
    };

    add_attr(root, "fwlog_enable", Some(show), Some(store))
}

/// beacon_filtering: 只写节点, 直接下发过滤开关 (无存储字段)
fn add_beacon_filtering(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value for beacon_filtering");
            })?;

            let mut inner = ctx.lock();
            inner.push_config(ConfField::BeaconFilter, (value != 0) as u32)
        })
    };

    add_attr(root, "beacon_filtering", None, Some(store))
}

/// dtim_interval: 复合属性, 模式为 Dtim/NDtim 时可见
///
/// 新间隔在下次进入省电模式时生效, 不立即下发。
fn add_dtim_interval(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            let value = match inner.conf.conn.wake_up_event {
                WakeUpEvent::Dtim | WakeUpEvent::NDtim => inner.conf.conn.listen_interval,
                _ => 0,
            };
            Ok(format!("{}\n", value))
        })
    };

    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value for dtim_interval");
            })?;
            if !(1..=10).contains(&value) {
                warn!("dtim value is not in valid range");
                return Err(DiagError::Range);
            }

            let mut inner = ctx.lock();
            inner.conf.conn.listen_interval = value as u8;
            // 间隔恰为 1 监听每个 DTIM, 大于 1 监听每 N 个 DTIM
            inner.conf.conn.wake_up_event = if value == 1 {
                WakeUpEvent::Dtim
            } else {
                WakeUpEvent::NDtim
            };
            Ok(())
        })
    };

    add_attr(root, "dtim_interval", Some(show), Some(store))
}

/// beacon_interval: 复合属性, 模式为 Beacon/NBeacons 时可见
fn add_beacon_interval(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            let value = match inner.conf.conn.wake_up_event {
                WakeUpEvent::Beacon | WakeUpEvent::NBeacons => inner.conf.conn.listen_interval,
                _ => 0,
            };
            Ok(format!("{}\n", value))
        })
    };

    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value for beacon_interval");
            })?;
            if !(1..=255).contains(&value) {
                warn!("beacon interval value is not in valid range");
                return Err(DiagError::Range);
            }

            let mut inner = ctx.lock();
            inner.conf.conn.listen_interval = value as u8;
            inner.conf.conn.wake_up_event = if value == 1 {
                WakeUpEvent::Beacon
            } else {
                WakeUpEvent::NBeacons
            };
            Ok(())
        })
    };

    add_attr(root, "beacon_interval", Some(show), Some(store))
}

/// 根目录控制节点
pub fn add_control_files(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    add_gpio_power(root, ctx)?;
    add_start_recovery(root, ctx)?;
    add_driver_state(root, ctx)?;
    add_fwlog_enable(root, ctx)?;
    add_beacon_filtering(root, ctx)?;
    add_dtim_interval(root, ctx)?;
    add_beacon_interval(root, ctx)?;
    Ok(())
}

/// rx_streaming 子树: interval 与 always
///
/// 写入后在同一次持锁中下发重算请求, 与其它写者的 wake/push/sleep
/// 序列互斥。
pub fn build_rx_streaming(dir: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let interval_show = {
        let ctx = ctx.clone();
        Arc::new(move || Ok(format!("{}\n", ctx.lock().conf.rx_streaming.interval)))
    };
    let interval_store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value in rx_streaming interval");
            })?;
            // 0 表示禁用, 其余只接受 10..=100
            if value != 0 && !(10..=100).contains(&value) {
                warn!("rx_streaming interval is not in valid range");
                return Err(DiagError::Range);
            }

            let mut inner = ctx.lock();
            inner.conf.rx_streaming.interval = value;
            inner.push_config(ConfField::RxStreaming, value)
        })
    };
    add_attr(dir, "interval", Some(interval_show), Some(interval_store))?;

    let always_show = {
        let ctx = ctx.clone();
        Arc::new(move || Ok(format!("{}\n", ctx.lock().conf.rx_streaming.always)))
    };
    let always_store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value in rx_streaming always");
            })?;
            if value > 1 {
                warn!("rx_streaming always is not in valid range");
                return Err(DiagError::Range);
            }

            let mut inner = ctx.lock();
            inner.conf.rx_streaming.always = value;
            inner.push_config(ConfField::RxStreaming, value)
        })
    };
    add_attr(dir, "always", Some(always_show), Some(always_store))
}
