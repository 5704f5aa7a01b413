//! fw-statistics 子树
//!
//! 每个固件计数器一个只读节点, 命名为 `{分组}_{字段}`, 内容为无符号
//! 十进制加换行。每次读取都先经过限速的统计刷新: 同一生命周期窗口内
//! 的重复读取不会再次唤醒硬件; 唤醒失败时继续返回旧快照。

use alloc::format;
use alloc::string::ToString;
use alloc::sync::Arc;

use crate::ctx::WlCtx;
use crate::debugfs::node::{DebugfsAttr, DebugfsNode};
use crate::error::DiagError;
use crate::stats::FwStats;

type Extract = fn(&FwStats) -> u32;

/// 计数器节点表 (名称 → 字段提取)
static FW_STATS_FILES: &[(&str, Extract)] = &[
    // ring
    ("ring_tx_procs", |s| s.ring.tx_procs),
    ("ring_prepared_descs", |s| s.ring.prepared_descs),
    ("ring_tx_xfr", |s| s.ring.tx_xfr),
    ("ring_tx_dma", |s| s.ring.tx_dma),
    ("ring_tx_cmplt", |s| s.ring.tx_cmplt),
    ("ring_rx_procs", |s| s.ring.rx_procs),
    ("ring_rx_data", |s| s.ring.rx_data),
    // dbg
    ("dbg_debug1", |s| s.dbg.debug1),
    ("dbg_debug2", |s| s.dbg.debug2),
    ("dbg_debug3", |s| s.dbg.debug3),
    ("dbg_debug4", |s| s.dbg.debug4),
    ("dbg_debug5", |s| s.dbg.debug5),
    ("dbg_debug6", |s| s.dbg.debug6),
    // tx
    ("tx_frag_called", |s| s.tx.frag_called),
    ("tx_frag_mpdu_alloc_failed", |s| s.tx.frag_mpdu_alloc_failed),
    ("tx_frag_init_called", |s| s.tx.frag_init_called),
    ("tx_frag_in_process_called", |s| s.tx.frag_in_process_called),
    ("tx_frag_tkip_called", |s| s.tx.frag_tkip_called),
    ("tx_frag_key_not_found", |s| s.tx.frag_key_not_found),
    ("tx_frag_need_fragmentation", |s| s.tx.frag_need_fragmentation),
    ("tx_frag_bad_mem_blk_num", |s| s.tx.frag_bad_mem_blk_num),
    ("tx_frag_failed", |s| s.tx.frag_failed),
    ("tx_frag_cache_hit", |s| s.tx.frag_cache_hit),
    ("tx_frag_cache_miss", |s| s.tx.frag_cache_miss),
    ("tx_template_prepared", |s| s.tx.template_prepared),
    ("tx_data_prepared", |s| s.tx.data_prepared),
    ("tx_template_programmed", |s| s.tx.template_programmed),
    ("tx_data_programmed", |s| s.tx.data_programmed),
    ("tx_burst_programmed", |s| s.tx.burst_programmed),
    ("tx_starts", |s| s.tx.starts),
    ("tx_imm_resp", |s| s.tx.imm_resp),
    ("tx_retry_template", |s| s.tx.retry_template),
    ("tx_retry_data", |s| s.tx.retry_data),
    // rx
    ("rx_rx_out_of_mem", |s| s.rx.rx_out_of_mem),
    ("rx_rx_hdr_overflow", |s| s.rx.rx_hdr_overflow),
    ("rx_rx_hw_stuck", |s| s.rx.rx_hw_stuck),
    ("rx_rx_dropped_frame", |s| s.rx.rx_dropped_frame),
    ("rx_rx_complete_dropped_frame", |s| s.rx.rx_complete_dropped_frame),
    ("rx_rx_alloc_frame", |s| s.rx.rx_alloc_frame),
    ("rx_rx_done_queue", |s| s.rx.rx_done_queue),
    ("rx_rx_done", |s| s.rx.rx_done),
    ("rx_defrag_called", |s| s.rx.defrag_called),
    ("rx_defrag_init_called", |s| s.rx.defrag_init_called),
    ("rx_defrag_in_process_called", |s| s.rx.defrag_in_process_called),
    ("rx_defrag_tkip_called", |s| s.rx.defrag_tkip_called),
    ("rx_defrag_need_defrag", |s| s.rx.defrag_need_defrag),
    ("rx_defrag_decrypt_failed", |s| s.rx.defrag_decrypt_failed),
    ("rx_decrypt_key_not_found", |s| s.rx.decrypt_key_not_found),
    ("rx_defrag_need_decr", |s| s.rx.defrag_need_decr),
    ("rx_xfr", |s| s.rx.xfr),
    ("rx_xfr_end", |s| s.rx.xfr_end),
    ("rx_cmplt", |s| s.rx.cmplt),
    ("rx_timeout", |s| s.rx.timeout),
    // dma
    ("dma_rx_errors", |s| s.dma.rx_errors),
    ("dma_tx_errors", |s| s.dma.tx_errors),
    // isr
    ("isr_irqs", |s| s.isr.irqs),
    // pwr
    ("pwr_missing_bcns", |s| s.pwr.missing_bcns),
    ("pwr_rcvd_beacons", |s| s.pwr.rcvd_beacons),
    ("pwr_conn_out_of_sync", |s| s.pwr.conn_out_of_sync),
    ("pwr_cont_missbcns_spread_1", |s| s.pwr.cont_missbcns_spread[0]),
    ("pwr_cont_missbcns_spread_2", |s| s.pwr.cont_missbcns_spread[1]),
    ("pwr_cont_missbcns_spread_3", |s| s.pwr.cont_missbcns_spread[2]),
    ("pwr_cont_missbcns_spread_4", |s| s.pwr.cont_missbcns_spread[3]),
    ("pwr_cont_missbcns_spread_5", |s| s.pwr.cont_missbcns_spread[4]),
    ("pwr_cont_missbcns_spread_6", |s| s.pwr.cont_missbcns_spread[5]),
    ("pwr_cont_missbcns_spread_7", |s| s.pwr.cont_missbcns_spread[6]),
    ("pwr_cont_missbcns_spread_8", |s| s.pwr.cont_missbcns_spread[7]),
    ("pwr_cont_missbcns_spread_9", |s| s.pwr.cont_missbcns_spread[8]),
    ("pwr_cont_missbcns_spread_10_plus", |s| s.pwr.cont_missbcns_spread[9]),
    ("pwr_rcvd_awake_beacons_cnt", |s| s.pwr.rcvd_awake_beacons_cnt),
    // event
    ("event_calibration", |s| s.event.calibration),
    ("event_rx_mismatch", |s| s.event.rx_mismatch),
    ("event_rx_mem_empty", |s| s.event.rx_mem_empty),
    // ps_poll_upsd
    ("ps_poll_upsd_ps_poll_timeouts", |s| s.ps_poll_upsd.ps_poll_timeouts),
    ("ps_poll_upsd_upsd_timeouts", |s| s.ps_poll_upsd.upsd_timeouts),
    ("ps_poll_upsd_upsd_max_ap_turn", |s| s.ps_poll_upsd.upsd_max_ap_turn),
    ("ps_poll_upsd_ps_poll_max_ap_turn", |s| s.ps_poll_upsd.ps_poll_max_ap_turn),
    ("ps_poll_upsd_ps_poll_utilization", |s| s.ps_poll_upsd.ps_poll_utilization),
    ("ps_poll_upsd_upsd_utilization", |s| s.ps_poll_upsd.upsd_utilization),
    // rx_filter
    ("rx_filter_beacon_filter", |s| s.rx_filter.beacon_filter),
    ("rx_filter_arp_filter", |s| s.rx_filter.arp_filter),
    ("rx_filter_mc_filter", |s| s.rx_filter.mc_filter),
    ("rx_filter_dup_filter", |s| s.rx_filter.dup_filter),
    ("rx_filter_data_filter", |s| s.rx_filter.data_filter),
    ("rx_filter_ibss_filter", |s| s.rx_filter.ibss_filter),
    // agg_size
    ("agg_size_1", |s| s.agg.size[0]),
    ("agg_size_2", |s| s.agg.size[1]),
    ("agg_size_3", |s| s.agg.size[2]),
    ("agg_size_4", |s| s.agg.size[3]),
    ("agg_size_5", |s| s.agg.size[4]),
    ("agg_size_6", |s| s.agg.size[5]),
    ("agg_size_7", |s| s.agg.size[6]),
    ("agg_size_8", |s| s.agg.size[7]),
];

/// 构建 fw-statistics 子树
pub fn build_fw_stats(dir: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    for (name, extract) in FW_STATS_FILES {
        let show = {
            let ctx = ctx.clone();
            let extract = *extract;
            Arc::new(move || {
                let now = ctx.now();
                let mut inner = ctx.lock();
                // 唤醒失败只是拿到旧值, 读取本身不失败
                let _ = inner.update_stats(now);
                let value = inner
                    .stats
                    .fw_stats
                    .as_ref()
                    .map(|fw| extract(fw))
                    .unwrap_or(0);
                Ok(format!("{}\n", value))
            })
        };

        dir.add_child(
            name,
            DebugfsNode::new_attribute(DebugfsAttr {
                name: name.to_string(),
                show: Some(show),
                store: None,
            }),
        )?;
    }
    Ok(())
}

/// 驱动侧重传计数 (根目录下的只读节点, 不触发统计刷新)
pub fn add_driver_counters(root: &Arc<DebugfsNode>, ctx: &Arc<WlCtx>) -> Result<(), DiagError> {
    let retry = {
        let ctx = ctx.clone();
        Arc::new(move || Ok(format!("{}\n", ctx.lock().stats.retry_count)))
    };
    root.add_child(
        "retry_count",
        DebugfsNode::new_attribute(DebugfsAttr {
            name: "retry_count".to_string(),
            show: Some(retry),
            store: None,
        }),
    )?;

    let excessive = {
        let ctx = ctx.clone();
        Arc::new(move || Ok(format!("{}\n", ctx.lock().stats.excessive_retries)))
    };
    root.add_child(
        "excessive_retries",
        DebugfsNode::new_attribute(DebugfsAttr {
            name: "excessive_retries".to_string(),
            show: Some(excessive),
            store: None,
        }),
    )
}
