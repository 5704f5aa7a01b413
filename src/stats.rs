//! 固件统计缓存
//!
//! [`FwStats`] 是固件维护的诊断计数器块的宿主侧快照, 按固件统计命令的
//! 分组组织。快照只在设备唤醒期间由刷新操作覆写, 刷新受生命周期窗口
//! 限速 (见 [`crate::ctx`])。设备 (重新) 初始化时整块清零。

/// 收发描述符环统计
#[derive(Debug, Clone, Default)]
pub struct RingStats {
    pub tx_procs: u32,
    pub prepared_descs: u32,
    pub tx_xfr: u32,
    pub tx_dma: u32,
    pub tx_cmplt: u32,
    pub rx_procs: u32,
    pub rx_data: u32,
}

/// 固件内部调试计数器
#[derive(Debug, Clone, Default)]
pub struct DbgStats {
    pub debug1: u32,
    pub debug2: u32,
    pub debug3: u32,
    pub debug4: u32,
    pub debug5: u32,
    pub debug6: u32,
}

/// 发送路径统计
#[derive(Debug, Clone, Default)]
pub struct TxStats {
    pub frag_called: u32,
    pub frag_mpdu_alloc_failed: u32,
    pub frag_init_called: u32,
    pub frag_in_process_called: u32,
    pub frag_tkip_called: u32,
    pub frag_key_not_found: u32,
    pub frag_need_fragmentation: u32,
    pub frag_bad_mem_blk_num: u32,
    pub frag_failed: u32,
    pub frag_cache_hit: u32,
    pub frag_cache_miss: u32,
    pub template_prepared: u32,
    pub data_prepared: u32,
    pub template_programmed: u32,
    pub data_programmed: u32,
    pub burst_programmed: u32,
    pub starts: u32,
    pub imm_resp: u32,
    pub retry_template: u32,
    pub retry_data: u32,
}

/// 接收路径统计
#[derive(Debug, Clone, Default)]
pub struct RxStats {
    pub rx_out_of_mem: u32,
    pub rx_hdr_overflow: u32,
    pub rx_hw_stuck: u32,
    pub rx_dropped_frame: u32,
    pub rx_complete_dropped_frame: u32,
    pub rx_alloc_frame: u32,
    pub rx_done_queue: u32,
    pub rx_done: u32,
    pub defrag_called: u32,
    pub defrag_init_called: u32,
    pub defrag_in_process_called: u32,
    pub defrag_tkip_called: u32,
    pub defrag_need_defrag: u32,
    pub defrag_decrypt_failed: u32,
    pub decrypt_key_not_found: u32,
    pub defrag_need_decr: u32,
    pub xfr: u32,
    pub xfr_end: u32,
    pub cmplt: u32,
    pub timeout: u32,
}

/// DMA 错误统计
#[derive(Debug, Clone, Default)]
pub struct DmaStats {
    pub rx_errors: u32,
    pub tx_errors: u32,
}

/// 中断统计
#[derive(Debug, Clone, Default)]
pub struct IsrStats {
    pub irqs: u32,
}

/// 省电/beacon 接收统计
#[derive(Debug, Clone, Default)]
pub struct PwrStats {
    pub missing_bcns: u32,
    pub rcvd_beacons: u32,
    pub conn_out_of_sync: u32,
    /// 连续丢失 beacon 的分布, 下标 i 为连续丢失 i+1 个,
    /// 最后一格为 10 个及以上
    pub cont_missbcns_spread: [u32; 10],
    pub rcvd_awake_beacons_cnt: u32,
}

/// 固件事件统计
#[derive(Debug, Clone, Default)]
pub struct EventStats {
    pub calibration: u32,
    pub rx_mismatch: u32,
    pub rx_mem_empty: u32,
}

/// PS-Poll / U-APSD 统计
#[derive(Debug, Clone, Default)]
pub struct PsPollUpsdStats {
    pub ps_poll_timeouts: u32,
    pub upsd_timeouts: u32,
    pub upsd_max_ap_turn: u32,
    pub ps_poll_max_ap_turn: u32,
    pub ps_poll_utilization: u32,
    pub upsd_utilization: u32,
}

/// 接收过滤统计
#[derive(Debug, Clone, Default)]
pub struct RxFilterStats {
    pub beacon_filter: u32,
    pub arp_filter: u32,
    pub mc_filter: u32,
    pub dup_filter: u32,
    pub data_filter: u32,
    pub ibss_filter: u32,
}

/// 聚合大小分布统计
#[derive(Debug, Clone, Default)]
pub struct AggStats {
    /// 下标 i 为聚合了 i+1 个 MPDU 的次数
    pub size: [u32; 8],
}

/// 固件统计计数器块 (不透明记录, 由固件定义)
#[derive(Debug, Clone, Default)]
pub struct FwStats {
    pub ring: RingStats,
    pub dbg: DbgStats,
    pub tx: TxStats,
    pub rx: RxStats,
    pub dma: DmaStats,
    pub isr: IsrStats,
    pub pwr: PwrStats,
    pub event: EventStats,
    pub ps_poll_upsd: PsPollUpsdStats,
    pub rx_filter: RxFilterStats,
    pub agg: AggStats,
}

/// 统计缓存
///
/// `fw_stats` 在 debugfs 初始化时分配; 为 `None` 时 reset 是空操作,
/// 计数器读取返回 0。`fw_stats_update` 单调不减。
#[derive(Debug, Default)]
pub struct Stats {
    pub fw_stats: Option<alloc::boxed::Box<FwStats>>,
    pub fw_stats_update: u64,
    /// 驱动侧重传计数 (不属于固件块, 但随 reset 一起清零)
    pub retry_count: u32,
    pub excessive_retries: u32,
}
