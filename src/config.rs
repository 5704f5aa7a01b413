//! 配置存储
//!
//! 设备的全部可调运行参数, 按原固件配置路径分组。所有字段只在持有
//! store 锁时读写; 范围校验在属性描述表 ([`crate::debugfs`]) 中声明,
//! 越界写入在提交前被拒绝。

/// 2.4/5GHz 信道数 (逐信道功率上限表长度)
pub const NUM_OF_CHANNELS_11_ABG: usize = 40;
/// 802.11p 信道数
pub const NUM_OF_CHANNELS_11_P: usize = 7;
/// 子频段数 (trace loss 表长度)
pub const NUM_OF_SUB_BANDS: usize = 9;

/// 省电唤醒事件类型
///
/// dtim_interval 与 beacon_interval 两个属性共享 `listen_interval` 字段,
/// 由本枚举决定哪种语义生效 (互斥)。间隔为 1 和 >1 使用不同的事件类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeUpEvent {
    /// 每个 DTIM 唤醒
    Dtim,
    /// 每 N 个 DTIM 唤醒
    NDtim,
    /// 每个 beacon 唤醒
    Beacon,
    /// 每 N 个 beacon 唤醒
    NBeacons,
}

/// 固件日志输出路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FwlogOutput {
    /// 输出到调试引脚 (即宿主侧关闭)
    DbgPins,
    /// 回传到宿主
    Host,
}

/// 连接/省电参数
#[derive(Debug, Clone)]
pub struct ConnConf {
    pub wake_up_event: WakeUpEvent,
    pub listen_interval: u8,
}

/// 接收路径中断聚合参数
#[derive(Debug, Clone)]
pub struct RxConf {
    pub irq_blk_threshold: u32,
    pub irq_pkt_threshold: u32,
    pub irq_timeout: u32,
}

/// 发送路径参数
#[derive(Debug, Clone)]
pub struct TxConf {
    pub frag_threshold: u32,
    pub tx_compl_timeout: u32,
    pub tx_compl_threshold: u32,
}

/// HT (11n) 聚合参数
#[derive(Debug, Clone)]
pub struct HtConf {
    pub tx_ba_win_size: u32,
    pub tx_ba_tid_bitmap: u32,
}

/// 固件内存划分参数
#[derive(Debug, Clone)]
pub struct MemConf {
    pub dynamic_memory: u32,
    pub min_req_rx_blocks: u32,
}

/// 固件日志参数
#[derive(Debug, Clone)]
pub struct FwlogConf {
    pub output: FwlogOutput,
}

/// rx streaming 参数
#[derive(Debug, Clone)]
pub struct RxStreamingConf {
    /// 有效值: 0 或 10..=100
    pub interval: u32,
    /// 有效值: 0 或 1
    pub always: u32,
}

/// MAC/PHY 初始化参数 (ini 参数, 出厂校准相关)
#[derive(Debug, Clone)]
pub struct MacPhyConf {
    pub primary_clock_setting_time: u32,
    pub secondary_clock_setting_time: u32,
    pub external_pa_dc2dc: u32,
    pub io_configuration: u32,
    pub sdio_configuration: u32,
    pub settings: u32,
    pub enable_clpc: u32,
    pub enable_tx_low_pwr_on_siso_rdl: u32,
    pub rx_profile: u32,
    pub pwr_limit_reference_11_abg: u32,
    pub pwr_limit_reference_11p: u32,
    pub xtal_itrim_val: u32,
    pub per_chan_pwr_limit_arr_11abg: [u8; NUM_OF_CHANNELS_11_ABG],
    pub per_chan_pwr_limit_arr_11p: [u8; NUM_OF_CHANNELS_11_P],
    pub per_sub_band_tx_trace_loss: [u8; NUM_OF_SUB_BANDS],
    pub per_sub_band_rx_trace_loss: [u8; NUM_OF_SUB_BANDS],
}

/// 配置存储
///
/// 生命周期与设备一致: attach 时创建, detach 时销毁。
#[derive(Debug, Clone)]
pub struct Conf {
    pub conn: ConnConf,
    pub rx: RxConf,
    pub tx: TxConf,
    pub ht: HtConf,
    pub mem: MemConf,
    pub fwlog: FwlogConf,
    pub rx_streaming: RxStreamingConf,
    pub mac_and_phy: MacPhyConf,
    pub hw_checksum_state: u32,
    pub hw_tx_extra_mem_blk: u32,
    pub sleep_auth: u32,
}

impl Default for Conf {
    fn default() -> Self {
        Self {
            conn: ConnConf {
                wake_up_event: WakeUpEvent::Dtim,
                listen_interval: 1,
            },
            rx: RxConf {
                irq_blk_threshold: 0,
                irq_pkt_threshold: 0,
                irq_timeout: 5,
            },
            tx: TxConf {
                frag_threshold: 2346,
                tx_compl_timeout: 700,
                tx_compl_threshold: 4,
            },
            ht: HtConf {
                tx_ba_win_size: 64,
                tx_ba_tid_bitmap: 0xff,
            },
            mem: MemConf {
                dynamic_memory: 1,
                min_req_rx_blocks: 22,
            },
            fwlog: FwlogConf {
                output: FwlogOutput::DbgPins,
            },
            rx_streaming: RxStreamingConf {
                interval: 20,
                always: 0,
            },
            mac_and_phy: MacPhyConf {
                primary_clock_setting_time: 0x05,
                secondary_clock_setting_time: 0x05,
                external_pa_dc2dc: 0,
                io_configuration: 0x01,
                sdio_configuration: 0x03,
                settings: 0,
                enable_clpc: 0,
                enable_tx_low_pwr_on_siso_rdl: 0,
                rx_profile: 0,
                pwr_limit_reference_11_abg: 0x64,
                pwr_limit_reference_11p: 0x64,
                xtal_itrim_val: 0x04,
                per_chan_pwr_limit_arr_11abg: [0xff; NUM_OF_CHANNELS_11_ABG],
                per_chan_pwr_limit_arr_11p: [0xff; NUM_OF_CHANNELS_11_P],
                per_sub_band_tx_trace_loss: [0; NUM_OF_SUB_BANDS],
                per_sub_band_rx_trace_loss: [0; NUM_OF_SUB_BANDS],
            },
            hw_checksum_state: 0,
            hw_tx_extra_mem_blk: 0,
            sleep_auth: 1,
        }
    }
}
