//! 表驱动的参数属性
//!
//! 每个可调参数一行描述符 (名称、文本格式、范围、是否需要硬件下发、
//! 存取函数), 由统一的构建函数生成 show/store 闭包, 取代逐参数的
//! 重复访问器代码。
//!
//! 写入路径: 解析 → 范围校验 → 持锁修改存储 → (可选) 持锁下发硬件。
//! 下发失败不回滚存储, 失败上报调用者。

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::warn;

use crate::config::Conf;
use crate::ctx::WlCtx;
use crate::debugfs::node::{DebugfsAttr, DebugfsNode};
use crate::device::ConfField;
use crate::error::DiagError;

/// 标量读出的文本格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fmt {
    /// 十进制, `%d\n`
    Dec,
    /// 十六进制, `0x%02x\n`
    Hex,
}

/// 标量参数描述符
pub struct ScalarParam {
    pub name: &'static str,
    pub fmt: Fmt,
    /// 接受的闭区间; `None` 表示不限
    pub range: Option<(u32, u32)>,
    /// 需要下发到固件的字段; `None` 表示纯内存参数
    pub push: Option<ConfField>,
    pub get: fn(&Conf) -> u32,
    pub set: fn(&mut Conf, u32),
}

/// 定长数组参数描述符
///
/// 文本编码为固定 3 字符一个元素 (2 位数字 + 1 位分隔), 总长必须恰好
/// 等于 `len * 3`。
pub struct ArrayParam {
    pub name: &'static str,
    pub len: usize,
    /// 元素解析进制
    pub base: u32,
    pub get: fn(&Conf, usize) -> u8,
    pub set: fn(&mut Conf, usize, u8),
}

/// kstrtoul(buf, 0, ..) 语义: 十进制或 0x 前缀十六进制
pub(crate) fn parse_ul(s: &str) -> Result<u32, DiagError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DiagError::Parse);
    }
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    u32::from_str_radix(digits, radix).map_err(|_| DiagError::Parse)
}

/// 为一个标量参数生成属性节点并挂到目录下
pub fn add_scalar_param(
    dir: &Arc<DebugfsNode>,
    ctx: &Arc<WlCtx>,
    param: &'static ScalarParam,
) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            let value = (param.get)(&inner.conf);
            Ok(match param.fmt {
                Fmt::Dec => format!("{}\n", value),
                Fmt::Hex => format!("0x{:02x}\n", value),
            })
        })
    };

    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let value = parse_ul(buf).inspect_err(|_| {
                warn!("illegal value for {}", param.name);
            })?;

            if let Some((lo, hi)) = param.range {
                if value < lo || value > hi {
                    warn!("{} value is not in valid range", param.name);
                    return Err(DiagError::Range);
                }
            }

            let mut inner = ctx.lock();
            (param.set)(&mut inner.conf, value);

            // 仍持有 store 锁, 存储更新与硬件下发之间不可能插入其它写者
            if let Some(field) = param.push {
                inner.push_config(field, value)?;
            }
            Ok(())
        })
    };

    dir.add_child(
        param.name,
        DebugfsNode::new_attribute(DebugfsAttr {
            name: param.name.to_string(),
            show: Some(show),
            store: Some(store),
        }),
    )
}

/// 为一个数组参数生成属性节点并挂到目录下
///
/// 写入采用"全部解析校验后一次性提交": 任何一个分块解析失败都不会
/// 修改任何元素 (原实现边解析边提交, 会留下部分写入, 这里不复刻)。
pub fn add_array_param(
    dir: &Arc<DebugfsNode>,
    ctx: &Arc<WlCtx>,
    param: &'static ArrayParam,
) -> Result<(), DiagError> {
    let show = {
        let ctx = ctx.clone();
        Arc::new(move || {
            let inner = ctx.lock();
            let mut out = String::new();
            for i in 0..param.len {
                out.push_str(&format!("[{}] = 0x{:02x}\n", i, (param.get)(&inner.conf, i)));
            }
            Ok(out)
        })
    };

    let store = {
        let ctx = ctx.clone();
        Arc::new(move |buf: &str| {
            let bytes = buf.as_bytes();
            if bytes.len() != param.len * 3 {
                warn!(
                    "failed to configure {}: str length should be {}",
                    param.name,
                    param.len * 3
                );
                return Err(DiagError::Length);
            }

            let mut values = Vec::with_capacity(param.len);
            for i in 0..param.len {
                let chunk = core::str::from_utf8(&bytes[i * 3..i * 3 + 2])
                    .map_err(|_| DiagError::Parse)?;
                let value = u8::from_str_radix(chunk, param.base).map_err(|_| {
                    warn!("illegal value for {}[{}]", param.name, i);
                    DiagError::Parse
                })?;
                values.push(value);
            }

            let mut inner = ctx.lock();
            for (i, value) in values.iter().enumerate() {
                (param.set)(&mut inner.conf, i, *value);
            }
            Ok(())
        })
    };

    dir.add_child(
        param.name,
        DebugfsNode::new_attribute(DebugfsAttr {
            name: param.name.to_string(),
            show: Some(show),
            store: Some(store),
        }),
    )
}

/// 根目录下的可调参数
pub static ROOT_PARAMS: &[ScalarParam] = &[
    ScalarParam {
        name: "tx_frag_thld",
        fmt: Fmt::Dec,
        range: None,
        push: Some(ConfField::FragThreshold),
        get: |c| c.tx.frag_threshold,
        set: |c, v| c.tx.frag_threshold = v,
    },
    ScalarParam {
        name: "tx_compl_timeout",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.tx.tx_compl_timeout,
        set: |c, v| c.tx.tx_compl_timeout = v,
    },
    ScalarParam {
        name: "tx_compl_threshold",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.tx.tx_compl_threshold,
        set: |c, v| c.tx.tx_compl_threshold = v,
    },
    ScalarParam {
        name: "irq_blk_threshold",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.rx.irq_blk_threshold,
        set: |c, v| c.rx.irq_blk_threshold = v,
    },
    ScalarParam {
        name: "irq_pkt_threshold",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.rx.irq_pkt_threshold,
        set: |c, v| c.rx.irq_pkt_threshold = v,
    },
    ScalarParam {
        name: "irq_timeout",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.rx.irq_timeout,
        set: |c, v| c.rx.irq_timeout = v,
    },
    ScalarParam {
        name: "dynamic_memory",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.mem.dynamic_memory,
        set: |c, v| c.mem.dynamic_memory = v,
    },
    ScalarParam {
        name: "min_req_rx_blocks",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.mem.min_req_rx_blocks,
        set: |c, v| c.mem.min_req_rx_blocks = v,
    },
    ScalarParam {
        name: "hw_checksum",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.hw_checksum_state,
        set: |c, v| c.hw_checksum_state = v,
    },
    ScalarParam {
        name: "tx_ba_win_size",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.ht.tx_ba_win_size,
        set: |c, v| c.ht.tx_ba_win_size = v,
    },
    ScalarParam {
        name: "tx_ba_tid_bitmap",
        fmt: Fmt::Dec,
        range: None,
        push: None,
        get: |c| c.ht.tx_ba_tid_bitmap,
        set: |c, v| c.ht.tx_ba_tid_bitmap = v,
    },
    ScalarParam {
        name: "sleep_auth",
        fmt: Fmt::Dec,
        range: None,
        push: Some(ConfField::SleepAuth),
        get: |c| c.sleep_auth,
        set: |c, v| c.sleep_auth = v,
    },
];

/// phy-mac-ini-params 目录下的标量参数 (十六进制读出)
pub static PHY_MAC_PARAMS: &[ScalarParam] = &[
    ScalarParam {
        name: "primary_clock_setting_time",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.primary_clock_setting_time,
        set: |c, v| c.mac_and_phy.primary_clock_setting_time = v,
    },
    ScalarParam {
        name: "secondary_clock_setting_time",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.secondary_clock_setting_time,
        set: |c, v| c.mac_and_phy.secondary_clock_setting_time = v,
    },
    ScalarParam {
        name: "external_pa_dc2dc",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.external_pa_dc2dc,
        set: |c, v| c.mac_and_phy.external_pa_dc2dc = v,
    },
    ScalarParam {
        name: "io_configuration",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.io_configuration,
        set: |c, v| c.mac_and_phy.io_configuration = v,
    },
    ScalarParam {
        name: "sdio_configuration",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.sdio_configuration,
        set: |c, v| c.mac_and_phy.sdio_configuration = v,
    },
    ScalarParam {
        name: "settings",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.settings,
        set: |c, v| c.mac_and_phy.settings = v,
    },
    ScalarParam {
        name: "enable_clpc",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.enable_clpc,
        set: |c, v| c.mac_and_phy.enable_clpc = v,
    },
    ScalarParam {
        name: "enable_tx_low_pwr_on_siso_rdl",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.enable_tx_low_pwr_on_siso_rdl,
        set: |c, v| c.mac_and_phy.enable_tx_low_pwr_on_siso_rdl = v,
    },
    ScalarParam {
        name: "rx_profile",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.rx_profile,
        set: |c, v| c.mac_and_phy.rx_profile = v,
    },
    ScalarParam {
        name: "pwr_limit_reference_11_abg",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.pwr_limit_reference_11_abg,
        set: |c, v| c.mac_and_phy.pwr_limit_reference_11_abg = v,
    },
    ScalarParam {
        name: "pwr_limit_reference_11p",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.pwr_limit_reference_11p,
        set: |c, v| c.mac_and_phy.pwr_limit_reference_11p = v,
    },
    ScalarParam {
        name: "xtal_itrim_val",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.mac_and_phy.xtal_itrim_val,
        set: |c, v| c.mac_and_phy.xtal_itrim_val = v,
    },
    ScalarParam {
        name: "hw_tx_extra_mem_blk",
        fmt: Fmt::Hex,
        range: None,
        push: None,
        get: |c| c.hw_tx_extra_mem_blk,
        set: |c, v| c.hw_tx_extra_mem_blk = v,
    },
];

/// phy-mac-ini-params 目录下的数组参数 (十六进制元素)
pub static PHY_MAC_ARRAYS: &[ArrayParam] = &[
    ArrayParam {
        name: "per_chan_pwr_limit_arr_11abg",
        len: crate::config::NUM_OF_CHANNELS_11_ABG,
        base: 16,
        get: |c, i| c.mac_and_phy.per_chan_pwr_limit_arr_11abg[i],
        set: |c, i, v| c.mac_and_phy.per_chan_pwr_limit_arr_11abg[i] = v,
    },
    ArrayParam {
        name: "per_chan_pwr_limit_arr_11p",
        len: crate::config::NUM_OF_CHANNELS_11_P,
        base: 16,
        get: |c, i| c.mac_and_phy.per_chan_pwr_limit_arr_11p[i],
        set: |c, i, v| c.mac_and_phy.per_chan_pwr_limit_arr_11p[i] = v,
    },
    ArrayParam {
        name: "per_sub_band_tx_trace_loss",
        len: crate::config::NUM_OF_SUB_BANDS,
        base: 16,
        get: |c, i| c.mac_and_phy.per_sub_band_tx_trace_loss[i],
        set: |c, i, v| c.mac_and_phy.per_sub_band_tx_trace_loss[i] = v,
    },
    ArrayParam {
        name: "per_sub_band_rx_trace_loss",
        len: crate::config::NUM_OF_SUB_BANDS,
        base: 16,
        get: |c, i| c.mac_and_phy.per_sub_band_rx_trace_loss[i],
        set: |c, i, v| c.mac_and_phy.per_sub_band_rx_trace_loss[i] = v,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ul_dec_and_hex() {
        assert_eq!(parse_ul("42").unwrap(), 42);
        assert_eq!(parse_ul("0x2a").unwrap(), 0x2a);
        assert_eq!(parse_ul("0X2A").unwrap(), 0x2a);
        assert_eq!(parse_ul(" 7\n").unwrap(), 7);
        assert_eq!(parse_ul("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_ul_rejects_garbage() {
        assert_eq!(parse_ul("").unwrap_err(), DiagError::Parse);
        assert_eq!(parse_ul("abc").unwrap_err(), DiagError::Parse);
        assert_eq!(parse_ul("0x").unwrap_err(), DiagError::Parse);
        assert_eq!(parse_ul("-1").unwrap_err(), DiagError::Parse);
    }
}
