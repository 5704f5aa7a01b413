//! 芯片识别
//!
//! probe 阶段通过 boot 分区读取 chip id 寄存器, 识别芯片版本并选定
//! 对应的固件/NVS 文件名。平台驱动注册等接线逻辑属于外部协作者,
//! 这里只保留硬件识别本身。

use log::debug;

/// 一段地址窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemPart {
    pub start: u32,
    pub size: u32,
}

/// 分区集: 四个同时映射的地址窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSet {
    pub mem: MemPart,
    pub reg: MemPart,
    pub mem2: MemPart,
    pub mem3: MemPart,
}

/// wl18xx 分区表下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    TopPrcmElpSoc = 0,
    Down = 1,
    Boot = 2,
}

/// wl18xx 分区表
pub const WL18XX_PTABLE: [PartitionSet; 3] = [
    // PART_TOP_PRCM_ELP_SOC
    PartitionSet {
        mem: MemPart { start: 0x00A02000, size: 0x00010000 },
        reg: MemPart { start: 0x00807000, size: 0x00005000 },
        mem2: MemPart { start: 0x00800000, size: 0x0000B000 },
        mem3: MemPart { start: 0x00000000, size: 0x00000000 },
    },
    // PART_DOWN
    PartitionSet {
        mem: MemPart { start: 0x00000000, size: 0x00014000 },
        reg: MemPart { start: 0x00810000, size: 0x0000BFFF },
        mem2: MemPart { start: 0x00000000, size: 0x00000000 },
        mem3: MemPart { start: 0x00000000, size: 0x00000000 },
    },
    // PART_BOOT
    PartitionSet {
        mem: MemPart { start: 0x00700000, size: 0x0000030c },
        reg: MemPart { start: 0x00802000, size: 0x00014578 },
        mem2: MemPart { start: 0x00B00404, size: 0x00001000 },
        mem3: MemPart { start: 0x00C00000, size: 0x00000400 },
    },
];

/// chip id 寄存器 (boot 分区寄存器窗口内)
pub const WL18XX_CHIP_ID_B: u32 = 0x0080_54C8;

/// 185x PG10 版本的 chip id
pub const CHIP_ID_185X_PG10: u32 = 0x0603_0101;

pub const WL18XX_FW_NAME: &str = "ti-connectivity/wl18xx-fw-multirole-roc.bin";
pub const WL18XX_NVS_NAME: &str = "ti-connectivity/wl18xx-nvs.bin";

/// probe 阶段的裸寄存器访问 (与运行期的 DeviceOps 分离)
pub trait ChipIo {
    /// 切换当前映射的分区集
    fn select_partition(&mut self, part: &PartitionSet);

    /// 读 32 位寄存器
    fn read32(&mut self, addr: u32) -> u32;
}

/// 识别出的芯片信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipInfo {
    pub id: u32,
    pub fw_name: &'static str,
    pub nvs_name: &'static str,
}

/// 芯片识别错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    /// 未知的 chip id, 对应 -ENODEV
    UnsupportedChip(u32),
}

/// 读取 chip id 并匹配已知芯片版本
pub fn identify_chip(io: &mut dyn ChipIo) -> Result<ChipInfo, ProbeError> {
    io.select_partition(&WL18XX_PTABLE[Partition::Boot as usize]);

    let id = io.read32(WL18XX_CHIP_ID_B);
    match id {
        CHIP_ID_185X_PG10 => {
            debug!("chip id 0x{:x} (185x PG10)", id);
            Ok(ChipInfo {
                id,
                fw_name: WL18XX_FW_NAME,
                nvs_name: WL18XX_NVS_NAME,
            })
        }
        _ => {
            debug!("unsupported chip id: 0x{:x}", id);
            Err(ProbeError::UnsupportedChip(id))
        }
    }
}
