//! 调试接口属性注册表
//!
//! 把配置存储与统计缓存组装成一棵命名节点树:
//!
//! - 根目录: 表驱动的可调参数 ([`params`])、控制节点与复合属性
//!   ([`control`])、驱动侧重传计数
//! - `fw-statistics/`: 每个固件计数器一个只读节点 ([`counters`])
//! - `rx_streaming/`: 接收流参数
//! - `phy-mac-ini-params/`: MAC/PHY 出厂校准参数 (标量与数组)
//!
//! 注册表在初始化后只追加不修改。初始化分配统计记录并构建全部节点,
//! 任何一步失败都完整回退, 不留下半注册状态。

pub mod control;
pub mod counters;
pub mod node;
pub mod params;

#[cfg(test)]
mod tests;

use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::ctx::WlCtx;
use crate::error::DiagError;
use crate::stats::FwStats;

pub use node::{DebugfsAttr, DebugfsNode};

/// 调试接口根
///
/// 持有节点树与设备上下文; 具体的文件系统暴露机制由上层决定。
pub struct DebugfsRoot {
    root: Arc<DebugfsNode>,
    ctx: Arc<WlCtx>,
}

impl DebugfsRoot {
    /// 初始化注册表
    ///
    /// 先分配固件统计记录并打上当前时间戳 (新上下文的计数器读取在
    /// 第一个生命周期窗口内返回零), 再构建节点树。构建失败时释放
    /// 统计记录并丢弃已建的部分树。
    pub fn init(ctx: Arc<WlCtx>) -> Result<Self, DiagError> {
        let now = ctx.now();
        {
            let mut inner = ctx.lock();
            inner.stats.fw_stats = Some(Box::new(FwStats::default()));
            inner.stats.fw_stats_update = now;
        }

        match Self::build_tree(&ctx) {
            Ok(root) => Ok(Self { root, ctx }),
            Err(e) => {
                ctx.lock().stats.fw_stats = None;
                Err(e)
            }
        }
    }

    fn build_tree(ctx: &Arc<WlCtx>) -> Result<Arc<DebugfsNode>, DiagError> {
        let root = DebugfsNode::new_directory();

        for param in params::ROOT_PARAMS {
            params::add_scalar_param(&root, ctx, param)?;
        }
        counters::add_driver_counters(&root, ctx)?;
        control::add_control_files(&root, ctx)?;

        let fw_stats = DebugfsNode::new_directory();
        counters::build_fw_stats(&fw_stats, ctx)?;
        root.add_child("fw-statistics", fw_stats)?;

        let rx_streaming = DebugfsNode::new_directory();
        control::build_rx_streaming(&rx_streaming, ctx)?;
        root.add_child("rx_streaming", rx_streaming)?;

        let phy_mac = DebugfsNode::new_directory();
        for param in params::PHY_MAC_PARAMS {
            params::add_scalar_param(&phy_mac, ctx, param)?;
        }
        for param in params::PHY_MAC_ARRAYS {
            params::add_array_param(&phy_mac, ctx, param)?;
        }
        root.add_child("phy-mac-ini-params", phy_mac)?;

        Ok(root)
    }

    /// 节点树根目录
    pub fn root(&self) -> &Arc<DebugfsNode> {
        &self.root
    }

    /// 按 `a/b/c` 形式的路径查找节点
    pub fn lookup_path(&self, path: &str) -> Result<Arc<DebugfsNode>, DiagError> {
        let mut node = self.root.clone();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            node = node.lookup(part)?;
        }
        Ok(node)
    }

    /// 清零统计缓存与驱动侧错误计数
    ///
    /// 纯内存操作, 任何电源状态下都可调用。
    pub fn reset(&self) {
        self.ctx.reset_stats();
    }

    /// 注销注册表, 释放统计记录
    pub fn exit(self) {
        self.ctx.lock().stats.fw_stats = None;
    }
}
