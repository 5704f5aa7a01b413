//! TI wl12xx/wl18xx 无线芯片诊断与配置核心
//!
//! 提供驱动调试接口的核心逻辑:
//! - 固件统计缓存 (按生命周期窗口限速刷新, 避免频繁唤醒硬件)
//! - 配置存储与属性注册表 (命名的可读/可写节点, 动态生成内容)
//! - 唤醒/休眠同步协议 (所有配置下发与统计刷新串行在单一 store 锁之后)
//! - 芯片识别 (probe 阶段通过分区表读取 chip id)
//!
//! # 并发模型
//!
//! 单一互斥锁 ([`ctx::WlCtx`] 内部) 保护全部配置字段、电源状态迁移和
//! 硬件下发步骤。两个并发写者不可能交错各自的 wake/push/sleep 序列。
//! 唤醒/休眠是慢操作且持锁执行 —— 这是有意的正确性取舍, 挂死的唤醒
//! 会阻塞后续全部属性 I/O (已知且接受的限制)。
//!
//! # 外部协作者
//!
//! 硬件传输层被抽象为 [`device::DeviceOps`] 能力对象; 伪文件系统的
//! 暴露机制不在本 crate 范围内, [`debugfs`] 只提供命名节点树。

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod ctx;
pub mod debugfs;
pub mod device;
pub mod error;
pub mod probe;
pub mod stats;

pub use ctx::WlCtx;
pub use error::DiagError;
