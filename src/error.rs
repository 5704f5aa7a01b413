//! 诊断接口错误类型
//!
//! 定义属性读写路径上的全部错误码, 可通过 [`DiagError::to_errno()`] 转换为
//! 系统调用错误码。所有错误都局限于单次属性操作, 不会使设备或其它属性失效。

/// 诊断接口错误类型
///
/// 各错误码对应标准 POSIX errno 值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagError {
    // 写入校验相关
    Parse,  // -EINVAL(22): 文本无法解析为数值
    Range,  // -ERANGE(34): 数值超出属性声明范围
    Length, // -EINVAL(22): 数组编码长度不符

    // 硬件相关
    DeviceWake,   // -EIO(5): 唤醒失败, 内存中的修改保留, 下发被跳过
    HardwarePush, // -EIO(5): 唤醒成功但下发失败, 设备仍返回休眠

    // 注册表初始化相关
    Allocation, // -ENOMEM(12): 统计记录分配失败, 初始化完整回退
    Exists,     // -EEXIST(17): 节点重名

    // 节点树访问相关
    NotFound,         // -ENOENT(2): 节点不存在
    NotDirectory,     // -ENOTDIR(20): 不是目录
    IsDirectory,      // -EISDIR(21): 是目录
    PermissionDenied, // -EACCES(13): 节点不支持该方向的访问
}

impl DiagError {
    /// 转换为系统调用错误码（负数）
    pub fn to_errno(&self) -> isize {
        match self {
            DiagError::NotFound => -2,
            DiagError::DeviceWake => -5,
            DiagError::HardwarePush => -5,
            DiagError::Allocation => -12,
            DiagError::PermissionDenied => -13,
            DiagError::Exists => -17,
            DiagError::NotDirectory => -20,
            DiagError::IsDirectory => -21,
            DiagError::Parse => -22,
            DiagError::Length => -22,
            DiagError::Range => -34,
        }
    }
}
