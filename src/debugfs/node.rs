//! 调试接口节点
//!
//! 提供两种类型的节点:
//! - 目录 (Directory)
//! - 属性文件 (Attribute) - 内容通过闭包动态生成
//!
//! 注册表在初始化后只追加不修改; 具体的文件系统暴露机制由上层决定,
//! 这里只维护命名节点树本身。

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use spin::Mutex;

use crate::error::DiagError;

/// 属性内容生成器
pub type ShowFn = dyn Fn() -> Result<String, DiagError> + Send + Sync;
pub type StoreFn = dyn Fn(&str) -> Result<(), DiagError> + Send + Sync;

/// 调试属性
///
/// `show`/`store` 为 `None` 表示该方向不支持 (只读/只写节点)。
pub struct DebugfsAttr {
    pub name: String,
    pub show: Option<Arc<ShowFn>>,
    pub store: Option<Arc<StoreFn>>,
}

/// 节点内容类型
pub enum DebugfsNodeContent {
    /// 目录 (子节点)
    Directory(Mutex<BTreeMap<String, Arc<DebugfsNode>>>),

    /// 属性文件 (动态生成)
    Attribute(DebugfsAttr),
}

/// 调试接口节点
pub struct DebugfsNode {
    content: DebugfsNodeContent,
}

impl core::fmt::Debug for DebugfsNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.content {
            DebugfsNodeContent::Directory(_) => f.write_str("DebugfsNode::Directory"),
            DebugfsNodeContent::Attribute(attr) => {
                write!(f, "DebugfsNode::Attribute({})", attr.name)
            }
        }
    }
}

impl DebugfsNode {
    /// 创建目录节点
    pub fn new_directory() -> Arc<Self> {
        Arc::new(Self {
            content: DebugfsNodeContent::Directory(Mutex::new(BTreeMap::new())),
        })
    }

    /// 创建属性节点
    pub fn new_attribute(attr: DebugfsAttr) -> Arc<Self> {
        Arc::new(Self {
            content: DebugfsNodeContent::Attribute(attr),
        })
    }

    /// 向目录添加子节点
    ///
    /// 重名返回 [`DiagError::Exists`], 初始化失败路径据此完整回退。
    pub fn add_child(&self, name: &str, child: Arc<DebugfsNode>) -> Result<(), DiagError> {
        match &self.content {
            DebugfsNodeContent::Directory(children) => {
                let mut children = children.lock();
                if children.contains_key(name) {
                    return Err(DiagError::Exists);
                }
                children.insert(name.to_string(), child);
                Ok(())
            }
            _ => Err(DiagError::NotDirectory),
        }
    }

    /// 查找子节点
    pub fn lookup(&self, name: &str) -> Result<Arc<DebugfsNode>, DiagError> {
        match &self.content {
            DebugfsNodeContent::Directory(children) => children
                .lock()
                .get(name)
                .cloned()
                .ok_or(DiagError::NotFound),
            _ => Err(DiagError::NotDirectory),
        }
    }

    /// 列出目录内容
    pub fn readdir(&self) -> Result<Vec<String>, DiagError> {
        match &self.content {
            DebugfsNodeContent::Directory(children) => {
                Ok(children.lock().keys().cloned().collect())
            }
            _ => Err(DiagError::NotDirectory),
        }
    }

    /// 读取属性内容
    pub fn read(&self) -> Result<String, DiagError> {
        match &self.content {
            DebugfsNodeContent::Attribute(attr) => match &attr.show {
                Some(show) => (show)(),
                None => Err(DiagError::PermissionDenied),
            },
            _ => Err(DiagError::IsDirectory),
        }
    }

    /// 写入属性
    pub fn write(&self, buf: &str) -> Result<(), DiagError> {
        match &self.content {
            DebugfsNodeContent::Attribute(attr) => match &attr.store {
                Some(store) => (store)(buf),
                None => Err(DiagError::PermissionDenied),
            },
            _ => Err(DiagError::IsDirectory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ro_attr(name: &str, text: &'static str) -> Arc<DebugfsNode> {
        DebugfsNode::new_attribute(DebugfsAttr {
            name: name.to_string(),
            show: Some(Arc::new(move || Ok(text.to_string()))),
            store: None,
        })
    }

    #[test]
    fn test_directory_add_lookup() {
        let dir = DebugfsNode::new_directory();
        dir.add_child("a", ro_attr("a", "1\n")).unwrap();
        assert_eq!(dir.lookup("a").unwrap().read().unwrap(), "1\n");
        assert_eq!(dir.lookup("b").unwrap_err(), DiagError::NotFound);
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let dir = DebugfsNode::new_directory();
        dir.add_child("a", ro_attr("a", "1\n")).unwrap();
        assert_eq!(
            dir.add_child("a", ro_attr("a", "2\n")).unwrap_err(),
            DiagError::Exists
        );
        // 原有节点不受影响
        assert_eq!(dir.lookup("a").unwrap().read().unwrap(), "1\n");
    }

    #[test]
    fn test_readonly_node_rejects_write() {
        let attr = ro_attr("a", "1\n");
        assert_eq!(attr.write("2").unwrap_err(), DiagError::PermissionDenied);
    }

    #[test]
    fn test_attr_is_not_directory() {
        let attr = ro_attr("a", "1\n");
        assert_eq!(attr.lookup("x").unwrap_err(), DiagError::NotDirectory);
        let dir = DebugfsNode::new_directory();
        assert_eq!(dir.read().unwrap_err(), DiagError::IsDirectory);
    }
}
