// ==========================================
// 餐饮后厨管理系统 - 存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("非法对象路径: {0}")]
    InvalidPath(String),

    #[error("对象不存在: {0}")]
    NotFound(String),

    #[error("存储 I/O 失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type StorageResult<T> = Result<T, StorageError>;
