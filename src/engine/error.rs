// ==========================================
// 餐饮后厨管理系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 除零/NaN 必须显式失败,禁止 Infinity/NaN 流入派生字段
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 校验错误 =====
    #[error("字段校验失败 (field={field}): {message}")]
    Validation { field: String, message: String },

    // ===== 算术保护 =====
    #[error("产量必须为正数: yield.amount={0}")]
    NonPositiveYield(f64),

    #[error("单位配比无法解析: {0}")]
    UnparsableRatio(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// 便捷构造: 字段校验错误
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
