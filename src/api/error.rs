// ==========================================
// 餐饮后厨管理系统 - API 层错误类型
// ==========================================
// 职责: 定义 API 层错误类型,转换下层错误为用户可读的错误消息
// 红线: 错误信息必须包含显式原因,不静默吞错,不内部重试
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use crate::storage::error::StorageError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("字段校验失败 (field={field}): {message}")]
    ValidationError { field: String, message: String },

    // ==========================================
    // 业务错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 存储错误
    // ==========================================
    #[error("媒体存储失败: {0}")]
    StorageError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 便捷构造: 字段校验错误
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为用户可读的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation { field, message } => {
                ApiError::ValidationError { field, message }
            }
            EngineError::NonPositiveYield(amount) => ApiError::validation(
                "yield.amount",
                format!("产量必须为正数: {}", amount),
            ),
            EngineError::UnparsableRatio(raw) => ApiError::validation(
                "recipe_unit_ratio",
                format!("单位配比无法解析: {}", raw),
            ),
            EngineError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 StorageError 转换
// ==========================================
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => ApiError::NotFound(format!("媒体对象不存在: {}", path)),
            other => ApiError::StorageError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
