// ==========================================
// 托盘门店分配系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为用户友好的错误消息
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::AllocationError;
use crate::export::ExportError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 参数与业务错误
    // ==========================================
    #[error("参数校验失败: {0}")]
    InvalidParameter(#[from] AllocationError),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

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
    // 导入 / 导出 / 配置错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("结果导出失败: {0}")]
    ExportError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InternalError(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownKey(_) | ConfigError::ConfigValueError { .. } => {
                ApiError::InvalidInput(err.to_string())
            }
            _ => ApiError::ConfigError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_is_user_facing() {
        let err: ApiError = RepositoryError::NotFound {
            entity: "AssignmentRun".to_string(),
            id: "r1".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "资源未找到: AssignmentRun(id=r1)不存在");
    }

    #[test]
    fn test_bad_config_value_is_invalid_input() {
        let err: ApiError = ConfigError::UnknownKey("colour".to_string()).into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        let err: ApiError = ConfigError::LockError("poisoned".to_string()).into();
        assert!(matches!(err, ApiError::ConfigError(_)));
    }

    #[test]
    fn test_allocation_error_maps_to_invalid_parameter() {
        let err: ApiError = AllocationError::AlphaOutOfRange(2.0).into();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }
}
