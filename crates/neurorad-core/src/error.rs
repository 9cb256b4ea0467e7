//! 错误定义模块

use thiserror::Error;

/// 系统统一错误类型
#[derive(Error, Debug)]
pub enum NeuroradError {
    #[error("数据库错误: {0}")]
    Database(String),

    /// 连接池获取超时或语句执行超时
    #[error("资源耗尽: {0}")]
    ResourceExhausted(String),

    #[error("网络错误: {0}")]
    Network(#[from] std::io::Error),

    #[error("请求无效: {0}")]
    BadRequest(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for NeuroradError {
    fn from(e: serde_json::Error) -> Self {
        // 唯一的反序列化入口是请求体，格式错误属于客户端问题
        NeuroradError::BadRequest(format!("invalid JSON body: {}", e))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for NeuroradError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => {
                NeuroradError::ResourceExhausted("timed out waiting for a database connection".to_string())
            }
            // 57014: query_canceled，由 statement_timeout 触发
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("57014") => {
                NeuroradError::ResourceExhausted(format!("statement timed out: {}", db.message()))
            }
            other => NeuroradError::Database(other.to_string()),
        }
    }
}

/// 系统统一结果类型
pub type Result<T> = std::result::Result<T, NeuroradError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(NeuroradError::from(err), NeuroradError::BadRequest(_)));
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_pool_timeout_is_resource_exhausted() {
        let err = NeuroradError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, NeuroradError::ResourceExhausted(_)));

        let err = NeuroradError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, NeuroradError::Database(_)));
    }
}
