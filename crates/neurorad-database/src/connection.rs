//! 数据库连接管理

use neurorad_core::Result;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use std::time::Duration;
use tracing::info;

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 连接字符串
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接的最长等待时间（秒）
    pub acquire_timeout_secs: u64,
    /// 空闲连接回收时间（秒）
    pub idle_timeout_secs: u64,
    /// 单条语句超时（毫秒），由服务端强制执行
    pub statement_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://neurorad@localhost:5432/neurorad".to_string(),
            max_connections: 3,
            min_connections: 0,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            statement_timeout_ms: 10_000,
        }
    }
}

/// 数据库连接池
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// 按配置建立连接池
    ///
    /// 每个新连接都会设置 REPEATABLE READ 隔离级别和语句超时。
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let statement_timeout_ms = config.statement_timeout_ms;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET SESSION CHARACTERISTICS AS TRANSACTION ISOLATION LEVEL REPEATABLE READ")
                        .await?;
                    let timeout = format!("SET statement_timeout = {}", statement_timeout_ms);
                    conn.execute(timeout.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout_secs,
            "Database connection pool created"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurorad_core::NeuroradError;

    #[test]
    fn test_default_pool_is_small_and_bounded() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 3);
        assert!(config.acquire_timeout_secs > 0);
        assert!(config.statement_timeout_ms > 0);
    }

    #[test]
    fn test_acquire_timeout_maps_to_resource_exhausted() {
        let err: NeuroradError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, NeuroradError::ResourceExhausted(_)));
    }
}
