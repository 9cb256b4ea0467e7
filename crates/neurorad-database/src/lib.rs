//! # Neurorad数据库模块
//!
//! 负责报告与标注的持久化，提供PostgreSQL连接池、查询实现以及用于测试和
//! 本地运行的内存存储。

pub mod connection;
pub mod memory;
pub mod models;
pub mod queries;

// 重新导出主要类型
pub use connection::{DatabaseConfig, DatabasePool};
pub use memory::MemoryStore;
pub use queries::DatabaseQueries;
