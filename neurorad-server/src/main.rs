//! 标注服务主程序

mod config;

use anyhow::Context;
use clap::Parser;
use neurorad_core::{FeatureStore, ReportStore};
use neurorad_database::{DatabasePool, DatabaseQueries, MemoryStore};
use neurorad_web::{AppState, WebServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::AppConfig;

/// 服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "neurorad-server")]
#[command(about = "影像报告结构化标注服务")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听主机，覆盖配置文件
    #[arg(long)]
    host: Option<String>,

    /// 监听端口，覆盖配置文件
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,

    /// 使用内存存储代替PostgreSQL（仅用于本地调试）
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.as_str())
        .init();

    info!("Starting neurorad server...");
    if let Some(path) = &args.config {
        info!("Configuration loaded from: {}", path);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid listen address")?;

    let (state, pool) = if args.memory_store {
        warn!("Using in-memory store, data will not survive a restart");
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn FeatureStore>, store as Arc<dyn ReportStore>);
        (state, None)
    } else {
        let pool = DatabasePool::connect(&config.database)
            .await
            .context("Failed to connect to database")?;
        let queries = Arc::new(DatabaseQueries::new(pool.clone()));
        let state = AppState::new(queries.clone() as Arc<dyn FeatureStore>, queries as Arc<dyn ReportStore>);
        (state, Some(pool))
    };

    info!("Server configuration:");
    info!("  Listen address: {}", addr);
    info!("  Static files: {}", config.static_files.root_dir.display());
    info!("  Database pool size: {}", config.database.max_connections);

    let server = WebServer::new(addr, state, &config.static_files);
    let result = server.run().await;

    // 服务停止后归还数据库连接
    if let Some(pool) = pool {
        pool.close().await;
    }

    if let Err(e) = result {
        error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
