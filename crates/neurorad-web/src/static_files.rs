//! 静态文件服务模块
//!
//! 前端标注页面由独立构建产出，服务端只负责按目录托管。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

/// 静态文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFileConfig {
    pub root_dir: PathBuf,
    pub index_file: String,
}

impl Default for StaticFileConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("static"),
            index_file: "index.html".to_string(),
        }
    }
}

/// 创建静态文件服务，未匹配的路径返回首页
pub fn create_static_service(config: &StaticFileConfig) -> ServeDir<ServeFile> {
    if !config.root_dir.is_dir() {
        warn!("Static directory {} does not exist", config.root_dir.display());
    }

    let index = config.root_dir.join(&config.index_file);
    ServeDir::new(&config.root_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(index))
}
