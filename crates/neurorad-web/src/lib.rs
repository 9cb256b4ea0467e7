//! # Neurorad Web
//!
//! 标注服务的 HTTP 接口：路由、处理器、响应封装与静态资源。

pub mod error;
pub mod handlers;
pub mod server;
pub mod static_files;

pub use error::ApiError;
pub use handlers::{AppState, SaveResult};
pub use server::WebServer;
pub use static_files::StaticFileConfig;
