//! Web服务器

use axum::{
    routing::{get, post},
    Router,
};
use neurorad_core::Result;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    count_reports, count_reports_for, create_feature, delete_feature, get_features_by_kind,
    get_report_features, get_values, health, list_reports, list_reports_for, update_feature, AppState,
};
use crate::static_files::{create_static_service, StaticFileConfig};

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState, static_files: &StaticFileConfig) -> Self {
        let app = create_app(state, static_files);
        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

/// 构建完整路由
pub fn create_app(state: AppState, static_files: &StaticFileConfig) -> Router {
    api_routes()
        .with_state(state)
        // 静态文件服务
        .fallback_service(create_static_service(static_files))
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// API 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/values", get(get_values))
        .route("/radiology/rows", get(count_reports))
        .route("/radiology/rows/for/:pid", get(count_reports_for))
        .route("/radiology/records/:limit/:offset", get(list_reports))
        .route("/radiology/records/for/:pid/:limit/:offset", get(list_reports_for))
        .route("/features/for/:report_uid", get(get_report_features))
        .route("/features/:kind/for/:report_uid", get(get_features_by_kind))
        .route("/features/:kind", post(create_feature).put(update_feature))
        .route("/features/:kind/:id", axum::routing::delete(delete_feature))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
