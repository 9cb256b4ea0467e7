//! HTTP 错误映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use neurorad_core::NeuroradError;
use serde_json::json;
use tracing::error;

/// 处理器错误，包装核心错误并负责转换为 HTTP 响应
#[derive(Debug)]
pub struct ApiError(pub NeuroradError);

impl From<NeuroradError> for ApiError {
    fn from(e: NeuroradError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            NeuroradError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            NeuroradError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            NeuroradError::ResourceExhausted(msg) => {
                error!("Store unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "service temporarily unavailable".to_string())
            }
            other => {
                // 存储层细节只写日志，不返回给客户端
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": true,
            "message": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
