//! JSON 响应封装与错误状态码映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::AppError;

/// 错误对应的 HTTP 状态码
///
/// 输入、提取、内容不足 → 400；不存在 → 404；超出大小 → 413；其余 → 500
pub fn status_code(err: &AppError) -> StatusCode {
    match err {
        AppError::Input(_) | AppError::Extraction { .. } | AppError::InsufficientContent { .. } => {
            StatusCode::BAD_REQUEST
        }
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::Remote(_) | AppError::Config(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 失败响应体
pub fn error_body(message: impl Into<String>) -> Value {
    json!({
        "success": false,
        "error": message.into(),
    })
}

/// 成功响应
pub fn success(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if self.is_client_error() {
            warn!("⚠️ 请求被拒绝 ({}): {}", status.as_u16(), self);
        } else {
            error!("❌ 请求失败 ({}): {}", status.as_u16(), self);
        }
        (status, Json(error_body(self.to_string()))).into_response()
    }
}
