use axum::{
    extract::Extension,
    http::{Method, Uri},
    response::Json,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::request_id::XRequestId;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for paths no module registered.
pub async fn not_found(
    method: Method,
    uri: Uri,
    Extension(XRequestId(request_id)): Extension<XRequestId>,
) -> AppError {
    AppError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
        request_id,
    }
}
