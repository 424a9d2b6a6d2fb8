use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors produced by the ingress itself, not by module handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No route for {method} {path}")]
    RouteNotFound {
        method: String,
        path: String,
        request_id: String,
    },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    request_id: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, request_id) = match &self {
            AppError::RouteNotFound { request_id, .. } => (StatusCode::NOT_FOUND, request_id),
        };

        tracing::warn!(
            request_id = %request_id,
            error = %self,
            status = status.as_u16(),
            "request failed"
        );

        let body = ErrorBody {
            error: self.to_string(),
            request_id,
        };
        (status, Json(body)).into_response()
    }
}
