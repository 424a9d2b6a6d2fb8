use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, StatusCode},
    routing::post,
    Router,
};
use tower::util::ServiceExt;

use api_ingress::{build_router, ApiIngressConfig};

async fn accept_bytes(body: Bytes) -> String {
    body.len().to_string()
}

fn app(config: ApiIngressConfig) -> Router {
    build_router(Router::new().route("/upload", post(accept_bytes)), &config)
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ApiIngressConfig {
        body_limit_bytes: 8,
        ..Default::default()
    };

    let response = app(config)
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/upload")
                .header(header::CONTENT_LENGTH, "32")
                .body(Body::from(vec![b'x'; 32]))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_headers_only_when_enabled() {
    let preflight = || {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/upload")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let enabled = ApiIngressConfig {
        cors_enabled: true,
        ..Default::default()
    };
    let response = app(enabled).oneshot(preflight()).await.unwrap();
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let response = app(ApiIngressConfig::default())
        .oneshot(preflight())
        .await
        .unwrap();
    assert!(!response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[test]
fn config_defaults_fill_missing_fields() {
    let cfg: ApiIngressConfig =
        serde_json::from_value(serde_json::json!({ "cors_enabled": true })).unwrap();
    assert!(cfg.cors_enabled);
    assert_eq!(cfg.timeout_sec, 30);
    assert_eq!(cfg.body_limit_bytes, 16 * 1024 * 1024);
    assert!(cfg.bind_addr.is_none());

    let bad: Result<ApiIngressConfig, _> =
        serde_json::from_value(serde_json::json!({ "enable_docs": true }));
    assert!(bad.is_err());
}
