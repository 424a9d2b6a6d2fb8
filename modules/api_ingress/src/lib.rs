//! HTTP host for the users admin API: router assembly with the shared
//! middleware stack, binding and graceful serving.

use anyhow::{Context, Result};
use axum::{middleware::from_fn, routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod error;
pub mod request_id;
pub mod shutdown;
mod web;

pub use config::ApiIngressConfig;
pub use shutdown::{shutdown_token, wait_for_shutdown};

/// Wrap module routes with `/health`, the fallback and the middleware stack.
pub fn build_router(routes: Router, config: &ApiIngressConfig) -> Router {
    tracing::debug!("Building router");
    let mut router = Router::new()
        .route("/health", get(web::health_check))
        .merge(routes)
        .fallback(web::not_found);

    // Layers added later wrap the earlier ones.
    let x_request_id = request_id::header();

    // 1. Echo x-request-id back on the response
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

    // 2. Generate x-request-id when missing
    router = router.layer(SetRequestIdLayer::new(
        x_request_id.clone(),
        request_id::MakeReqId,
    ));

    // 3. Put request_id into extensions and span
    router = router.layer(from_fn(request_id::push_req_id_to_extensions));

    // 4. Trace with request_id/status/latency
    router = router.layer(request_id::create_trace_layer());

    // 5. Handler timeout
    router = router.layer(TimeoutLayer::new(config.timeout()));

    // 6. CORS layer (if enabled)
    if config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    // 7. Body limit
    router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

    router
}

/// Bind `bind_addr`, failing with context if it does not parse or is taken.
pub async fn bind(bind_addr: &str) -> Result<TcpListener> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address '{bind_addr}'"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);
    Ok(listener)
}

/// Serve until `cancel` fires, then drain in-flight requests.
pub async fn serve(listener: TcpListener, router: Router, cancel: CancellationToken) -> Result<()> {
    let shutdown = async move {
        cancel.cancelled().await;
        tracing::info!("HTTP server shutting down gracefully (cancellation)");
    };

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}
