use axum::{
    routing::{get, patch},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount the users REST surface on `router`.
///
/// | method | path                | handler                |
/// |--------|---------------------|------------------------|
/// | GET    | `/api/users`        | [`handlers::list_users`]  |
/// | GET    | `/api/users/stats`  | [`handlers::user_stats`]  |
/// | PATCH  | `/api/users/{id}`   | [`handlers::update_user`] |
/// | DELETE | `/api/users/{id}`   | [`handlers::delete_user`] |
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let users = Router::new()
        .route("/api/users", get(handlers::list_users))
        // static segment wins over `{id}` in the matcher
        .route("/api/users/stats", get(handlers::user_stats))
        .route(
            "/api/users/{id}",
            patch(handlers::update_user).delete(handlers::delete_user),
        )
        .layer(Extension(service));

    router.merge(users)
}
