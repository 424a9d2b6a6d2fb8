//! HTTP gateway against a live router and against scripted failures.

mod common;

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;

use common::{create_test_router, SEED};
use users_admin::{
    contract::{
        client::UsersAdminApi,
        error::UsersAdminError,
        model::{ListQuery, Role, StatusFilter, UserId, UserPatch, UserStatus},
    },
    gateways::http::HttpUsersClient,
};

async fn spawn_server() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = create_test_router(SEED);
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn round_trips_against_live_router() -> Result<()> {
    let base = spawn_server().await?;
    let client = HttpUsersClient::new(&base)?;

    let page = client
        .list_users(&ListQuery::new(5).with_status(StatusFilter::Inactive))
        .await?;
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_count, 25);
    assert!(page.items.iter().all(|u| u.status == UserStatus::Inactive));

    let stats = client.user_stats().await?;
    assert_eq!(stats.active_users + stats.inactive_users, stats.total_users);

    let updated = client
        .update_user(
            &UserId::from("user-5"),
            UserPatch {
                role: Some(Role::Viewer),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.role, Role::Viewer);

    client.delete_user(&UserId::from("user-5")).await?;
    let stats = client.user_stats().await?;
    assert_eq!(stats.total_users, SEED as u64 - 1);
    Ok(())
}

#[tokio::test]
async fn not_found_and_validation_are_typed() -> Result<()> {
    let base = spawn_server().await?;
    let client = HttpUsersClient::new(&base)?;

    let err = client
        .delete_user(&UserId::from("user-404"))
        .await
        .unwrap_err();
    assert_eq!(err, UsersAdminError::not_found(UserId::from("user-404")));

    let err = client
        .update_user(
            &UserId::from("user-1"),
            UserPatch {
                email: Some("broken".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, UsersAdminError::Validation { .. }));
    Ok(())
}

#[tokio::test]
async fn list_sends_only_restricting_params() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/users")
            .query_param("page", "2")
            .query_param("pageSize", "10")
            .query_param("status", "active");
        then.status(200)
            .json_body(json!({ "data": { "totalCount": 0, "users": [] } }));
    });

    let client = HttpUsersClient::new(&server.base_url()).unwrap();
    let page = client
        .list_users(&ListQuery::default().with_page(2).with_status(StatusFilter::Active))
        .await
        .unwrap();

    mock.assert();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn server_error_surfaces_status_and_message() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/stats");
        then.status(500).json_body(json!({ "error": "database on fire" }));
    });

    let client = HttpUsersClient::new(&server.base_url()).unwrap();
    let err = client.user_stats().await.unwrap_err();

    assert_eq!(err, UsersAdminError::server(500, "database on fire"));
}

#[tokio::test]
async fn list_404_is_a_server_error_not_a_missing_user() {
    let server = MockServer::start();
    let _mock = server.mock(|when, then| {
        when.method(GET).path("/api/users");
        then.status(404);
    });

    let client = HttpUsersClient::new(&server.base_url()).unwrap();
    let err = client.list_users(&ListQuery::default()).await.unwrap_err();

    assert!(matches!(err, UsersAdminError::Server { status: 404, .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() -> Result<()> {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpUsersClient::new(&format!("http://{addr}"))?;
    let err = client.list_users(&ListQuery::default()).await.unwrap_err();

    assert!(matches!(err, UsersAdminError::Network { .. }));
    Ok(())
}
