//! Service calls run inside their instrumented spans and keep their results.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_test::traced_test;

use users_admin::contract::model::{ListQuery, ListResult, User, UserId, UserPatch};
use users_admin::domain::error::DomainError;
use users_admin::domain::repo::UsersRepository;
use users_admin::domain::service::{Service, ServiceConfig};
use users_admin::infra::storage::InMemoryUsersRepository;

// Repository whose storage is always unavailable
struct BrokenRepository;

#[async_trait::async_trait]
impl UsersRepository for BrokenRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>> {
        anyhow::bail!("connection reset")
    }

    async fn list_page(&self, _query: &ListQuery) -> Result<ListResult> {
        anyhow::bail!("connection reset")
    }

    async fn all(&self) -> Result<Vec<User>> {
        anyhow::bail!("connection reset")
    }

    async fn update(&self, _u: User) -> Result<bool> {
        anyhow::bail!("connection reset")
    }

    async fn delete(&self, _id: &UserId) -> Result<bool> {
        anyhow::bail!("connection reset")
    }
}

fn seeded_service(config: ServiceConfig) -> Service {
    Service::new(Arc::new(InMemoryUsersRepository::seeded(20)), config)
}

#[traced_test]
#[tokio::test]
async fn list_users_emits_spans() {
    let service = seeded_service(ServiceConfig::default());

    let result = service.list_users(ListQuery::new(5)).await;

    let page = result.expect("list should succeed");
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_count, 20);
}

#[traced_test]
#[tokio::test]
async fn update_user_emits_spans() {
    let service = seeded_service(ServiceConfig::default());
    let id = UserId::from("user-3");

    let patch = UserPatch {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(&id, patch).await.expect("update");

    assert_eq!(updated.name, "Renamed");
    assert_eq!(service.get_user(&id).await.expect("get").name, "Renamed");
}

#[traced_test]
#[tokio::test]
async fn delete_user_emits_spans() {
    let service = seeded_service(ServiceConfig::default());
    let id = UserId::from("user-7");

    service.delete_user(&id).await.expect("delete");

    let err = service.get_user(&id).await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound { .. }));
}

#[traced_test]
#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
    let service = Service::new(Arc::new(BrokenRepository), ServiceConfig::default());

    let err = service.user_stats().await.unwrap_err();
    match err {
        DomainError::Storage { message } => assert!(message.contains("connection reset")),
        other => panic!("expected storage error, got {other:?}"),
    }

    let err = service.delete_user(&UserId::from("user-1")).await.unwrap_err();
    assert!(matches!(err, DomainError::Storage { .. }));
}

#[tokio::test(start_paused = true)]
async fn simulated_latency_delays_responses() {
    let service = seeded_service(ServiceConfig {
        simulate_latency: true,
        ..Default::default()
    });

    let started = tokio::time::Instant::now();
    service.list_users(ListQuery::default()).await.expect("list");
    assert!(started.elapsed() >= Duration::from_millis(500));

    let started = tokio::time::Instant::now();
    service.user_stats().await.expect("stats");
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_millis(500));
}
