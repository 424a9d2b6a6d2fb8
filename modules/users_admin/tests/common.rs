#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;

use users_admin::{
    api::rest::register_routes,
    contract::{
        client::UsersAdminApi,
        error::UsersAdminError,
        model::{ListQuery, ListResult, User, UserId, UserPatch, UserStats},
    },
    domain::service::{Service, ServiceConfig},
    gateways::local::LocalUsersClient,
    infra::storage::{seed, InMemoryUsersRepository},
    view::{CacheConfig, QueryCache},
};

pub const SEED: usize = 100;

/// Domain service over a freshly seeded in-memory store
pub fn create_test_service(count: usize) -> Arc<Service> {
    let repo = Arc::new(InMemoryUsersRepository::seeded(count));
    Arc::new(Service::new(repo, ServiceConfig::default()))
}

pub fn create_test_router(count: usize) -> Router {
    register_routes(Router::new(), create_test_service(count))
}

pub fn create_test_client(count: usize) -> Arc<dyn UsersAdminApi> {
    Arc::new(LocalUsersClient::new(create_test_service(count)))
}

pub fn create_test_cache(api: Arc<dyn UsersAdminApi>) -> Arc<QueryCache> {
    Arc::new(QueryCache::new(api, CacheConfig::default()))
}

/// Users of the default seed matching `query`, in storage order.
pub fn expected_matches(query: &ListQuery) -> Vec<User> {
    seed::demo_users(SEED)
        .into_iter()
        .filter(|u| query.matches(u))
        .collect()
}

/// Gateway wrapper counting calls, with an optional artificial delay.
pub struct CountingApi {
    inner: Arc<dyn UsersAdminApi>,
    delay: Duration,
    pub list_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl CountingApi {
    pub fn new(inner: Arc<dyn UsersAdminApi>) -> Self {
        Self::with_delay(inner, Duration::ZERO)
    }

    pub fn with_delay(inner: Arc<dyn UsersAdminApi>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            list_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl UsersAdminApi for CountingApi {
    async fn list_users(&self, query: &ListQuery) -> Result<ListResult, UsersAdminError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.list_users(query).await
    }

    async fn user_stats(&self) -> Result<UserStats, UsersAdminError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.user_stats().await
    }

    async fn update_user(&self, id: &UserId, patch: UserPatch) -> Result<User, UsersAdminError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.update_user(id, patch).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UsersAdminError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.inner.delete_user(id).await
    }
}

/// Gateway whose every call fails with the given error.
pub struct FailingApi(pub UsersAdminError);

#[async_trait]
impl UsersAdminApi for FailingApi {
    async fn list_users(&self, _query: &ListQuery) -> Result<ListResult, UsersAdminError> {
        Err(self.0.clone())
    }

    async fn user_stats(&self) -> Result<UserStats, UsersAdminError> {
        Err(self.0.clone())
    }

    async fn update_user(&self, _id: &UserId, _patch: UserPatch) -> Result<User, UsersAdminError> {
        Err(self.0.clone())
    }

    async fn delete_user(&self, _id: &UserId) -> Result<(), UsersAdminError> {
        Err(self.0.clone())
    }
}
