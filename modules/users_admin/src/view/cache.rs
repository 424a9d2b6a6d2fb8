//! Client-side query/mutation cache over a [`UsersAdminApi`].
//!
//! Reads are keyed by their full parameters. Each key tracks its last value,
//! last error, freshness and a generation counter; at most one fetch per key
//! is in flight and concurrent readers share it. Mutations invalidate whole
//! namespaces, which marks entries stale and bumps their generation so that
//! results of fetches issued before the invalidation are never written back.
//!
//! Locks are `parking_lot` mutexes and are never held across an await.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::UsersAdminConfig;
use crate::contract::{
    client::UsersAdminApi,
    error::UsersAdminError,
    model::{ListQuery, ListResult, User, UserId, UserPatch, UserStats},
};

type Fetch<T> = Shared<BoxFuture<'static, Result<T, UsersAdminError>>>;

/// Invalidation scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Every list page, whatever its filters.
    Users,
    UserStats,
}

/// Point-in-time view of one cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySnapshot<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: Option<UsersAdminError>,
    pub is_stale: bool,
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: false,
            error: None,
            is_stale: true,
        }
    }
}

struct Slot<T> {
    value: Option<T>,
    fetched_at: Option<Instant>,
    error: Option<UsersAdminError>,
    invalidated: bool,
    generation: u64,
    in_flight: Option<(u64, Fetch<T>)>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
            error: None,
            invalidated: false,
            generation: 0,
            in_flight: None,
        }
    }
}

impl<T: Clone> Slot<T> {
    fn is_stale(&self, stale_time: Duration, now: Instant) -> bool {
        match (self.value.as_ref(), self.fetched_at) {
            (Some(_), Some(at)) => self.invalidated || now.duration_since(at) >= stale_time,
            _ => true,
        }
    }

    fn snapshot(&self, stale_time: Duration, now: Instant) -> QuerySnapshot<T> {
        QuerySnapshot {
            data: self.value.clone(),
            is_loading: self.in_flight.is_some(),
            is_error: self.error.is_some(),
            error: self.error.clone(),
            is_stale: self.is_stale(stale_time, now),
        }
    }
}

/// One namespace: a keyed set of slots sharing a staleness window.
struct Store<K, T> {
    slots: Mutex<HashMap<K, Slot<T>>>,
    stale_time: Duration,
}

impl<K, T> Store<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + Send + Sync + 'static,
{
    fn new(stale_time: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            stale_time,
        }
    }

    async fn get_or_fetch<F>(&self, key: &K, fetch: F) -> Result<T, UsersAdminError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<T, UsersAdminError>>,
    {
        let (pending, generation) = {
            let mut slots = self.slots.lock();
            let slot = slots.entry(key.clone()).or_default();

            if !slot.is_stale(self.stale_time, Instant::now()) {
                if let Some(value) = &slot.value {
                    debug!("cache hit");
                    return Ok(value.clone());
                }
            }

            let joinable = slot
                .in_flight
                .as_ref()
                .filter(|(generation, _)| *generation == slot.generation)
                .map(|(generation, pending)| (pending.clone(), *generation));

            match joinable {
                Some(joined) => {
                    debug!("joining in-flight fetch");
                    joined
                }
                None => {
                    debug!(generation = slot.generation, "cache miss, fetching");
                    let pending = fetch().shared();
                    slot.in_flight = Some((slot.generation, pending.clone()));
                    (pending, slot.generation)
                }
            }
        };

        let result = pending.await;

        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get_mut(key) {
            if slot.generation != generation {
                debug!(
                    issued = generation,
                    current = slot.generation,
                    "discarding result of an outdated fetch"
                );
                return result;
            }
            slot.in_flight = None;
            match &result {
                Ok(value) => {
                    slot.value = Some(value.clone());
                    slot.fetched_at = Some(Instant::now());
                    slot.invalidated = false;
                    slot.error = None;
                }
                Err(e) => slot.error = Some(e.clone()),
            }
        }
        result
    }

    fn snapshot(&self, key: &K) -> QuerySnapshot<T> {
        let now = Instant::now();
        self.slots
            .lock()
            .get(key)
            .map(|slot| slot.snapshot(self.stale_time, now))
            .unwrap_or_default()
    }

    fn invalidate_all(&self) -> usize {
        let mut slots = self.slots.lock();
        for slot in slots.values_mut() {
            slot.invalidated = true;
            slot.generation += 1;
            slot.in_flight = None;
        }
        slots.len()
    }
}

/// Staleness windows per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub list_stale_time: Duration,
    pub stats_stale_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::from(&UsersAdminConfig::default())
    }
}

impl From<&UsersAdminConfig> for CacheConfig {
    fn from(cfg: &UsersAdminConfig) -> Self {
        Self {
            list_stale_time: cfg.list_stale_time(),
            stats_stale_time: cfg.stats_stale_time(),
        }
    }
}

pub struct QueryCache {
    api: Arc<dyn UsersAdminApi>,
    lists: Store<ListQuery, ListResult>,
    stats: Store<(), UserStats>,
}

impl QueryCache {
    pub fn new(api: Arc<dyn UsersAdminApi>, config: CacheConfig) -> Self {
        Self {
            api,
            lists: Store::new(config.list_stale_time),
            stats: Store::new(config.stats_stale_time),
        }
    }

    #[instrument(
        name = "users_admin.cache.list",
        skip(self, query),
        fields(page = query.page, search = %query.search_text, status = %query.status_filter)
    )]
    pub async fn list(&self, query: &ListQuery) -> Result<ListResult, UsersAdminError> {
        let api = Arc::clone(&self.api);
        let owned = query.clone();
        self.lists
            .get_or_fetch(query, move || {
                async move { api.list_users(&owned).await }.boxed()
            })
            .await
    }

    #[instrument(name = "users_admin.cache.stats", skip(self))]
    pub async fn stats(&self) -> Result<UserStats, UsersAdminError> {
        let api = Arc::clone(&self.api);
        self.stats
            .get_or_fetch(&(), move || async move { api.user_stats().await }.boxed())
            .await
    }

    pub fn snapshot_list(&self, query: &ListQuery) -> QuerySnapshot<ListResult> {
        self.lists.snapshot(query)
    }

    pub fn snapshot_stats(&self) -> QuerySnapshot<UserStats> {
        self.stats.snapshot(&())
    }

    pub fn invalidate(&self, namespace: Namespace) {
        let touched = match namespace {
            Namespace::Users => self.lists.invalidate_all(),
            Namespace::UserStats => self.stats.invalidate_all(),
        };
        debug!(?namespace, entries = touched, "invalidated cache namespace");
    }

    /// Update through the gateway, then invalidate every list page.
    #[instrument(name = "users_admin.cache.update_user", skip(self, patch), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        patch: UserPatch,
    ) -> Result<User, UsersAdminError> {
        let user = self.api.update_user(id, patch).await?;
        self.invalidate(Namespace::Users);
        Ok(user)
    }

    /// Delete through the gateway, then invalidate list pages and stats.
    #[instrument(name = "users_admin.cache.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<(), UsersAdminError> {
        self.api.delete_user(id).await?;
        self.invalidate(Namespace::Users);
        self.invalidate(Namespace::UserStats);
        Ok(())
    }
}
