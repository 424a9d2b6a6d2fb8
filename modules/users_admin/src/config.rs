use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the users_admin module (`modules.users_admin` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersAdminConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Number of demo users seeded into the in-memory store.
    #[serde(default = "default_seed_users")]
    pub seed_users: usize,
    /// Delay responses like a remote backend would (500ms list, 300ms others).
    #[serde(default)]
    pub simulate_latency: bool,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_list_stale_ms")]
    pub list_stale_ms: u64,
    #[serde(default = "default_stats_stale_ms")]
    pub stats_stale_ms: u64,
}

impl Default for UsersAdminConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            seed_users: default_seed_users(),
            simulate_latency: false,
            search_debounce_ms: default_search_debounce_ms(),
            list_stale_ms: default_list_stale_ms(),
            stats_stale_ms: default_stats_stale_ms(),
        }
    }
}

impl UsersAdminConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn list_stale_time(&self) -> Duration {
        Duration::from_millis(self.list_stale_ms)
    }

    pub fn stats_stale_time(&self) -> Duration {
        Duration::from_millis(self.stats_stale_ms)
    }
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

fn default_seed_users() -> usize {
    100
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_list_stale_ms() -> u64 {
    5_000
}

fn default_stats_stale_ms() -> u64 {
    30_000
}
