use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP host configuration (`modules.api_ingress` in the app config).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Overrides `server.host`/`server.port` when set.
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: None,
            cors_enabled: false,
            timeout_sec: default_timeout_sec(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl ApiIngressConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }
}

fn default_timeout_sec() -> u64 {
    30
}

fn default_body_limit() -> usize {
    16 * 1024 * 1024
}
