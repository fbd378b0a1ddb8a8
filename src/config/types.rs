use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Domain service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the school API. The bundled mock services only record it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Simulated latency of every mock service call (default: 300).
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

/// Synchronization store behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Drop responses overtaken by a newer request (default: true).
    #[serde(default = "default_discard_stale")]
    pub discard_stale_responses: bool,
    /// Max retry attempts for transient read failures (default: 0).
    #[serde(default)]
    pub max_retries: u32,
    /// Base backoff in milliseconds for retry (default: 100).
    #[serde(default = "default_retry_backoff_base_ms")]
    pub retry_backoff_base_ms: u64,
    /// Per-request timeout in seconds, 0 disables it (default: 30).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Signed-in user the dashboards are rendered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub role: Role,
    /// Entity id of the signed-in user (default: "201").
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
    Teacher,
    Student,
}

impl Role {
    /// Whether this role may approve or reject leave requests.
    pub fn can_review_leave(self) -> bool {
        matches!(self, Role::Admin)
    }
}

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

fn default_latency_ms() -> u64 {
    300
}

fn default_discard_stale() -> bool {
    true
}

fn default_retry_backoff_base_ms() -> u64 {
    100
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_id() -> String {
    "201".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            latency_ms: default_latency_ms(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            discard_stale_responses: default_discard_stale(),
            max_retries: 0,
            retry_backoff_base_ms: default_retry_backoff_base_ms(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: Role::default(),
            user_id: default_user_id(),
        }
    }
}
