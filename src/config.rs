//! Configuration Management
//!
//! Plugin configuration, deserialized from whatever config surface the host
//! engine exposes. Nothing here is persisted by the plugin itself.

use serde::{Deserialize, Serialize};

/// Default bound on concurrently augmented instances
pub const DEFAULT_MAX_WORKERS: usize = 2;

/// Plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Worker-pool bound for per-instance augmentation tasks
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Page size for list calls (service default when unset)
    #[serde(default)]
    pub max_results: Option<u32>,
    /// Service region
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint override for every service (private endpoints, tests)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            max_results: None,
            region: default_region(),
            endpoint: None,
        }
    }
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_region() -> String {
    "us-east-1".to_string()
}
