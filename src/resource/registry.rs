//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the contact-center resource definitions from embedded
//! JSON and provides lookup functions for the rest of the crate. The table is
//! built once at first access; new resource kinds are added by editing the
//! JSON, not by writing code.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/connect.json")];

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// Service hostname prefix (e.g. "connect", "connect-campaigns")
    pub service: String,
    /// List endpoint; `{InstanceId}` is substituted for parent-scoped kinds
    pub list_path: String,
    /// Dot-path to the summary array inside the list response
    pub response_path: String,
    pub id_field: String,
    pub name_field: String,
    /// Summary field holding the composite resource locator
    pub locator_field: String,
    /// Registry key of the owning resource, for parent-scoped kinds
    #[serde(default)]
    pub parent: Option<String>,
    /// Describe endpoint; `{InstanceId}` and `{Id}` are substituted
    #[serde(default)]
    pub detail_path: Option<String>,
    /// Envelope key wrapping the record inside the describe response
    #[serde(default)]
    pub detail_envelope: Option<String>,
}

impl ResourceDef {
    /// Whether this kind is enumerated and described per owning instance
    pub fn is_parent_scoped(&self) -> bool {
        self.parent.is_some()
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            resources: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get all resource keys
pub fn all_resource_keys() -> Vec<&'static str> {
    get_registry()
        .resources
        .keys()
        .map(|s| s.as_str())
        .collect()
}
