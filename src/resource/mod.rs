//! Resource abstraction layer
//!
//! This module provides a data-driven approach to the contact-center resource
//! family. Resource definitions are loaded from JSON at compile time, so new
//! kinds are added without code changes.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches resource definitions from embedded JSON
//! - [`locator`] - Parses composite locators and groups children by owner
//! - [`augment`] - Bounded fan-out executor enriching summaries into details
//! - [`fetcher`] - Paginated list calls and pipeline orchestration
//! - [`attributes`] - On-demand attribute and campaign-config annotation
//!
//! # Example
//!
//! ```ignore
//! use connect_resources::{Config, ConnectClient};
//! use connect_resources::resource::fetch_resources;
//!
//! async fn list_users(client: &ConnectClient) -> anyhow::Result<Vec<serde_json::Value>> {
//!     fetch_resources("connect-user", client, &Config::default()).await
//! }
//! ```

pub mod attributes;
mod augment;
mod fetcher;
mod locator;
mod registry;

pub use augment::{augment, normalize_tags};
pub use fetcher::{fetch_resources, fetch_summaries, fetch_summaries_paginated, PaginatedResult};
pub use locator::{parse_locator, resolve, ParentChildGrouping};
pub use registry::{all_resource_keys, get_registry, get_resource, ResourceConfig, ResourceDef};
