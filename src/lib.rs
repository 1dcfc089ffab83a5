//! Contact-center resource definitions and augmentation pipeline for a cloud
//! governance engine.
//!
//! The crate declares how to enumerate and describe a contact-center instance
//! and its child entities (users, routing profiles, queues, quick connects,
//! contact flows, agent statuses, hours of operation, phone numbers), plus the
//! sibling campaign resource. Child kinds are listed in one flat stream,
//! mapped back to their owning instance through their composite locators, and
//! enriched into fully described records by a bounded concurrent fan-out; one
//! instance's failure never aborts the batch.
//!
//! Policy evaluation, tag diffing, and session management live in the host
//! engine; this crate hands it plain `serde_json::Value` records.

pub mod config;
pub mod connect;
pub mod resource;

pub use config::Config;
pub use connect::ConnectClient;
pub use resource::{
    augment, fetch_resources, normalize_tags, parse_locator, resolve, ParentChildGrouping,
};
