//! Service API interaction module
//!
//! Provides the HTTP plumbing and the typed client used by the resource
//! fetcher. Request signing and credential refresh live in the host session
//! layer, not here.

pub mod client;
pub mod http;

pub use client::ConnectClient;
