//! Connect Client
//!
//! Thin client over the contact-center control-plane APIs. Authentication
//! material (a pre-authorized bearer token) and its refresh are owned by the
//! host session layer; this client only attaches it to requests.

use super::http::HttpClient;
use crate::config::Config;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use url::Url;

/// Main service client
#[derive(Clone)]
pub struct ConnectClient {
    pub http: HttpClient,
    token: String,
    region: String,
    endpoint_override: Option<Url>,
}

impl ConnectClient {
    /// Create a new client for a region
    pub fn new(region: &str, token: &str) -> Result<Self> {
        Self::build(region, token, None)
    }

    /// Create a client pinned to a single endpoint for every service
    /// (private endpoints, local test servers)
    pub fn with_endpoint(region: &str, token: &str, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint).context("Invalid endpoint override")?;
        Self::build(region, token, Some(url))
    }

    /// Create a client from the plugin configuration
    pub fn from_config(config: &Config, token: &str) -> Result<Self> {
        match &config.endpoint {
            Some(endpoint) => Self::with_endpoint(&config.region, token, endpoint),
            None => Self::new(&config.region, token),
        }
    }

    fn build(region: &str, token: &str, endpoint_override: Option<Url>) -> Result<Self> {
        let http = HttpClient::new()?;

        Ok(Self {
            http,
            token: token.to_string(),
            region: region.to_string(),
            endpoint_override,
        })
    }

    /// Build the URL for a service-relative path
    pub fn service_url(&self, service: &str, path: &str) -> String {
        match &self.endpoint_override {
            Some(base) => format!("{}{}", base.as_str().trim_end_matches('/'), path),
            None => format!("https://{}.{}.amazonaws.com{}", service, self.region, path),
        }
    }

    /// Make a GET request to a service API
    pub async fn get(&self, service: &str, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.service_url(service, path);
        self.http.get(&url, &self.token, query).await
    }

    /// Make a POST request to a service API
    pub async fn post(&self, service: &str, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.service_url(service, path);
        self.http.post(&url, &self.token, body).await
    }

    // =========================================================================
    // Instance attribute API
    // =========================================================================

    /// Describe one attribute of an instance
    pub async fn describe_instance_attribute(
        &self,
        instance_id: &str,
        attribute_type: &str,
    ) -> Result<Value> {
        let path = format!("/instance/{}/attribute/{}", instance_id, attribute_type);
        self.get("connect", &path, &[]).await
    }

    /// Set one attribute of an instance
    pub async fn update_instance_attribute(
        &self,
        instance_id: &str,
        attribute_type: &str,
        value: &str,
    ) -> Result<()> {
        let path = format!("/instance/{}/attribute/{}", instance_id, attribute_type);
        self.post("connect", &path, Some(&json!({ "Value": value })))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Campaign API
    // =========================================================================

    /// Get the instance configuration backing a campaign
    pub async fn get_connect_instance_config(&self, connect_instance_id: &str) -> Result<Value> {
        let path = format!("/connect-instance/{}/config", connect_instance_id);
        let response = self.get("connect-campaigns", &path, &[]).await?;

        response
            .get("connectInstanceConfig")
            .cloned()
            .context("Response missing connectInstanceConfig")
    }
}
