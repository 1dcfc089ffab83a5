//! Resource Fetcher
//!
//! Drives the list -> resolve -> augment pipeline over the definition
//! registry. Top-level kinds are a plain paginated list; parent-scoped kinds
//! are enumerated per instance, grouped by owner from their locators, and
//! enriched through the bounded augmentation executor.

use super::augment::augment;
use super::locator::resolve;
use super::registry::{get_resource, ResourceDef};
use crate::config::Config;
use crate::connect::client::ConnectClient;
use anyhow::{Context, Result};
use serde_json::Value;

/// Result of paginated fetch
pub struct PaginatedResult {
    pub items: Vec<Value>,
    pub next_token: Option<String>,
}

/// Fetch all resources of a kind (auto-paginate, augment when parent-scoped)
pub async fn fetch_resources(
    resource_key: &str,
    client: &ConnectClient,
    config: &Config,
) -> Result<Vec<Value>> {
    let Some(def) = get_resource(resource_key) else {
        return Err(anyhow::anyhow!("Unknown resource: {}", resource_key));
    };

    let Some(parent_key) = def.parent.as_deref() else {
        return fetch_summaries(def, client, config, None).await;
    };

    let parent_def = get_resource(parent_key)
        .with_context(|| format!("Unknown parent resource: {}", parent_key))?;
    let parents = fetch_summaries(parent_def, client, config, None).await?;

    let mut summaries = Vec::new();
    for parent in &parents {
        let parent_id = parent
            .get(&parent_def.id_field)
            .and_then(Value::as_str)
            .with_context(|| format!("parent record missing '{}'", parent_def.id_field))?;
        summaries.extend(fetch_summaries(def, client, config, Some(parent_id)).await?);
    }

    let grouping = resolve(&summaries, &def.locator_field)?;

    let records = augment(
        grouping,
        |parent_id: String, child_id: String| async move {
            describe_child(def, client, &parent_id, &child_id).await
        },
        config.max_workers,
    )
    .await;

    Ok(records)
}

/// Fetch all summary pages for one kind, optionally scoped to one instance
pub async fn fetch_summaries(
    def: &ResourceDef,
    client: &ConnectClient,
    config: &Config,
    parent_id: Option<&str>,
) -> Result<Vec<Value>> {
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let result =
            fetch_summaries_paginated(def, client, config, parent_id, page_token.as_deref())
                .await?;
        all_items.extend(result.items);

        match result.next_token {
            // An endpoint echoing the same token back would loop forever.
            Some(token) if page_token.as_deref() != Some(token.as_str()) => {
                page_token = Some(token);
            }
            _ => break,
        }
    }

    Ok(all_items)
}

/// Fetch one page of summaries
pub async fn fetch_summaries_paginated(
    def: &ResourceDef,
    client: &ConnectClient,
    config: &Config,
    parent_id: Option<&str>,
    page_token: Option<&str>,
) -> Result<PaginatedResult> {
    let mut params: Vec<(&str, &str)> = Vec::new();
    if let Some(parent_id) = parent_id {
        params.push(("InstanceId", parent_id));
    }
    let path = render_path(&def.list_path, &params);

    let max_results = config.max_results.map(|n| n.to_string());
    let mut query: Vec<(&str, &str)> = Vec::new();
    if let Some(ref max_results) = max_results {
        query.push(("maxResults", max_results));
    }
    if let Some(token) = page_token {
        query.push(("nextToken", token));
    }

    let response = client.get(&def.service, &path, &query).await?;

    let items = extract_items(&response, &def.response_path);
    let next_token = response
        .get("NextToken")
        .or_else(|| response.get("nextToken"))
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    Ok(PaginatedResult { items, next_token })
}

/// Describe one child of an instance, unwrapping the response envelope
async fn describe_child(
    def: &ResourceDef,
    client: &ConnectClient,
    parent_id: &str,
    child_id: &str,
) -> Result<Value> {
    let template = def
        .detail_path
        .as_deref()
        .with_context(|| format!("{} has no detail endpoint", def.display_name))?;
    let path = render_path(template, &[("InstanceId", parent_id), ("Id", child_id)]);

    let response = client.get(&def.service, &path, &[]).await?;

    match def.detail_envelope.as_deref() {
        Some(envelope) => response
            .get(envelope)
            .cloned()
            .with_context(|| format!("Response missing '{}' envelope", envelope)),
        None => Ok(response),
    }
}

/// Render a path template, substituting `{Name}` style placeholders
fn render_path(template: &str, params: &[(&str, &str)]) -> String {
    let mut path = template.to_string();
    for (key, value) in params {
        path = path.replace(&format!("{{{}}}", key), value);
    }
    path
}

/// Extract items from a response using a dot-notation path
fn extract_items(response: &Value, path: &str) -> Vec<Value> {
    if path.is_empty() {
        return response.as_array().cloned().unwrap_or_default();
    }

    let mut current = response;
    for part in path.split('.') {
        current = match current.get(part) {
            Some(v) => v,
            None => return vec![],
        };
    }

    current.as_array().cloned().unwrap_or_default()
}
