//! Resource Locators
//!
//! Child resources carry a composite locator string that embeds both the
//! owning instance id and the child's own id:
//!
//! `<namespace>:<partition>:<account>:<instance-id>/<kind>/<child-id>`
//!
//! List calls return children from every instance in one flat stream, so the
//! locator is the only way to map a child back to its owner. This module
//! parses locators and groups child summaries by owning instance.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Mapping from owning instance id to the child ids it owns, in input order.
pub type ParentChildGrouping = HashMap<String, Vec<String>>;

/// Split a locator into (parent id, child id).
///
/// The colon-delimited prefix (namespace, partition, account) is discarded;
/// the remaining path splits into at most four segments, of which the first
/// is the parent id and the third is the child id. Anything past the child id
/// is ignored. A path with fewer than three segments is a caller error.
pub fn parse_locator(locator: &str) -> Result<(String, String)> {
    let path = match locator.rsplit_once(':') {
        Some((_, path)) => path,
        None => locator,
    };

    let segments: Vec<&str> = path.splitn(4, '/').collect();
    if segments.len() < 3 {
        bail!("malformed resource locator: {}", locator);
    }

    Ok((segments[0].to_string(), segments[2].to_string()))
}

/// Group child summaries by owning instance.
///
/// `locator_field` names the summary field holding the locator; it varies by
/// resource kind. A summary without that field, or with a locator that does
/// not parse, fails the whole call - partial groupings are never returned.
pub fn resolve(summaries: &[Value], locator_field: &str) -> Result<ParentChildGrouping> {
    let mut grouping = ParentChildGrouping::new();

    for summary in summaries {
        let locator = summary
            .get(locator_field)
            .and_then(Value::as_str)
            .with_context(|| format!("summary record missing locator field '{}'", locator_field))?;

        let (parent, child) = parse_locator(locator)?;
        grouping.entry(parent).or_default().push(child);
    }

    Ok(grouping)
}
