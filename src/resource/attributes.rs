//! Instance attributes and campaign instance config
//!
//! Companion lookups for the host engine's value filters and actions: they
//! fetch per-resource detail on demand and cache it on the record under an
//! annotation key, so repeated filter passes do not re-fetch.

use crate::connect::client::ConnectClient;
use anyhow::{Context, Result};
use serde_json::Value;

/// Annotation key for a fetched instance attribute
pub const INSTANCE_ATTRIBUTE_KEY: &str = "gov:InstanceAttribute";

/// Annotation key for a campaign's instance configuration
pub const INSTANCE_CONFIG_KEY: &str = "gov:InstanceConfig";

/// Attribute types an instance exposes
pub const ATTRIBUTE_TYPES: &[&str] = &[
    "INBOUND_CALLS",
    "OUTBOUND_CALLS",
    "CONTACTFLOW_LOGS",
    "CONTACT_LENS",
    "AUTO_RESOLVE_BEST_VOICES",
    "USE_CUSTOM_TTS_VOICES",
    "EARLY_MEDIA",
    "MULTI_PARTY_CONFERENCE",
    "HIGH_VOLUME_OUTBOUND",
    "ENHANCED_CONTACT_MONITORING",
];

/// Annotate each instance record with one attribute, fetched on demand.
/// Records already carrying the annotation are left alone.
pub async fn annotate_instance_attribute(
    client: &ConnectClient,
    resources: &mut [Value],
    attribute_type: &str,
) -> Result<()> {
    let attribute_type = attribute_type.to_uppercase();

    for resource in resources.iter_mut() {
        if resource.get(INSTANCE_ATTRIBUTE_KEY).is_some() {
            continue;
        }

        let instance_id = resource
            .get("Id")
            .and_then(Value::as_str)
            .context("instance record missing 'Id'")?;
        let attribute = client
            .describe_instance_attribute(instance_id, &attribute_type)
            .await?;

        resource
            .as_object_mut()
            .context("instance record is not an object")?
            .insert(INSTANCE_ATTRIBUTE_KEY.to_string(), attribute);
    }

    Ok(())
}

/// Set one attribute on every given instance
pub async fn set_instance_attribute(
    client: &ConnectClient,
    resources: &[Value],
    attribute_type: &str,
    value: &str,
) -> Result<()> {
    for resource in resources {
        let instance_id = resource
            .get("Id")
            .and_then(Value::as_str)
            .context("instance record missing 'Id'")?;
        client
            .update_instance_attribute(instance_id, attribute_type, value)
            .await?;
    }

    Ok(())
}

/// Annotate each campaign record with its backing instance configuration
pub async fn annotate_instance_config(
    client: &ConnectClient,
    campaigns: &mut [Value],
) -> Result<()> {
    for campaign in campaigns.iter_mut() {
        if campaign.get(INSTANCE_CONFIG_KEY).is_some() {
            continue;
        }

        let connect_instance_id = campaign
            .get("connectInstanceId")
            .and_then(Value::as_str)
            .context("campaign record missing 'connectInstanceId'")?;
        let config = client
            .get_connect_instance_config(connect_instance_id)
            .await?;

        campaign
            .as_object_mut()
            .context("campaign record is not an object")?
            .insert(INSTANCE_CONFIG_KEY.to_string(), config);
    }

    Ok(())
}

/// Extract the encryption key ids from annotated campaigns.
///
/// A key reference may be an explicit id or an alias path; the related-key
/// lookup downstream covers both, so only the tail segment is kept.
pub fn encryption_key_ids(campaigns: &[Value]) -> Vec<String> {
    campaigns
        .iter()
        .filter_map(|campaign| {
            let key_arn = campaign
                .get(INSTANCE_CONFIG_KEY)?
                .get("encryptionConfig")?
                .get("keyArn")?
                .as_str()?;
            let key_id = key_arn.rsplit_once('/').map_or(key_arn, |(_, tail)| tail);
            Some(key_id.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encryption_key_ids_normalizes_arn_tail() {
        let campaigns = vec![json!({
            "id": "c-1",
            INSTANCE_CONFIG_KEY: {
                "encryptionConfig": {
                    "enabled": true,
                    "keyArn": "arn:aws:kms:us-east-1:123456789012:key/abc-123"
                }
            }
        })];

        assert_eq!(encryption_key_ids(&campaigns), vec!["abc-123"]);
    }

    #[test]
    fn test_encryption_key_ids_keeps_plain_key_references() {
        // A key reference without a path (an explicit id or bare alias)
        // is kept whole.
        let campaigns = vec![json!({
            "id": "c-1",
            INSTANCE_CONFIG_KEY: {
                "encryptionConfig": {"keyArn": "abc-123"}
            }
        })];

        assert_eq!(encryption_key_ids(&campaigns), vec!["abc-123"]);
    }

    #[test]
    fn test_encryption_key_ids_skips_unannotated_campaigns() {
        let campaigns = vec![json!({"id": "c-1"})];
        assert!(encryption_key_ids(&campaigns).is_empty());
    }

    #[test]
    fn test_attribute_types_are_upper_snake() {
        for attribute in ATTRIBUTE_TYPES {
            assert!(attribute
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
