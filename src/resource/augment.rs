//! Augmentation executor
//!
//! Enriches child summaries into fully described records. One task is
//! scheduled per owning instance; tasks run concurrently on a bounded pool
//! while each task walks its own children sequentially, so one slow
//! dependency call stalls at most one instance's lookups.
//!
//! A failure while describing any child drops that instance's entire
//! contribution (logged as a warning) without aborting the batch. Partial
//! results are the expected steady state under per-resource failures; the
//! caller treats missing records as absent from the evaluation set.

use super::locator::ParentChildGrouping;
use anyhow::Result;
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use std::future::Future;

/// Fetch details for every child in `grouping`, with at most `max_workers`
/// instances in flight at a time.
///
/// `fetch_one` describes a single child of a given instance. Output order
/// across instances follows task completion order; within one instance it
/// follows the input child order. Records whose tag payload is a flat map
/// are normalized to the list-of-pairs shape before being returned.
pub async fn augment<F, Fut>(
    grouping: ParentChildGrouping,
    fetch_one: F,
    max_workers: usize,
) -> Vec<Value>
where
    F: Fn(String, String) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let fetch_one = &fetch_one;

    let tasks = grouping.into_iter().map(|(parent, children)| async move {
        let mut records = Vec::with_capacity(children.len());
        for child in children {
            match fetch_one(parent.clone(), child).await {
                Ok(mut record) => {
                    normalize_tags(&mut record);
                    records.push(record);
                }
                // All-or-nothing per instance: records described before the
                // failing call are discarded along with the rest.
                Err(err) => return (parent, Err(err)),
            }
        }
        (parent, Ok(records))
    });

    let mut results = Vec::new();
    let mut completed = stream::iter(tasks).buffer_unordered(max_workers.max(1));

    while let Some((parent, outcome)) = completed.next().await {
        match outcome {
            Ok(records) => results.extend(records),
            Err(err) => {
                tracing::warn!("skipping instance {}: {:#}", parent, err);
            }
        }
    }

    results
}

/// Normalize a record's tag payload in place.
///
/// Describe calls return tags as a flat `{key: value}` map, while downstream
/// tag filters and actions expect `[{"Key": .., "Value": ..}]`. A payload
/// already in list shape (or absent) is left untouched.
pub fn normalize_tags(record: &mut Value) {
    let Some(obj) = record.as_object_mut() else {
        return;
    };

    let pairs: Vec<Value> = match obj.get("Tags").and_then(Value::as_object) {
        Some(map) => map
            .iter()
            .map(|(key, value)| json!({"Key": key, "Value": value}))
            .collect(),
        None => return,
    };

    obj.insert("Tags".to_string(), Value::Array(pairs));
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn grouping(entries: &[(&str, &[&str])]) -> ParentChildGrouping {
        entries
            .iter()
            .map(|(parent, children)| {
                (
                    parent.to_string(),
                    children.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect()
    }

    fn record(parent: &str, child: &str) -> Value {
        json!({"Id": child, "InstanceId": parent})
    }

    #[tokio::test]
    async fn test_all_success_returns_every_child() {
        let grouping = grouping(&[("inst-a", &["u-1", "u-2"]), ("inst-b", &["u-3"])]);

        let results = augment(
            grouping,
            |parent, child| async move { Ok(record(&parent, &child)) },
            4,
        )
        .await;

        assert_eq!(results.len(), 3);
        let ids: HashSet<&str> = results.iter().map(|r| r["Id"].as_str().unwrap()).collect();
        assert_eq!(ids, HashSet::from(["u-1", "u-2", "u-3"]));
    }

    #[tokio::test]
    async fn test_per_instance_order_matches_input_child_order() {
        let grouping = grouping(&[("inst-a", &["u-3", "u-1", "u-2"]), ("inst-b", &["u-9"])]);

        let results = augment(
            grouping,
            |parent, child| async move { Ok(record(&parent, &child)) },
            2,
        )
        .await;

        let inst_a: Vec<&str> = results
            .iter()
            .filter(|r| r["InstanceId"] == "inst-a")
            .map(|r| r["Id"].as_str().unwrap())
            .collect();
        assert_eq!(inst_a, vec!["u-3", "u-1", "u-2"]);
    }

    #[tokio::test]
    async fn test_one_failing_instance_drops_only_that_instance() {
        let grouping = grouping(&[
            ("inst-a", &["u-1", "u-2"]),
            ("inst-bad", &["u-3", "u-4"]),
            ("inst-c", &["u-5"]),
        ]);

        let results = augment(
            grouping,
            |parent, child| async move {
                if parent == "inst-bad" && child == "u-4" {
                    Err(anyhow!("throttled"))
                } else {
                    Ok(record(&parent, &child))
                }
            },
            4,
        )
        .await;

        // u-3 succeeded before u-4 failed, but the whole instance is dropped.
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r["InstanceId"] != "inst-bad"));
    }

    #[tokio::test]
    async fn test_empty_grouping_performs_no_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let results = augment(
            ParentChildGrouping::new(),
            move |parent, child| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(record(&parent, &child)) }
            },
            4,
        )
        .await;

        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_max_workers() {
        let entries: Vec<(String, Vec<String>)> = (0..12)
            .map(|i| (format!("inst-{}", i), vec![format!("u-{}", i)]))
            .collect();
        let grouping: ParentChildGrouping = entries.into_iter().collect();

        let in_flight = Arc::new(AtomicUsize::new(0));
        let high_water = Arc::new(AtomicUsize::new(0));

        let results = augment(
            grouping,
            {
                let in_flight = in_flight.clone();
                let high_water = high_water.clone();
                move |parent, child| {
                    let in_flight = in_flight.clone();
                    let high_water = high_water.clone();
                    async move {
                        let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        high_water.fetch_max(current, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(record(&parent, &child))
                    }
                }
            },
            3,
        )
        .await;

        assert_eq!(results.len(), 12);
        assert!(high_water.load(Ordering::SeqCst) <= 3);
    }

    #[test]
    fn test_normalize_tags_converts_map_to_pairs() {
        let mut record = json!({"Id": "u-1", "Tags": {"a": "1", "b": "2"}});
        normalize_tags(&mut record);

        let pairs: HashSet<(String, String)> = record["Tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| {
                (
                    p["Key"].as_str().unwrap().to_string(),
                    p["Value"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        let expected = HashSet::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(pairs, expected);
    }

    #[test]
    fn test_normalize_tags_leaves_pair_list_untouched() {
        let mut record = json!({"Tags": [{"Key": "a", "Value": "1"}]});
        let before = record.clone();
        normalize_tags(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn test_normalize_tags_without_tags_is_noop() {
        let mut record = json!({"Id": "u-1"});
        normalize_tags(&mut record);
        assert_eq!(record, json!({"Id": "u-1"}));
    }
}
