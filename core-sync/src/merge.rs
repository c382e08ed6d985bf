//! # State Merge
//!
//! Folds a remote (or imported) state document into the local one.
//!
//! ## Default policy: [`LastUpdateWinsMerger`]
//!
//! - Objects that both carry a timestamp (`lastUpdateTime` or `lastUpdate`)
//!   are taken whole from whichever side is newer; ties keep local.
//! - Other objects are merged key by key; keys only present remotely are
//!   added.
//! - Arrays whose elements all have a string `id` are unioned by id, with
//!   matching elements merged recursively.
//! - Any other conflicting value keeps the local side.
//!
//! Deletions are not propagated; an item removed on one device comes back
//! from the other.

use crate::state::AppState;
use crate::{Result, SyncError};
use serde_json::{Map, Value};

/// Timestamp fields, in lookup order.
const TIMESTAMP_FIELDS: &[&str] = &["lastUpdateTime", "lastUpdate"];

/// Merges `source` into `target` in place.
pub trait AppStateMerger: Send + Sync {
    fn merge(&self, target: &mut AppState, source: &AppState) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LastUpdateWinsMerger;

impl AppStateMerger for LastUpdateWinsMerger {
    fn merge(&self, target: &mut AppState, source: &AppState) -> Result<()> {
        match (target.as_value_mut(), source.as_value()) {
            (Value::Object(target), Value::Object(source)) => {
                merge_objects(target, source);
                Ok(())
            }
            _ => Err(SyncError::Merge(
                "application state must be a JSON object".to_string(),
            )),
        }
    }
}

fn timestamp(object: &Map<String, Value>) -> Option<f64> {
    TIMESTAMP_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_f64))
}

fn merge_objects(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    if let (Some(local), Some(remote)) = (timestamp(target), timestamp(source)) {
        if remote > local {
            *target = source.clone();
        }
        return;
    }

    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => merge_values(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_values(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_objects(target, source),
        (Value::Array(target), Value::Array(source)) => {
            if is_keyed(target) && is_keyed(source) {
                merge_keyed(target, source);
            }
        }
        _ => {}
    }
}

fn element_id(value: &Value) -> Option<&str> {
    value.get("id")?.as_str()
}

fn is_keyed(items: &[Value]) -> bool {
    items.iter().all(|item| element_id(item).is_some())
}

fn merge_keyed(target: &mut Vec<Value>, source: &[Value]) {
    for item in source {
        let Some(id) = element_id(item) else {
            continue;
        };

        match target.iter_mut().find(|existing| element_id(existing) == Some(id)) {
            Some(existing) => merge_values(existing, item),
            None => target.push(item.clone()),
        }
    }
}
