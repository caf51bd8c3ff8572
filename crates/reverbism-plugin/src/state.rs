//! Persisted plugin state.
//!
//! Format: a versioned JSON object keyed by stable string parameter IDs.
//!
//! ```json
//! {"version": 1, "params": {"damp": 50.0, "freeze": 0.0, "mix": 50.0, "size": 50.0, "width": 50.0}}
//! ```
//!
//! Loading is forward compatible: unknown keys are ignored and parameters
//! absent from the blob take their declared defaults. Legacy blobs without a
//! `version` field are a flat `{"id": value}` object and load as version 0.
//! Keys may also be numeric parameter IDs (`"1500"`).
//!
//! A blob that fails to parse or validate leaves the store untouched. A
//! valid blob is applied with a single [`ParamStore::restore`] batch.

use crate::error::StateError;
use crate::shared::ParamStore;
use reverbism_core::ParamId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Version written by [`save_state`]; the newest [`load_state`] accepts.
pub const STATE_VERSION: u64 = 1;

#[derive(Serialize)]
struct StateDocument<'a> {
    version: u64,
    params: BTreeMap<&'a str, f64>,
}

/// What a successful [`load_state`] did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Format version of the blob (0 for legacy flat objects).
    pub version: u64,
    /// Parameters whose value came from the blob.
    pub applied: usize,
    /// Keys in the blob that match no declared parameter.
    pub ignored_keys: Vec<String>,
    /// Parameters absent from the blob, reset to their defaults.
    pub defaulted: Vec<&'static str>,
}

impl LoadReport {
    /// Whether every declared parameter came from the blob.
    pub fn is_complete(&self) -> bool {
        self.defaulted.is_empty()
    }
}

/// Serialize every parameter's current value.
///
/// Values are written as `f64` widened from the stored `f32`, so loading
/// them back is bit-exact.
pub fn save_state(store: &ParamStore) -> Result<Vec<u8>, StateError> {
    let snapshot = store.snapshot();
    let params = store
        .descriptors()
        .iter()
        .zip(snapshot.as_slice())
        .map(|(desc, &value)| (desc.string_id, f64::from(value)))
        .collect();

    let bytes = serde_json::to_vec(&StateDocument {
        version: STATE_VERSION,
        params,
    })
    .map_err(StateError::Serialize)?;

    tracing::debug!(bytes = bytes.len(), "saved plugin state");
    Ok(bytes)
}

/// Parse `bytes` and replace every parameter value.
///
/// On error the store is left exactly as it was.
pub fn load_state(store: &ParamStore, bytes: &[u8]) -> Result<LoadReport, StateError> {
    let root: Value = serde_json::from_slice(bytes).map_err(StateError::Parse)?;
    let root = root.as_object().ok_or(StateError::NotAnObject)?;
    let (version, params) = split_document(root)?;

    let count = store.param_count();
    let mut values: Vec<f32> = (0..count)
        .map(|i| store.default_value(i).unwrap_or_default())
        .collect();
    let mut loaded = vec![false; count];
    let mut report = LoadReport {
        version,
        ..LoadReport::default()
    };

    for (key, raw) in params {
        let Some(index) = resolve_key(store, key) else {
            report.ignored_keys.push(key.clone());
            continue;
        };
        values[index] = parse_value(raw).ok_or_else(|| StateError::InvalidValue { id: key.clone() })?;
        loaded[index] = true;
    }

    for (desc, was_loaded) in store.descriptors().iter().zip(&loaded) {
        if *was_loaded {
            report.applied += 1;
        } else {
            report.defaulted.push(desc.string_id);
        }
    }

    store.restore(&values);
    tracing::debug!(
        version,
        applied = report.applied,
        ignored = report.ignored_keys.len(),
        defaulted = report.defaulted.len(),
        "loaded plugin state"
    );
    Ok(report)
}

fn split_document(root: &Map<String, Value>) -> Result<(u64, &Map<String, Value>), StateError> {
    let Some(version) = root.get("version") else {
        return Ok((0, root));
    };
    let version = version.as_u64().ok_or(StateError::InvalidVersion)?;
    if version > STATE_VERSION {
        return Err(StateError::UnsupportedVersion {
            found: version,
            supported: STATE_VERSION,
        });
    }
    let params = root
        .get("params")
        .and_then(Value::as_object)
        .ok_or(StateError::InvalidParams)?;
    Ok((version, params))
}

fn resolve_key(store: &ParamStore, key: &str) -> Option<usize> {
    store.index_of(key).or_else(|| {
        key.parse::<u32>()
            .ok()
            .and_then(|id| store.index_by_id(ParamId(id)))
    })
}

fn parse_value(raw: &Value) -> Option<f32> {
    match raw {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(|v| v as f32),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
