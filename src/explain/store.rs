//! Explanation Store
//!
//! Per-client attributions produced by the offline explainability pipeline.
//! The whole file is read into memory once per path and never reloaded.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Deserialize;

use super::types::Explanation;

static STORES: Lazy<RwLock<HashMap<PathBuf, Arc<ExplanationStore>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

#[derive(Debug, thiserror::Error)]
pub enum ExplanationError {
    #[error("cannot read explanation store {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed explanation store: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("explanation store key {0:?} is not a row position")]
    InvalidKey(String),

    #[error("no explanation for client {0}")]
    Missing(usize),

    #[error("explanation for client {id} is inconsistent: {reason}")]
    Malformed { id: usize, reason: String },
}

/// On-disk layouts: a row-indexed array, or an object keyed by row position.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoreFile {
    Indexed(Vec<Option<Explanation>>),
    Keyed(BTreeMap<String, Explanation>),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExplanationStore {
    entries: HashMap<usize, Explanation>,
}

impl ExplanationStore {
    /// Load through the process-wide cache.
    pub fn load_cached(path: impl AsRef<Path>) -> Result<Arc<Self>, ExplanationError> {
        let path = path.as_ref();

        if let Some(store) = STORES.read().get(path) {
            return Ok(store.clone());
        }

        let store = Arc::new(Self::load(path)?);
        let mut stores = STORES.write();
        let entry = stores.entry(path.to_path_buf()).or_insert(store);

        tracing::info!(
            "Explanation store loaded: {} ({} entries)",
            path.display(),
            entry.len()
        );
        Ok(entry.clone())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ExplanationError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ExplanationError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ExplanationError> {
        let entries = match serde_json::from_str::<StoreFile>(raw)? {
            StoreFile::Indexed(list) => list
                .into_iter()
                .enumerate()
                .filter_map(|(id, entry)| entry.map(|e| (id, e)))
                .collect(),
            StoreFile::Keyed(map) => map
                .into_iter()
                .map(|(key, entry)| {
                    key.trim()
                        .parse::<usize>()
                        .map(|id| (id, entry))
                        .map_err(|_| ExplanationError::InvalidKey(key))
                })
                .collect::<Result<_, _>>()?,
        };

        Ok(Self { entries })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (usize, Explanation)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up a client's explanation. No placeholder is ever synthesized.
    pub fn get(&self, id: usize) -> Result<&Explanation, ExplanationError> {
        self.entries.get(&id).ok_or(ExplanationError::Missing(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(base: f64) -> serde_json::Value {
        serde_json::json!({
            "base_value": base,
            "values": [0.1, -0.2],
            "data": [1.0, null],
            "feature_names": ["A", "B"]
        })
    }

    #[test]
    fn test_indexed_layout() {
        let raw = serde_json::json!([entry(0.5), null, entry(0.7)]).to_string();
        let store = ExplanationStore::from_json(&raw).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().base_value, 0.7);
        assert_eq!(store.get(0).unwrap().data, vec![Some(1.0), None]);
        assert!(matches!(store.get(1), Err(ExplanationError::Missing(1))));
    }

    #[test]
    fn test_keyed_layout() {
        let raw = serde_json::json!({ "0": entry(0.1), "3": entry(0.3) }).to_string();
        let store = ExplanationStore::from_json(&raw).unwrap();
        assert_eq!(store.get(3).unwrap().base_value, 0.3);
    }

    #[test]
    fn test_missing_client_is_lookup_error() {
        let raw = serde_json::json!([entry(0.5), entry(0.5), entry(0.5)]).to_string();
        let store = ExplanationStore::from_json(&raw).unwrap();
        assert!(matches!(store.get(5), Err(ExplanationError::Missing(5))));
    }

    #[test]
    fn test_bad_key() {
        let raw = serde_json::json!({ "first": entry(0.1) }).to_string();
        let err = ExplanationStore::from_json(&raw).unwrap_err();
        assert!(matches!(err, ExplanationError::InvalidKey(k) if k == "first"));
    }

    #[test]
    fn test_cached_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::json!([entry(0.5)]).to_string().as_bytes())
            .unwrap();

        let first = ExplanationStore::load_cached(file.path()).unwrap();
        let second = ExplanationStore::load_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!((first.get(0).unwrap().prediction() - 0.4).abs() < 1e-12);
    }
}
