//! Client Feature Table
//!
//! Loads the semicolon-delimited client table once per path. Each row gets its
//! position as identifier; the label column is split away from the features so
//! the feature view can be sent to the scoring endpoint as-is.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ground-truth column
pub const LABEL_COLUMN: &str = "TARGET";

/// Identifier column (assigned, never read from the file)
pub const ID_COLUMN: &str = "user_id";

/// Columns that never reach the feature view.
pub const EXCLUDED_COLUMNS: [&str; 2] = [LABEL_COLUMN, ID_COLUMN];

/// Cell contents read as a missing value.
const MISSING_TOKENS: [&str; 10] = [
    "", "nan", "-nan", "na", "n/a", "#n/a", "null", "none", "<na>", "#na",
];

// Global table registry, keyed by source path. Entries are never evicted.
static TABLES: Lazy<RwLock<HashMap<PathBuf, Arc<FeatureTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot open feature table {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed feature table: {0}")]
    Csv(#[from] csv::Error),

    #[error("feature table has no {} column", LABEL_COLUMN)]
    MissingLabel,

    #[error("row {row}, column {column}: {value:?} is not a number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("client {0} not found")]
    UnknownClient(usize),

    #[error("feature {0} not found")]
    UnknownFeature(String),
}

/// One client row
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    /// Row position in the source file
    pub id: usize,

    /// Ground truth (0 = repaid, 1 = defaulted). Never sent for scoring.
    pub label: Option<f64>,

    /// Values in the table's feature order
    pub features: Vec<Option<f64>>,
}

/// Feature-only projection of one client, in column order.
///
/// Serializes as a JSON object where missing values are explicit `null`s.
#[derive(Debug, Clone, Copy)]
pub struct FeatureView<'a> {
    names: &'a [String],
    values: &'a [Option<f64>],
}

impl<'a> FeatureView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<f64>)> + 'a {
        let (names, values) = (self.names, self.values);
        names.iter().map(String::as_str).zip(values.iter().copied())
    }

    /// `None` if the feature does not exist, `Some(None)` if it is missing.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Serialize for FeatureView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Loaded client table. Immutable after load.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_names: Vec<String>,
    records: Vec<ClientRecord>,
}

impl FeatureTable {
    /// Load through the process-wide cache.
    ///
    /// The first call for a path reads the file; later calls return the same
    /// table.
    pub fn load_cached(path: impl AsRef<Path>) -> Result<Arc<Self>, TableError> {
        let path = path.as_ref();

        if let Some(table) = TABLES.read().get(path) {
            return Ok(table.clone());
        }

        let table = Arc::new(Self::load(path)?);
        let mut tables = TABLES.write();
        let entry = tables.entry(path.to_path_buf()).or_insert(table);

        tracing::info!(
            "Feature table loaded: {} ({} clients, {} features)",
            path.display(),
            entry.len(),
            entry.feature_names.len()
        );
        Ok(entry.clone())
    }

    /// Read a table from disk, bypassing the cache.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TableError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a semicolon-delimited table with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let label_index = headers
            .iter()
            .position(|h| h.trim() == LABEL_COLUMN)
            .ok_or(TableError::MissingLabel)?;

        // (column index, name) for every kept column
        let feature_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (i, h.trim().to_string()))
            .filter(|(_, h)| !EXCLUDED_COLUMNS.contains(&h.as_str()))
            .collect();

        let mut records = Vec::new();
        for (id, row) in reader.records().enumerate() {
            let row = row?;

            let label = parse_cell(row.get(label_index).unwrap_or(""))
                .map_err(|value| TableError::InvalidValue {
                    row: id,
                    column: LABEL_COLUMN.to_string(),
                    value,
                })?;

            let features = feature_columns
                .iter()
                .map(|(i, name)| {
                    parse_cell(row.get(*i).unwrap_or("")).map_err(|value| {
                        TableError::InvalidValue {
                            row: id,
                            column: name.clone(),
                            value,
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            records.push(ClientRecord { id, label, features });
        }

        Ok(Self {
            feature_names: feature_columns.into_iter().map(|(_, name)| name).collect(),
            records,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a client by identifier
    pub fn get(&self, id: usize) -> Result<&ClientRecord, TableError> {
        // ids are row positions, so the index is the id
        self.records.get(id).ok_or(TableError::UnknownClient(id))
    }

    /// Feature-only view of one client
    pub fn features(&self, id: usize) -> Result<FeatureView<'_>, TableError> {
        let record = self.get(id)?;
        Ok(FeatureView {
            names: &self.feature_names,
            values: &record.features,
        })
    }

    pub fn feature_index(&self, name: &str) -> Result<usize, TableError> {
        self.feature_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| TableError::UnknownFeature(name.to_string()))
    }
}

/// `Ok(None)` for missing cells, `Err(cell)` when the cell is not numeric.
fn parse_cell(cell: &str) -> Result<Option<f64>, String> {
    let cell = cell.trim();
    if MISSING_TOKENS.contains(&cell.to_ascii_lowercase().as_str()) {
        return Ok(None);
    }

    match cell.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(cell.to_string()),
    }
}
