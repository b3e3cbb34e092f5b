//! Data Module - client feature table

pub mod table;

pub use table::{ClientRecord, FeatureTable, FeatureView, TableError, EXCLUDED_COLUMNS, LABEL_COLUMN};
