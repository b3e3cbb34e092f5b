//! Central Configuration Constants
//!
//! Single source of truth for the dashboard's fixed values and defaults.

/// Production scoring endpoint.
///
/// Used when `SCORING_URL` is not set.
pub const DEFAULT_SCORING_URL: &str = "https://api-flask-p7-45d9629e815b.herokuapp.com/prediction";

/// Positive-class probability at or above which a credit is granted.
pub const DECISION_THRESHOLD: f64 = 0.6;

/// Default client feature table
pub const DEFAULT_FEATURE_TABLE_PATH: &str = "df_cleaned_reduced.csv";

/// Default precomputed explanation store
pub const DEFAULT_EXPLANATION_PATH: &str = "shap_values_lgbm.json";

/// Default listening port
pub const DEFAULT_PORT: u16 = 8501;

/// Client shown when the page is opened without an `id`
pub const DEFAULT_CLIENT_ID: usize = 1;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Page title
pub const APP_TITLE: &str = "Dashboard - Prêt à dépenser";
