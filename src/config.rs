//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote scoring endpoint (full URL, POSTed to as-is)
    pub scoring_url: String,

    /// Optional request timeout for the scoring call. `None` waits forever.
    pub scoring_timeout: Option<Duration>,

    /// Semicolon-delimited client feature table
    pub feature_table_path: PathBuf,

    /// Precomputed explanation store (JSON)
    pub explanation_path: PathBuf,

    /// Server port
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring_url: constants::DEFAULT_SCORING_URL.to_string(),
            scoring_timeout: None,
            feature_table_path: PathBuf::from(constants::DEFAULT_FEATURE_TABLE_PATH),
            explanation_path: PathBuf::from(constants::DEFAULT_EXPLANATION_PATH),
            port: constants::DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            scoring_url: env::var("SCORING_URL")
                .unwrap_or(defaults.scoring_url),

            scoring_timeout: env::var("SCORING_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),

            feature_table_path: env::var("FEATURE_TABLE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.feature_table_path),

            explanation_path: env::var("EXPLANATION_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.explanation_path),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring_url, constants::DEFAULT_SCORING_URL);
        assert_eq!(config.port, 8501);
        assert!(config.scoring_timeout.is_none());
    }
}
