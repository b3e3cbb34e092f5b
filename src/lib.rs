//! Credit Scoring Dashboard
//!
//! Single-page dashboard for a credit decision tool.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CREDIT DASHBOARD                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │ Feature      │   │ Explanation  │   │ Scoring Client   │──┼──► scoring API
//! │  │ Table (csv)  │   │ Store (json) │   │ (reqwest)        │  │
//! │  └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘  │
//! │         └──────────────────┼────────────────────┘            │
//! │                            ▼                                 │
//! │           decision badge · waterfall · density (SVG)         │
//! │                            ▼                                 │
//! │                      axum router                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod data;
pub mod density;
pub mod error;
pub mod explain;
pub mod handlers;
pub mod render;
pub mod scoring;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use data::FeatureTable;
use explain::ExplanationStore;
use scoring::{ScoringClient, ScoringConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub table: Arc<FeatureTable>,
    pub explanations: Arc<ExplanationStore>,
    pub scoring: Arc<ScoringClient>,
}

impl AppState {
    /// Load the table and explanation store through their caches and build the
    /// scoring client.
    pub fn load(config: config::Config) -> anyhow::Result<Self> {
        let table = FeatureTable::load_cached(&config.feature_table_path)?;
        let explanations = ExplanationStore::load_cached(&config.explanation_path)?;
        let scoring = ScoringClient::new(ScoringConfig {
            url: config.scoring_url.clone(),
            timeout: config.scoring_timeout,
        })?;

        Ok(Self {
            config,
            table,
            explanations,
            scoring: Arc::new(scoring),
        })
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/features", get(handlers::api::features))
        .route("/api/v1/features/:name/density", get(handlers::api::density))
        .route("/api/v1/clients/:id", get(handlers::api::client))
        .route("/api/v1/clients/:id/decision", get(handlers::api::decision))
        .route("/api/v1/clients/:id/explanation", get(handlers::api::explanation));

    Router::new()
        .route("/", get(handlers::dashboard::page))
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
