//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    scoring_url: String,
    scoring_timeout_secs: Option<u64>,
    clients: usize,
    explanations: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: crate::constants::APP_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        scoring_url: state.config.scoring_url.clone(),
        scoring_timeout_secs: state.config.scoring_timeout.map(|t| t.as_secs()),
        clients: state.table.len(),
        explanations: state.explanations.len(),
    })
}
