//! JSON API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::parse_client_id;
use crate::constants::DECISION_THRESHOLD;
use crate::density::{self, DensityCurve, PopulationFilter};
use crate::explain::{waterfall, Waterfall};
use crate::scoring::{Decision, Prediction};
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub client_id: usize,
    pub prediction: Prediction,
    pub decision: Decision,
    pub threshold: f64,
}

#[derive(Debug, Deserialize)]
pub struct DensityQuery {
    pub population: Option<String>,
    /// Client whose value is marked on the curve
    pub client: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DensityResponse {
    #[serde(flatten)]
    pub curve: DensityCurve,
    pub reference: Option<f64>,
}

/// List feature columns
pub async fn features(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.table.feature_names().to_vec())
}

/// Get one client's features
pub async fn client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let id = parse_client_id(&id)?;
    let record = state.table.get(id)?;
    let features = state.table.features(id)?;

    Ok(Json(json!({
        "id": record.id,
        "label": record.label,
        "features": features,
    })))
}

/// Score a client and decide
pub async fn decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DecisionResponse>> {
    let id = parse_client_id(&id)?;
    let prediction = state.scoring.request_prediction(&state.table, id).await?;

    Ok(Json(DecisionResponse {
        client_id: id,
        decision: Decision::from_prediction(&prediction),
        prediction,
        threshold: DECISION_THRESHOLD,
    }))
}

/// Waterfall layout of a client's explanation
pub async fn explanation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Waterfall>> {
    let id = parse_client_id(&id)?;
    let explanation = state.explanations.get(id)?;
    Ok(Json(waterfall::build(id, explanation, waterfall::MAX_DISPLAY)?))
}

/// Density of a feature over a population
pub async fn density(
    State(state): State<AppState>,
    Path(feature): Path<String>,
    Query(query): Query<DensityQuery>,
) -> AppResult<Json<DensityResponse>> {
    let population = query
        .population
        .as_deref()
        .map(PopulationFilter::parse)
        .unwrap_or_default();
    let curve = density::density_curve(&state.table, &feature, population)?;

    let reference = match query.client.as_deref() {
        Some(raw) => {
            let id = parse_client_id(raw)?;
            state.table.features(id)?.get(&feature).flatten()
        }
        None => None,
    };

    Ok(Json(DensityResponse { curve, reference }))
}
