//! Dashboard page handler
//!
//! One request is one full rendering pass: client lookup, scoring call,
//! decision badge, waterfall and density chart. Any failure aborts the whole
//! pass; nothing is rendered partially.

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use super::parse_client_id;
use crate::constants::DEFAULT_CLIENT_ID;
use crate::data::TableError;
use crate::density::{self, PopulationFilter};
use crate::error::PageError;
use crate::explain::waterfall;
use crate::render::{self, page::DashboardPage};
use crate::scoring::Decision;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub id: Option<String>,
    pub population: Option<String>,
    pub feature: Option<String>,
}

pub async fn page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, PageError> {
    render_dashboard(&state, &query)
        .await
        .map(Html)
        .map_err(PageError)
}

pub async fn render_dashboard(state: &AppState, query: &DashboardQuery) -> AppResult<String> {
    let table = state.table.as_ref();

    let client_id = match query.id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_client_id(raw)?,
        _ => DEFAULT_CLIENT_ID,
    };
    let population = query
        .population
        .as_deref()
        .map(PopulationFilter::parse)
        .unwrap_or_default();
    let feature = match query.feature.as_deref() {
        Some(name) => name.to_string(),
        None => table
            .feature_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::NotFound("Feature table has no feature columns".to_string()))?,
    };

    let features = table.features(client_id)?;
    let reference = features
        .get(&feature)
        .ok_or_else(|| TableError::UnknownFeature(feature.clone()))?;

    let prediction = state.scoring.request_prediction(table, client_id).await?;
    let decision = Decision::from_prediction(&prediction);
    tracing::info!(
        "Client {}: p_pos={:.3} p_neg={:.3} -> {:?} {}%",
        client_id,
        prediction.positive,
        prediction.negative,
        decision.verdict,
        decision.percent
    );

    let explanation = state.explanations.get(client_id)?;
    let layout = waterfall::build(client_id, explanation, waterfall::MAX_DISPLAY)?;
    let curve = density::density_curve(table, &feature, population)?;

    Ok(DashboardPage {
        table,
        client_id,
        features,
        population,
        feature: &feature,
        decision_html: render::decision::decision_badge(&decision),
        waterfall_svg: render::waterfall::waterfall_chart(&layout),
        density_svg: render::density::density_chart(&curve, reference),
    }
    .render())
}
