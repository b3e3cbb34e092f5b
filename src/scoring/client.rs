//! Scoring API Client
//!
//! HTTP client for the remote credit scoring endpoint.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::data::{FeatureTable, FeatureView, TableError};

/// Scoring endpoint configuration
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub url: String,
    /// `None` leaves the request unbounded
    pub timeout: Option<Duration>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            url: crate::constants::DEFAULT_SCORING_URL.to_string(),
            timeout: None,
        }
    }
}

/// Probability pair returned for one client
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Probability of repayment
    pub positive: f64,
    /// Probability of default
    pub negative: f64,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    prediction: (f64, f64),
}

/// Scoring client errors
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Lookup(#[from] TableError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint answered with anything but 200
    #[error("Request failed with status {status}, {body}")]
    Request { status: u16, body: String },

    #[error("Malformed scoring response: {0}")]
    Malformed(String),
}

/// Scoring API client
#[derive(Debug, Clone)]
pub struct ScoringClient {
    config: ScoringConfig,
    http_client: reqwest::Client,
}

impl ScoringClient {
    /// Create new scoring client
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            http_client: builder.build()?,
        })
    }

    /// Score one client of the table.
    pub async fn request_prediction(
        &self,
        table: &FeatureTable,
        client_id: usize,
    ) -> Result<Prediction, ScoringError> {
        let features = table.features(client_id)?;
        tracing::debug!("Requesting prediction for client {}", client_id);
        self.predict(&features).await
    }

    /// POST a feature view and parse the probability pair.
    ///
    /// Missing features go out as explicit `null`s. One attempt, no retry.
    pub async fn predict(&self, features: &FeatureView<'_>) -> Result<Prediction, ScoringError> {
        let response = self
            .http_client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .json(features)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Scoring request failed ({}): {}", status.as_u16(), body);
            return Err(ScoringError::Request {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: PredictionResponse =
            serde_json::from_str(&raw).map_err(|e| ScoringError::Malformed(e.to_string()))?;

        let (positive, negative) = parsed.prediction;
        Ok(Prediction { positive, negative })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::testing::spawn_scoring_stub;
    use axum::http::StatusCode;

    fn table() -> FeatureTable {
        let csv = "\
EXT_SOURCE_1;PAYMENT_RATE;EXT_SOURCE_3;TARGET
0.08;0.06;0.13;1
3.11;2.75;;0
;0.05;0.72;0
";
        FeatureTable::from_reader(csv.as_bytes()).unwrap()
    }

    fn client(url: String) -> ScoringClient {
        ScoringClient::new(ScoringConfig { url, timeout: None }).unwrap()
    }

    #[tokio::test]
    async fn test_request_prediction_success() {
        let stub = spawn_scoring_stub(StatusCode::OK, r#"{"prediction":[0.7,0.3]}"#).await;
        let scoring = client(stub.url.clone());

        let prediction = scoring.request_prediction(&table(), 1).await.unwrap();
        assert_eq!(prediction, Prediction { positive: 0.7, negative: 0.3 });

        let received = stub.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].content_type.as_deref(), Some("application/json"));

        let body = received[0].body.as_object().unwrap();
        assert_eq!(body.len(), 3);
        assert!(!body.contains_key("TARGET"));
        assert!(!body.contains_key("user_id"));
        assert_eq!(body["EXT_SOURCE_1"], serde_json::json!(3.11));
        // Missing value present as explicit null
        assert!(body.contains_key("EXT_SOURCE_3"));
        assert!(body["EXT_SOURCE_3"].is_null());
    }

    #[tokio::test]
    async fn test_every_client_payload_is_json_safe() {
        let stub = spawn_scoring_stub(StatusCode::OK, r#"{"prediction":[0.5,0.5]}"#).await;
        let scoring = client(stub.url.clone());
        let table = table();

        for id in 0..table.len() {
            scoring.request_prediction(&table, id).await.unwrap();
        }

        for captured in stub.received() {
            let body = captured.body.as_object().unwrap();
            assert_eq!(body.len(), table.feature_names().len());
            assert!(body.values().all(|v| v.is_null() || v.is_f64()));
        }
    }

    #[tokio::test]
    async fn test_non_200_is_request_error() {
        let stub = spawn_scoring_stub(StatusCode::INTERNAL_SERVER_ERROR, "internal error").await;
        let scoring = client(stub.url.clone());

        let err = scoring.request_prediction(&table(), 1).await.unwrap_err();
        match err {
            ScoringError::Request { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_other_2xx_is_request_error() {
        let stub = spawn_scoring_stub(StatusCode::CREATED, r#"{"prediction":[0.9,0.1]}"#).await;
        let err = client(stub.url.clone())
            .request_prediction(&table(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Request { status: 201, .. }));
    }

    #[tokio::test]
    async fn test_unknown_client_is_not_sent() {
        let stub = spawn_scoring_stub(StatusCode::OK, r#"{"prediction":[0.7,0.3]}"#).await;
        let err = client(stub.url.clone())
            .request_prediction(&table(), 9)
            .await
            .unwrap_err();

        assert!(matches!(err, ScoringError::Lookup(TableError::UnknownClient(9))));
        assert!(stub.received().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let stub = spawn_scoring_stub(StatusCode::OK, r#"{"score":0.7}"#).await;
        let err = client(stub.url.clone())
            .request_prediction(&table(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::Malformed(_)));
    }
}
