//! Explanation records and waterfall layout types

use serde::{Deserialize, Serialize};

/// Precomputed attribution for one client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Expected model output over the background data, E[f(X)]
    pub base_value: f64,

    /// One attribution per feature, in `feature_names` order
    pub values: Vec<f64>,

    /// Feature values the attributions were computed for
    #[serde(default)]
    pub data: Vec<Option<f64>>,

    pub feature_names: Vec<String>,
}

impl Explanation {
    /// Model output for this client, f(x) = E[f(X)] + sum of attributions
    pub fn prediction(&self) -> f64 {
        self.base_value + self.values.iter().sum::<f64>()
    }
}

/// One bar of a waterfall chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    pub feature_value: Option<f64>,
    pub contribution: f64,
    pub start: f64,
    pub end: f64,
}

/// Waterfall layout, steps in accumulation order (base value first)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waterfall {
    pub client_id: usize,
    pub base_value: f64,
    pub prediction: f64,
    pub steps: Vec<WaterfallStep>,
}
