//! Population density of one feature
//!
//! Gaussian kernel density estimate over a filtered population, sampled on a
//! fixed grid for charting.

use std::f64::consts::PI;

use serde::Serialize;

use crate::data::{FeatureTable, TableError};

/// Grid resolution of a density curve
pub const DENSITY_STEPS: usize = 200;

/// Population shown in the density chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationFilter {
    #[default]
    All,
    /// Clients who repaid (label 0)
    Eligible,
    /// Clients who defaulted (label 1)
    Ineligible,
}

impl PopulationFilter {
    pub const ALL_FILTERS: [PopulationFilter; 3] = [Self::All, Self::Eligible, Self::Ineligible];

    /// Unrecognised values select everyone.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "eligible" | "eligibles" => Self::Eligible,
            "ineligible" | "ineligibles" | "non_eligible" | "non éligibles" => Self::Ineligible,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Eligible => "eligible",
            Self::Ineligible => "ineligible",
        }
    }

    /// Label shown in the population selector
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "Tous",
            Self::Eligible => "Eligibles",
            Self::Ineligible => "Non éligibles",
        }
    }

    /// Labels are compared exactly; a fractional label is in neither class.
    pub fn accepts(&self, label: Option<f64>) -> bool {
        match self {
            Self::All => true,
            Self::Eligible => label == Some(0.0),
            Self::Ineligible => label == Some(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub value: f64,
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    pub feature: String,
    pub population: PopulationFilter,
    /// Rows kept by the filter
    pub population_size: usize,
    /// Rows with a value for the feature
    pub sample_size: usize,
    pub bandwidth: f64,
    pub points: Vec<DensityPoint>,
}

/// Feature values of the filtered population. Missing values are skipped.
pub fn population_values(
    table: &FeatureTable,
    feature: &str,
    filter: PopulationFilter,
) -> Result<(usize, Vec<f64>), TableError> {
    let index = table.feature_index(feature)?;

    let population: Vec<_> = table
        .records()
        .iter()
        .filter(|r| filter.accepts(r.label))
        .collect();
    let values = population
        .iter()
        .filter_map(|r| r.features[index])
        .filter(|v| v.is_finite())
        .collect();

    Ok((population.len(), values))
}

pub fn density_curve(
    table: &FeatureTable,
    feature: &str,
    filter: PopulationFilter,
) -> Result<DensityCurve, TableError> {
    let (population_size, mut samples) = population_values(table, feature, filter)?;
    samples.sort_by(|a, b| a.total_cmp(b));

    let (bandwidth, points) = match estimate_bandwidth(&samples) {
        Some(bandwidth) => (bandwidth, sample_kde(&samples, bandwidth, DENSITY_STEPS)),
        None => (0.0, Vec::new()),
    };

    tracing::debug!(
        "Density for {} ({}): {} samples, bandwidth {:.4}",
        feature,
        filter.as_str(),
        samples.len(),
        bandwidth
    );

    Ok(DensityCurve {
        feature: feature.to_string(),
        population: filter,
        population_size,
        sample_size: samples.len(),
        bandwidth,
        points,
    })
}

/// Rule-of-thumb bandwidth, `1.06 * min(sd, IQR / 1.34) * n^(-1/5)`.
///
/// A zero spread falls back to the standard deviation, then |Q1|, then 1.
/// `sorted` must be ascending; `None` when it is empty.
pub fn estimate_bandwidth(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let n = sorted.len() as f64;
    let q1 = quantile(sorted, 0.25);
    let q3 = quantile(sorted, 0.75);
    let iqr_scale = (q3 - q1) / 1.34;
    let deviation = sample_deviation(sorted);

    let spread = [deviation.map(|d| d.min(iqr_scale)), deviation, Some(q1.abs())]
        .into_iter()
        .flatten()
        .find(|v| *v > 0.0 && v.is_finite())
        .unwrap_or(1.0);

    Some(1.06 * spread * n.powf(-0.2))
}

/// Evaluate the Gaussian KDE on `steps` evenly spaced points over the extent.
pub fn sample_kde(sorted: &[f64], bandwidth: f64, steps: usize) -> Vec<DensityPoint> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };

    if max <= min || steps < 2 {
        return vec![DensityPoint {
            value: min,
            density: kde(sorted, bandwidth, min),
        }];
    }

    let step = (max - min) / (steps - 1) as f64;
    (0..steps)
        .map(|i| {
            let value = min + step * i as f64;
            DensityPoint {
                value,
                density: kde(sorted, bandwidth, value),
            }
        })
        .collect()
}

fn kde(samples: &[f64], bandwidth: f64, x: f64) -> f64 {
    let norm = 1.0 / ((2.0 * PI).sqrt() * bandwidth * samples.len() as f64);
    samples
        .iter()
        .map(|s| {
            let z = (x - s) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum::<f64>()
        * norm
}

/// Linear-interpolated quantile of ascending data
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Standard deviation with n - 1 denominator; `None` below two samples.
fn sample_deviation(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
