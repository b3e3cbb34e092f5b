use std::cmp::Ordering;

use super::store::ExplanationError;
use super::types::{Explanation, Waterfall, WaterfallStep};

/// Bars shown before the remaining features are folded into one.
pub const MAX_DISPLAY: usize = 10;

/// Lay out a waterfall for one client.
///
/// Features are ranked by absolute attribution. With more than `max_display`
/// features, the top `max_display - 1` keep their own bar and the rest are
/// summed into an "N other features" bar, applied first.
pub fn build(
    client_id: usize,
    explanation: &Explanation,
    max_display: usize,
) -> Result<Waterfall, ExplanationError> {
    if explanation.values.len() != explanation.feature_names.len() {
        return Err(ExplanationError::Malformed {
            id: client_id,
            reason: format!(
                "{} attributions for {} features",
                explanation.values.len(),
                explanation.feature_names.len()
            ),
        });
    }

    let mut ranked: Vec<usize> = (0..explanation.values.len()).collect();
    ranked.sort_by(|&a, &b| {
        explanation.values[b]
            .abs()
            .partial_cmp(&explanation.values[a].abs())
            .unwrap_or(Ordering::Equal)
    });

    let max_display = max_display.max(1);
    let (shown, folded) = if ranked.len() > max_display {
        ranked.split_at(max_display - 1)
    } else {
        (&ranked[..], &[][..])
    };

    // (label, feature value, contribution), least important first
    let mut bars: Vec<(String, Option<f64>, f64)> = Vec::with_capacity(shown.len() + 1);
    if !folded.is_empty() {
        let rest: f64 = folded.iter().map(|&i| explanation.values[i]).sum();
        bars.push((format!("{} other features", folded.len()), None, rest));
    }
    bars.extend(shown.iter().rev().map(|&i| {
        (
            explanation.feature_names[i].clone(),
            explanation.data.get(i).copied().flatten(),
            explanation.values[i],
        )
    }));

    let mut position = explanation.base_value;
    let steps = bars
        .into_iter()
        .map(|(label, feature_value, contribution)| {
            let start = position;
            position += contribution;
            WaterfallStep {
                label,
                feature_value,
                contribution,
                start,
                end: position,
            }
        })
        .collect();

    Ok(Waterfall {
        client_id,
        base_value: explanation.base_value,
        prediction: position,
        steps,
    })
}
