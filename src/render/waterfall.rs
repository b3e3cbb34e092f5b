//! Waterfall chart (SVG) of feature attributions

use std::fmt::Write;

use super::{escape, format_number, LinearScale};
use crate::explain::Waterfall;

const WIDTH: f64 = 720.0;
const ROW_HEIGHT: f64 = 30.0;
const LABEL_WIDTH: f64 = 230.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const POSITIVE_COLOR: &str = "#ff0051";
const NEGATIVE_COLOR: &str = "#008bfb";

/// Horizontal waterfall: most important feature on top, base value at the
/// bottom axis, model output at the top.
pub fn waterfall_chart(waterfall: &Waterfall) -> String {
    let rows = waterfall.steps.len();
    let height = MARGIN_TOP + rows as f64 * ROW_HEIGHT + MARGIN_BOTTOM;
    let bottom = height - MARGIN_BOTTOM;

    let (lo, hi) = waterfall
        .steps
        .iter()
        .flat_map(|s| [s.start, s.end])
        .fold((waterfall.base_value, waterfall.base_value), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let pad = (hi - lo) * 0.05;
    let x = LinearScale::new((lo - pad, hi + pad), (LABEL_WIDTH, WIDTH - MARGIN_RIGHT));

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="waterfall-chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {height}" width="100%" role="img" aria-label="{}">"#,
        escape(&format!("Explication du client {}", waterfall.client_id)),
    );
    svg.push_str(r##"<g font-size="12" font-family="sans-serif" fill="#333">"##);

    // Last applied step is drawn on the top row
    for (row, step) in waterfall.steps.iter().rev().enumerate() {
        let top = MARGIN_TOP + row as f64 * ROW_HEIGHT;
        let mid = top + ROW_HEIGHT / 2.0;
        let (x0, x1) = (x.map(step.start.min(step.end)), x.map(step.start.max(step.end)));
        let color = if step.contribution >= 0.0 { POSITIVE_COLOR } else { NEGATIVE_COLOR };

        let label = match step.feature_value {
            Some(value) => format!("{} = {}", step.label, format_number(value)),
            None => step.label.clone(),
        };
        let sign = if step.contribution >= 0.0 { "+" } else { "" };

        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            LABEL_WIDTH - 8.0,
            mid + 4.0,
            escape(&label)
        );
        let _ = write!(
            svg,
            r#"<rect class="waterfall-bar" x="{x0:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}"/>"#,
            top + 4.0,
            (x1 - x0).max(1.0),
            ROW_HEIGHT - 8.0,
        );
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.1}" fill="{color}">{sign}{}</text>"#,
            x1 + 4.0,
            mid + 4.0,
            format_number(step.contribution)
        );
    }

    // Base value along the bottom, model output along the top
    let base_x = x.map(waterfall.base_value);
    let output_x = x.map(waterfall.prediction);
    let _ = write!(
        svg,
        r##"<line x1="{LABEL_WIDTH}" y1="{bottom}" x2="{right}" y2="{bottom}" stroke="#888"/><line x1="{base_x:.2}" y1="{MARGIN_TOP}" x2="{base_x:.2}" y2="{bottom}" stroke="#bbb" stroke-dasharray="2,2"/><text x="{base_x:.2}" y="{:.1}" text-anchor="middle">E[f(X)] = {}</text>"##,
        bottom + 18.0,
        format_number(waterfall.base_value),
        right = WIDTH - MARGIN_RIGHT,
    );
    let _ = write!(
        svg,
        r##"<line x1="{output_x:.2}" y1="{MARGIN_TOP}" x2="{output_x:.2}" y2="{bottom}" stroke="#bbb" stroke-dasharray="2,2"/><text x="{output_x:.2}" y="{:.1}" text-anchor="middle">f(x) = {}</text>"##,
        MARGIN_TOP - 10.0,
        format_number(waterfall.prediction),
    );

    svg.push_str("</g></svg>");
    svg
}
