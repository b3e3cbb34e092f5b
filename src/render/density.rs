//! Density chart (SVG) with the client marker

use std::fmt::Write;

use super::{escape, format_number, LinearScale};
use crate::density::DensityCurve;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 45.0;

/// Density area under its curve, with a dashed rule at `reference`.
///
/// The x domain spans both the curve and the reference value. No rule is drawn
/// for a missing reference.
pub fn density_chart(curve: &DensityCurve, reference: Option<f64>) -> String {
    let reference = reference.filter(|v| v.is_finite());

    let mut x_values = curve.points.iter().map(|p| p.value).chain(reference);
    let x_domain = match x_values.next() {
        Some(first) => x_values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))),
        None => (0.0, 1.0),
    };
    let y_max = curve
        .points
        .iter()
        .map(|p| p.density)
        .fold(0.0_f64, f64::max);

    let bottom = HEIGHT - MARGIN_BOTTOM;
    let x = LinearScale::new(x_domain, (MARGIN_LEFT, WIDTH - MARGIN_RIGHT));
    let y = LinearScale::new((0.0, if y_max > 0.0 { y_max } else { 1.0 }), (bottom, MARGIN_TOP));

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="density-chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="100%" role="img" aria-label="{label}">"#,
        label = escape(&format!("Densité de {}", curve.feature)),
    );

    // Axes
    let _ = write!(
        svg,
        r##"<g stroke="#888" stroke-width="1"><line x1="{MARGIN_LEFT}" y1="{bottom}" x2="{right}" y2="{bottom}"/><line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{bottom}"/></g>"##,
        right = WIDTH - MARGIN_RIGHT,
    );
    svg.push_str(r##"<g font-size="11" fill="#444" font-family="sans-serif">"##);
    for tick in x.ticks(5) {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            x.map(tick),
            bottom + 16.0,
            format_number(tick)
        );
    }
    for tick in y.ticks(4) {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y.map(tick) + 4.0,
            format_number(tick)
        );
    }
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text><text x="14" y="{:.1}" text-anchor="middle" transform="rotate(-90 14 {:.1})">density</text></g>"#,
        (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
        HEIGHT - 6.0,
        escape(&curve.feature),
        (MARGIN_TOP + bottom) / 2.0,
        (MARGIN_TOP + bottom) / 2.0,
    );

    if !curve.points.is_empty() {
        let line: Vec<String> = curve
            .points
            .iter()
            .map(|p| format!("{:.2},{:.2}", x.map(p.value), y.map(p.density)))
            .collect();
        let first = x.map(curve.points[0].value);
        let last = x.map(curve.points[curve.points.len() - 1].value);

        let _ = write!(
            svg,
            r#"<path class="density-area" d="M{first:.2},{bottom:.2} L{} L{last:.2},{bottom:.2} Z" fill="steelblue" fill-opacity="0.35"/>"#,
            line.join(" L"),
        );
        let _ = write!(
            svg,
            r#"<path class="density-line" d="M{}" fill="none" stroke="blue" stroke-width="1.5"/>"#,
            line.join(" L"),
        );
    }

    if let Some(value) = reference {
        let rx = x.map(value);
        let _ = write!(
            svg,
            r#"<line class="density-rule" x1="{rx:.2}" y1="{MARGIN_TOP}" x2="{rx:.2}" y2="{bottom}" stroke="red" stroke-width="2" stroke-dasharray="5,5"/>"#,
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::{DensityPoint, PopulationFilter};

    fn curve(points: Vec<(f64, f64)>) -> DensityCurve {
        DensityCurve {
            feature: "EXT_SOURCE_1".to_string(),
            population: PopulationFilter::All,
            population_size: points.len(),
            sample_size: points.len(),
            bandwidth: 0.1,
            points: points
                .into_iter()
                .map(|(value, density)| DensityPoint { value, density })
                .collect(),
        }
    }

    #[test]
    fn test_layers() {
        let svg = density_chart(&curve(vec![(0.0, 0.1), (0.5, 0.8), (1.0, 0.2)]), Some(0.08));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"class="density-area""#));
        assert!(svg.contains(r#"class="density-line""#));
        assert_eq!(svg.matches(r#"class="density-rule""#).count(), 1);
        assert!(svg.contains(r#"stroke-dasharray="5,5""#));
    }

    #[test]
    fn test_reference_outside_extent_widens_domain() {
        let svg = density_chart(&curve(vec![(0.0, 0.1), (1.0, 0.2)]), Some(3.0));
        // The rule lands on the right edge of the plot
        let right = WIDTH - MARGIN_RIGHT;
        assert!(svg.contains(&format!(r#"x1="{right:.2}""#)));
    }

    #[test]
    fn test_missing_reference_has_no_rule() {
        let svg = density_chart(&curve(vec![(0.0, 0.1), (1.0, 0.2)]), None);
        assert!(!svg.contains("density-rule"));
    }

    #[test]
    fn test_empty_population() {
        let svg = density_chart(&curve(vec![]), Some(1.0));
        assert!(!svg.contains("density-area"));
        assert!(svg.contains("density-rule"));
    }
}
