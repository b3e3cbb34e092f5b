//! Render Module - HTML fragments and inline SVG charts
//!
//! - `decision` - accept/reject badge
//! - `waterfall` - attribution chart
//! - `density` - population density with the client's marker
//! - `page` - page chrome and layout

pub mod decision;
pub mod density;
pub mod page;
pub mod waterfall;

/// Escape text for HTML/SVG content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Short numeric label: integers without decimals, otherwise up to 3 decimals.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Affine map from a data interval onto a pixel interval
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// A degenerate domain is widened so every value still maps inside the range.
    pub fn new(mut domain: (f64, f64), range: (f64, f64)) -> Self {
        if !(domain.1 > domain.0) {
            let pad = if domain.0 == 0.0 { 1.0 } else { domain.0.abs() * 0.1 };
            domain = (domain.0 - pad, domain.0 + pad);
        }
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Evenly spaced tick values across the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let count = count.max(2);
        let step = (self.domain.1 - self.domain.0) / (count - 1) as f64;
        (0..count).map(|i| self.domain.0 + step * i as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(24.0), "24");
        assert_eq!(format_number(0.08), "0.08");
        assert_eq!(format_number(-315.4213), "-315.421");
        assert_eq!(format_number(-0.0001), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_scale() {
        let scale = LinearScale::new((0.0, 10.0), (100.0, 200.0));
        assert_eq!(scale.map(5.0), 150.0);

        // Degenerate domain still maps into the range
        let scale = LinearScale::new((2.0, 2.0), (0.0, 100.0));
        assert!((scale.map(2.0) - 50.0).abs() < 1e-9);
        assert_eq!(scale.ticks(5).len(), 5);
    }
}
