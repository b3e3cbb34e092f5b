//! Page chrome: title, background, two-column layout and controls.

use std::fmt::Write;

use super::{escape, format_number};
use crate::constants::APP_TITLE;
use crate::data::{FeatureTable, FeatureView};
use crate::density::PopulationFilter;

const CUSTOM_CSS: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", sans-serif; color: #262730; }
.stApp { background-color: #fcf7c9; min-height: 100vh; padding: 1.5rem 2.5rem; box-sizing: border-box; }
.columns { display: grid; grid-template-columns: 3fr 7fr; gap: 2rem; }
.panel { display: flex; flex-direction: column; gap: 1.5rem; }
.client-data { border-collapse: collapse; font-size: 0.85rem; width: 100%; }
.client-data td, .client-data th { border-bottom: 1px solid #e6e1b0; padding: 2px 6px; text-align: left; }
.client-data td.value { text-align: right; font-variant-numeric: tabular-nums; }
.controls label { display: block; margin: 0.75rem 0 0.25rem; }
.controls input, .controls select { width: 100%; padding: 4px; }
.error { padding: 1rem 1.5rem; background: #ffe0e0; border-left: 4px solid #d00; border-radius: 6px; }
"#;

/// Everything one rendering pass produces
pub struct DashboardPage<'a> {
    pub table: &'a FeatureTable,
    pub client_id: usize,
    pub features: FeatureView<'a>,
    pub population: PopulationFilter,
    pub feature: &'a str,
    pub decision_html: String,
    pub waterfall_svg: String,
    pub density_svg: String,
}

impl DashboardPage<'_> {
    pub fn render(&self) -> String {
        let mut left = String::new();
        left.push_str(&controls(
            self.table,
            &self.client_id.to_string(),
            self.population,
            self.feature,
        ));
        left.push_str(&client_table(&self.features));

        let right = format!(
            r#"<section class="decision-panel">{}</section>
<section class="waterfall-panel"><h3>Importance des variables</h3>{}</section>
<section class="density-panel"><h3>{} ({})</h3>{}</section>"#,
            self.decision_html,
            self.waterfall_svg,
            escape(self.feature),
            self.population.display_name(),
            self.density_svg,
        );

        layout(&left, &right)
    }
}

/// Page shown when a rendering pass fails. Nothing of the pass is kept.
pub fn error_page(status: u16, message: &str) -> String {
    let body = format!(
        r#"<div class="error"><strong>Erreur {status}</strong><p>{}</p><p><a href="/">Retour</a></p></div>"#,
        escape(message)
    );
    layout(&body, "")
}

fn layout(left: &str, right: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="icon" href="data:,">
<style>{CUSTOM_CSS}</style>
</head>
<body>
<div class="stApp">
<h1>Dashboard</h1>
<div class="columns">
<div class="panel">{left}</div>
<div class="panel">{right}</div>
</div>
</div>
</body>
</html>
"#,
        title = escape(APP_TITLE),
    )
}

fn controls(
    table: &FeatureTable,
    client_id: &str,
    population: PopulationFilter,
    feature: &str,
) -> String {
    let mut html = String::from(r#"<form class="controls" method="get" action="/">"#);
    let _ = write!(
        html,
        r#"<label for="id">Entrez l'id de l'utilisateur : </label><input id="id" name="id" value="{}" inputmode="numeric">"#,
        escape(client_id)
    );

    html.push_str(
        r#"<label for="population">Choisissez une population à afficher :</label><select id="population" name="population" onchange="this.form.submit()">"#,
    );
    for filter in PopulationFilter::ALL_FILTERS {
        let _ = write!(
            html,
            r#"<option value="{}"{}>{}</option>"#,
            filter.as_str(),
            if filter == population { " selected" } else { "" },
            filter.display_name()
        );
    }
    html.push_str("</select>");

    html.push_str(
        r#"<label for="feature">Choisissez une variable à afficher :</label><select id="feature" name="feature" onchange="this.form.submit()">"#,
    );
    for name in table.feature_names() {
        let name = escape(name);
        let selected = if name == escape(feature) { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{name}"{selected}>{name}</option>"#);
    }
    html.push_str(r#"</select><noscript><button type="submit">Afficher</button></noscript></form><hr>"#);
    html
}

/// Client features, one row per feature
fn client_table(features: &FeatureView<'_>) -> String {
    let mut html = String::from(r#"<table class="client-data"><tbody>"#);
    for (name, value) in features.iter() {
        let _ = write!(
            html,
            r#"<tr><th>{}</th><td class="value">{}</td></tr>"#,
            escape(name),
            value.map(format_number).unwrap_or_else(|| "None".to_string())
        );
    }
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FeatureTable {
        FeatureTable::from_reader("A;B<x>;TARGET\n1;;0\n2;3;1\n".as_bytes()).unwrap()
    }

    #[test]
    fn test_page_contains_sections() {
        let table = table();
        let page = DashboardPage {
            table: &table,
            client_id: 1,
            features: table.features(1).unwrap(),
            population: PopulationFilter::Eligible,
            feature: "A",
            decision_html: "<div>decision</div>".to_string(),
            waterfall_svg: "<svg>w</svg>".to_string(),
            density_svg: "<svg>d</svg>".to_string(),
        }
        .render();

        assert!(page.contains("<title>Dashboard - Prêt à dépenser</title>"));
        assert!(page.contains("#fcf7c9"));
        assert!(page.contains("<div>decision</div>"));
        assert!(page.contains(r#"<option value="eligible" selected>Eligibles</option>"#));
        assert!(page.contains(r#"<option value="A" selected>A</option>"#));
        // Header names are escaped
        assert!(page.contains("B&lt;x&gt;"));
        assert!(!page.contains("TARGET"));
    }

    #[test]
    fn test_missing_value_displayed() {
        let table = table();
        let html = client_table(&table.features(0).unwrap());
        assert!(html.contains(r#"<th>A</th><td class="value">1</td>"#));
        assert!(html.contains(r#"<td class="value">None</td>"#));
    }

    #[test]
    fn test_error_page() {
        let page = error_page(502, "Request failed with status 500, <internal error>");
        assert!(page.contains("Erreur 502"));
        assert!(page.contains("&lt;internal error&gt;"));
        assert!(!page.contains("<svg"));
    }
}
