//! Accept/reject badge

use crate::scoring::{Decision, Verdict};

const ACCEPT_COLOR: &str = "green";
const REJECT_COLOR: &str = "red";

/// Badge colour, icon and sentence for a decision
pub fn decision_parts(decision: &Decision) -> (&'static str, &'static str, String) {
    match decision.verdict {
        Verdict::Accept => (
            ACCEPT_COLOR,
            "👌",
            format!(
                "Le crédit peut être accordé avec une probabilité de recouvrement de {}%",
                decision.percent
            ),
        ),
        Verdict::Reject => (
            REJECT_COLOR,
            "🖐",
            format!(
                "Le crédit ne devrait pas être accordé car il présente un risque de défaut de {}%",
                decision.percent
            ),
        ),
    }
}

/// Round coloured badge next to a text box
pub fn decision_badge(decision: &Decision) -> String {
    let (color, icon, text) = decision_parts(decision);
    format!(
        r#"<div class="decision" data-verdict="{verdict}" style="display: flex; align-items: center;">
    <div style="width: 75px; height: 75px; background-color: {color}; border-radius: 50%; margin-right: 10px; display: flex; justify-content: center; align-items: center; font-size: 35px;">{icon}</div>
    <div style="padding: 10px 20px; background-color: #f0f0f0; border-radius: 10px;">{text}</div>
</div>"#,
        verdict = match decision.verdict {
            Verdict::Accept => "accept",
            Verdict::Reject => "reject",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Prediction;

    #[test]
    fn test_accept_badge() {
        let decision = Decision::from_prediction(&Prediction { positive: 0.7, negative: 0.3 });
        let html = decision_badge(&decision);
        assert!(html.contains("background-color: green"));
        assert!(html.contains("recouvrement de 70%"));
        assert!(html.contains(r#"data-verdict="accept""#));
    }

    #[test]
    fn test_reject_badge() {
        let decision = Decision::from_prediction(&Prediction { positive: 0.5, negative: 0.45 });
        let html = decision_badge(&decision);
        assert!(html.contains("background-color: red"));
        assert!(html.contains("risque de défaut de 45%"));
    }
}
