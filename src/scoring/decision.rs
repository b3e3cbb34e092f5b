//! Accept/reject decision on top of a prediction.

use serde::Serialize;

use super::client::Prediction;
use crate::constants::DECISION_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Accept,
    Reject,
}

/// Decision shown to the advisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub verdict: Verdict,
    /// Repayment probability on accept, default probability on reject (0-100)
    pub percent: i64,
}

impl Decision {
    /// Threshold is inclusive. The reject percentage reads the negative-class
    /// probability as returned, not `1 - positive`.
    pub fn from_prediction(prediction: &Prediction) -> Self {
        if prediction.positive >= DECISION_THRESHOLD {
            Self {
                verdict: Verdict::Accept,
                percent: as_percent(prediction.positive),
            }
        } else {
            Self {
                verdict: Verdict::Reject,
                percent: as_percent(prediction.negative),
            }
        }
    }
}

fn as_percent(probability: f64) -> i64 {
    (probability * 100.0).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(positive: f64, negative: f64) -> Decision {
        Decision::from_prediction(&Prediction { positive, negative })
    }

    #[test]
    fn test_accept_above_threshold() {
        let d = decide(0.7, 0.3);
        assert_eq!(d.verdict, Verdict::Accept);
        assert_eq!(d.percent, 70);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let d = decide(0.6, 0.4);
        assert_eq!(d.verdict, Verdict::Accept);
        assert_eq!(d.percent, 60);
    }

    #[test]
    fn test_reject_below_threshold() {
        let d = decide(0.5, 0.5);
        assert_eq!(d.verdict, Verdict::Reject);
        assert_eq!(d.percent, 50);

        let d = decide(0.59999, 0.40001);
        assert_eq!(d.verdict, Verdict::Reject);
        assert_eq!(d.percent, 40);
    }

    #[test]
    fn test_reject_reads_negative_probability() {
        // Pair need not be complementary
        let d = decide(0.2, 0.55);
        assert_eq!(d.verdict, Verdict::Reject);
        assert_eq!(d.percent, 55);
    }

    #[test]
    fn test_percent_is_floored() {
        assert_eq!(decide(0.879, 0.121).percent, 87);
        assert_eq!(decide(0.1, 0.999).percent, 99);
        assert_eq!(decide(1.0, 0.0).percent, 100);
    }
}
