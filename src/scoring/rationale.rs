use serde::{Deserialize, Serialize};

use super::content::{group_digits, HIGH};
use super::radar::RadarScore;
use crate::asset::{AssetSignals, DistressSignal};

/// Why an axis scored the way it did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRationale {
    pub axis: String,
    pub score: f64,
    pub rationale: String,
    pub evidence: String,
}

/// One rationale line per radar axis, in display order.
pub fn explain(
    score: &RadarScore,
    signals: &AssetSignals,
    days_since_update: Option<u64>,
) -> Vec<AxisRationale> {
    vec![
        AxisRationale {
            axis: "Distress".to_string(),
            score: score.distress,
            rationale: banded(
                score.distress,
                "High distress signals detected",
                "Moderate distress indicators",
                "Low distress - actively maintained",
            ),
            evidence: staleness_evidence(days_since_update),
        },
        AxisRationale {
            axis: "Monetization Gap".to_string(),
            score: score.monetization_gap,
            rationale: banded(
                score.monetization_gap,
                "Significant untapped revenue potential",
                "Moderate monetization opportunity",
                "Already well-monetized",
            ),
            evidence: user_evidence(signals),
        },
        AxisRationale {
            axis: "Technical Risk".to_string(),
            score: score.technical_risk,
            // Lower is better on this axis
            rationale: if score.technical_risk <= 3.0 {
                "Low technical risk - minimal work needed"
            } else if score.technical_risk <= 6.0 {
                "Moderate technical updates needed"
            } else {
                "High technical migration required"
            }
            .to_string(),
            evidence: platform_evidence(signals),
        },
        AxisRationale {
            axis: "Market Position".to_string(),
            score: score.market_position,
            rationale: banded(
                score.market_position,
                "Strong category position with moat",
                "Established but competitive",
                "Weak market position",
            ),
            evidence: rating_evidence(signals.clamped_rating()),
        },
        AxisRationale {
            axis: "Flip Potential".to_string(),
            score: score.flip_potential,
            rationale: banded(
                score.flip_potential,
                "Quick value creation opportunity",
                "Moderate flip potential",
                "Long-term hold required",
            ),
            evidence: if score.distress >= HIGH && score.monetization_gap >= HIGH {
                "High distress + monetization gap = quick wins available"
            } else if score.distress >= 5.0 && score.monetization_gap >= 5.0 {
                "Moderate opportunity with effort"
            } else {
                "Requires significant development"
            }
            .to_string(),
        },
    ]
}

fn banded(value: f64, high: &str, moderate: &str, low: &str) -> String {
    if value >= HIGH {
        high
    } else if value >= 4.0 {
        moderate
    } else {
        low
    }
    .to_string()
}

fn staleness_evidence(days_since_update: Option<u64>) -> String {
    let Some(days) = days_since_update else {
        return "Update history unavailable".to_string();
    };
    let months = days / 30;
    if months >= 24 {
        format!("No updates in {}+ years", months / 12)
    } else if months >= 12 {
        "Last updated over a year ago".to_string()
    } else if months >= 6 {
        format!("Last updated {} months ago", months)
    } else {
        "Recently updated".to_string()
    }
}

fn user_evidence(signals: &AssetSignals) -> String {
    let users = signals.user_count;
    if users == 0 {
        "User count unavailable".to_string()
    } else if users >= 50_000 && signals.mrr() <= 0.0 {
        format!("{} users with no reported revenue", group_digits(users))
    } else if users >= 10_000 {
        format!("{} users - room to grow", group_digits(users))
    } else {
        format!("{} users", group_digits(users))
    }
}

fn platform_evidence(signals: &AssetSignals) -> String {
    if signals.distress_signals.contains(&DistressSignal::ManifestV2) {
        "Manifest V2 - migration to V3 required".to_string()
    } else if signals.marketplace.is_browser_extension() {
        "Browser extension - check manifest version".to_string()
    } else {
        format!("{} platform requirements", signals.marketplace.display_name())
    }
}

fn rating_evidence(rating: Option<f64>) -> String {
    match rating {
        None => "Rating unavailable".to_string(),
        Some(r) if r >= 4.5 => format!("{:.1} rating - excellent reputation", r),
        Some(r) if r >= 4.0 => format!("{:.1} rating - good reputation", r),
        Some(r) if r >= 3.5 => format!("{:.1} rating - mixed reviews", r),
        Some(r) => format!("{:.1} rating - needs improvement", r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Marketplace;

    #[test]
    fn test_explain_covers_all_axes() {
        let signals = AssetSignals::new(Marketplace::ShopifyApp);
        let score = RadarScore::new(5.0, 5.0, 5.0, 5.0, 5.0);
        let lines = explain(&score, &signals, None);
        let axes: Vec<&str> = lines.iter().map(|l| l.axis.as_str()).collect();
        assert_eq!(
            axes,
            vec!["Distress", "Monetization Gap", "Technical Risk", "Market Position", "Flip Potential"]
        );
    }

    #[test]
    fn test_staleness_evidence() {
        assert_eq!(staleness_evidence(None), "Update history unavailable");
        assert_eq!(staleness_evidence(Some(20)), "Recently updated");
        assert_eq!(staleness_evidence(Some(200)), "Last updated 6 months ago");
        assert_eq!(staleness_evidence(Some(400)), "Last updated over a year ago");
        assert_eq!(staleness_evidence(Some(913)), "No updates in 2+ years");
    }

    #[test]
    fn test_rating_evidence_bands() {
        assert_eq!(rating_evidence(Some(4.7)), "4.7 rating - excellent reputation");
        assert_eq!(rating_evidence(Some(4.2)), "4.2 rating - good reputation");
        assert_eq!(rating_evidence(Some(3.6)), "3.6 rating - mixed reviews");
        assert_eq!(rating_evidence(Some(2.0)), "2.0 rating - needs improvement");
    }

    #[test]
    fn test_user_evidence() {
        let mut signals = AssetSignals::new(Marketplace::WordpressPlugin);
        assert_eq!(user_evidence(&signals), "User count unavailable");
        signals.user_count = 89_000;
        assert_eq!(user_evidence(&signals), "89,000 users with no reported revenue");
        signals.estimated_mrr = 900.0;
        assert_eq!(user_evidence(&signals), "89,000 users - room to grow");
    }

    #[test]
    fn test_technical_risk_uses_inverse_bands() {
        let signals = AssetSignals::new(Marketplace::WordpressPlugin);
        let low = explain(&RadarScore::new(0.0, 0.0, 3.0, 0.0, 0.0), &signals, None);
        assert_eq!(low[2].rationale, "Low technical risk - minimal work needed");
        let high = explain(&RadarScore::new(0.0, 0.0, 7.5, 0.0, 0.0), &signals, None);
        assert_eq!(high[2].rationale, "High technical migration required");
    }

    #[test]
    fn test_manifest_v2_evidence() {
        let mut signals = AssetSignals::new(Marketplace::ChromeExtension);
        assert_eq!(platform_evidence(&signals), "Browser extension - check manifest version");
        signals.distress_signals.push(DistressSignal::ManifestV2);
        assert_eq!(platform_evidence(&signals), "Manifest V2 - migration to V3 required");
    }

    #[test]
    fn test_flip_evidence() {
        let signals = AssetSignals::new(Marketplace::Other);
        let lines = explain(&RadarScore::new(8.0, 9.0, 3.0, 6.0, 8.0), &signals, Some(900));
        assert_eq!(lines[4].evidence, "High distress + monetization gap = quick wins available");
    }
}
