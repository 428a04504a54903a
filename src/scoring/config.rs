use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::asset::Marketplace;

/// Default distress buckets: days since the owner's last update -> axis score.
pub const DEFAULT_DISTRESS_BUCKETS: [(&str, f64); 6] = [
    ("<90", 1.0),
    ("90-179", 2.5),
    ("180-364", 4.5),
    ("365-729", 6.5),
    ("730-1094", 8.5),
    (">=1095", 10.0),
];

/// Distress axis when the last update date is unknown.
pub const DEFAULT_UNKNOWN_STALENESS: f64 = 5.0;

/// Rating assumed when a listing has none.
pub const DEFAULT_RATING: f64 = 3.5;

/// Valuation band half-width, in multiples of annual revenue.
pub const DEFAULT_VALUATION_SPREAD: f64 = 1.0;

/// Valuation band used for assets with no revenue.
pub const DEFAULT_FLOOR_LOW: f64 = 10_000.0;
pub const DEFAULT_FLOOR_HIGH: f64 = 50_000.0;

/// Scoring overrides.
///
/// Every field is optional; missing fields fall back to the built-in
/// defaults, so an empty config scores exactly like [`ScoringConfig::default`].
///
/// Example YAML:
/// ```yaml
/// scoring:
///   distress_buckets:
///     - { range: "<180", score: 1 }
///     - { range: "180-729", score: 5 }
///     - { range: ">=730", score: 9 }
///   default_rating: 3.0
///   technical_risk:
///     chrome_extension: 8
///   valuation:
///     spread: 0.5
///     floor_low: 5000
///     floor_high: 25000
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Staleness buckets, first match wins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distress_buckets: Option<Vec<DistressBucket>>,

    /// Distress axis when the last update date is unknown (default: 5.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_staleness: Option<f64>,

    /// Rating assumed for unrated listings (default: 3.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rating: Option<f64>,

    /// Per-marketplace technical risk overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical_risk: Option<HashMap<Marketplace, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valuation: Option<ValuationConfig>,
}

/// Maps a day-count range to a distress score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DistressBucket {
    /// Range expression in days (e.g., "<90", "90-179", ">=1095")
    pub range: String,

    /// Distress axis value, 0-10
    pub score: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ValuationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_low: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_high: Option<f64>,
}

impl ScoringConfig {
    /// Config with every default written out, for `init`.
    pub fn explicit_defaults() -> Self {
        Self {
            distress_buckets: Some(default_distress_buckets()),
            unknown_staleness: Some(DEFAULT_UNKNOWN_STALENESS),
            default_rating: Some(DEFAULT_RATING),
            technical_risk: None,
            valuation: Some(ValuationConfig {
                spread: Some(DEFAULT_VALUATION_SPREAD),
                floor_low: Some(DEFAULT_FLOOR_LOW),
                floor_high: Some(DEFAULT_FLOOR_HIGH),
            }),
        }
    }

    pub fn distress_buckets(&self) -> Vec<DistressBucket> {
        self.distress_buckets
            .clone()
            .unwrap_or_else(default_distress_buckets)
    }

    pub fn unknown_staleness(&self) -> f64 {
        self.unknown_staleness.unwrap_or(DEFAULT_UNKNOWN_STALENESS)
    }

    pub fn default_rating(&self) -> f64 {
        self.default_rating.unwrap_or(DEFAULT_RATING)
    }

    /// Technical risk for a marketplace, honouring overrides.
    pub fn technical_risk_for(&self, marketplace: Marketplace) -> f64 {
        self.technical_risk
            .as_ref()
            .and_then(|overrides| overrides.get(&marketplace).copied())
            .unwrap_or_else(|| default_technical_risk(marketplace))
    }

    pub fn valuation_spread(&self) -> f64 {
        self.valuation
            .as_ref()
            .and_then(|v| v.spread)
            .unwrap_or(DEFAULT_VALUATION_SPREAD)
    }

    pub fn valuation_floor(&self) -> (f64, f64) {
        let v = self.valuation.as_ref();
        (
            v.and_then(|v| v.floor_low).unwrap_or(DEFAULT_FLOOR_LOW),
            v.and_then(|v| v.floor_high).unwrap_or(DEFAULT_FLOOR_HIGH),
        )
    }
}

pub fn default_distress_buckets() -> Vec<DistressBucket> {
    DEFAULT_DISTRESS_BUCKETS
        .iter()
        .map(|(range, score)| DistressBucket {
            range: range.to_string(),
            score: *score,
        })
        .collect()
}

/// Platform risk constants. Browser extensions carry the Manifest V3
/// migration; Atlassian carries the Connect to Forge move.
pub fn default_technical_risk(marketplace: Marketplace) -> f64 {
    match marketplace {
        Marketplace::ChromeExtension => 7.0,
        Marketplace::FirefoxAddon => 6.0,
        Marketplace::ShopifyApp => 4.0,
        Marketplace::WordpressPlugin => 3.0,
        Marketplace::SlackApp => 4.0,
        Marketplace::ZapierIntegration => 3.5,
        Marketplace::AtlassianApp => 4.5,
        Marketplace::SalesforceApp => 5.0,
        Marketplace::HubspotApp => 3.5,
        Marketplace::NotionIntegration => 3.5,
        Marketplace::FigmaPlugin => 3.5,
        Marketplace::VscodeExtension => 3.0,
        Marketplace::IosApp => 5.5,
        Marketplace::AndroidApp => 5.5,
        Marketplace::MicrosoftApp => 4.0,
        Marketplace::GumroadProduct => 2.0,
        Marketplace::SaasProduct => 4.0,
        Marketplace::SaasForSale => 4.0,
        Marketplace::Other => 5.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accessors() {
        let config = ScoringConfig::default();
        assert_eq!(config.distress_buckets().len(), 6);
        assert_eq!(config.unknown_staleness(), 5.0);
        assert_eq!(config.default_rating(), 3.5);
        assert_eq!(config.valuation_spread(), 1.0);
        assert_eq!(config.valuation_floor(), (10_000.0, 50_000.0));
        assert_eq!(config.technical_risk_for(Marketplace::ChromeExtension), 7.0);
    }

    #[test]
    fn test_explicit_defaults_match_implicit() {
        let explicit = ScoringConfig::explicit_defaults();
        let implicit = ScoringConfig::default();
        assert_eq!(explicit.distress_buckets(), implicit.distress_buckets());
        assert_eq!(explicit.valuation_floor(), implicit.valuation_floor());
        assert_eq!(explicit.valuation_spread(), implicit.valuation_spread());
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::explicit_defaults();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
default_rating: 3.0
technical_risk:
  chrome: 9
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.default_rating(), 3.0);
        assert_eq!(config.technical_risk_for(Marketplace::ChromeExtension), 9.0);
        assert_eq!(config.technical_risk_for(Marketplace::ShopifyApp), 4.0);
        assert!(config.distress_buckets.is_none());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("base_score: 100");
        assert!(result.is_err());
    }

    #[test]
    fn test_valuation_partial_override() {
        let yaml = r#"
valuation:
  floor_low: 5000
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.valuation_floor(), (5000.0, 50_000.0));
        assert_eq!(config.valuation_spread(), 1.0);
    }
}
