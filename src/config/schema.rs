use serde::{Deserialize, Serialize};

use crate::scoring::{AccessTier, ScoringConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Subscription tier the viewer holds
    #[serde(default)]
    pub tier: AccessTier,

    /// Reveal credits available for one-off unlocks
    #[serde(default)]
    pub reveal_credits: u32,

    /// Glob patterns for catalog files (YAML or JSON)
    #[serde(default)]
    pub catalogs: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.tier, AccessTier::Free);
        assert_eq!(config.reveal_credits, 0);
        assert!(config.catalogs.is_empty());
        assert!(config.scoring.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
tier: hunter
reveal_credits: 3
catalogs:
  - "~/assets/*.yaml"
scoring:
  default_rating: 3.0
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.tier, AccessTier::Hunter);
        assert_eq!(config.reveal_credits, 3);
        assert_eq!(config.catalogs.len(), 1);
        assert_eq!(config.scoring.unwrap().default_rating, Some(3.0));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("tier: platinum");
        assert!(result.is_err());
    }
}
