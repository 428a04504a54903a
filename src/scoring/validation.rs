use super::config::ScoringConfig;
use super::factors::RangeOp;

/// Staleness sweep used to check bucket coverage and ordering (~10 years).
const SWEEP_DAYS: u64 = 3650;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Validate distress buckets
    if let Some(ref buckets) = config.distress_buckets {
        let mut parsed = Vec::new();
        for (i, bucket) in buckets.iter().enumerate() {
            match RangeOp::parse(&bucket.range) {
                Ok(range) => parsed.push((range, bucket.score)),
                Err(e) => errors.push(format!(
                    "scoring.distress_buckets[{}].range: invalid '{}' - {}",
                    i, bucket.range, e
                )),
            }
            if !in_axis_range(bucket.score) {
                errors.push(format!(
                    "scoring.distress_buckets[{}].score: {} is outside 0-10",
                    i, bucket.score
                ));
            }
        }

        // Only check coverage when every bucket parsed; otherwise the
        // sweep would report gaps caused by the syntax errors above.
        if parsed.len() == buckets.len() {
            errors.extend(check_bucket_sweep(&parsed));
        }
    }

    if let Some(unknown) = config.unknown_staleness {
        if !in_axis_range(unknown) {
            errors.push(format!(
                "scoring.unknown_staleness: {} is outside 0-10",
                unknown
            ));
        }
    }

    if let Some(rating) = config.default_rating {
        if !(rating.is_finite() && (0.0..=5.0).contains(&rating)) {
            errors.push(format!("scoring.default_rating: {} is outside 0-5", rating));
        }
    }

    if let Some(ref overrides) = config.technical_risk {
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort_by_key(|(marketplace, _)| **marketplace);
        for (marketplace, risk) in entries {
            if !in_axis_range(*risk) {
                errors.push(format!(
                    "scoring.technical_risk.{}: {} is outside 0-10",
                    marketplace, risk
                ));
            }
        }
    }

    // Validate valuation
    if let Some(ref valuation) = config.valuation {
        if let Some(spread) = valuation.spread {
            if !(spread.is_finite() && spread > 0.0 && spread < 2.5) {
                errors.push(format!(
                    "scoring.valuation.spread: {} must be greater than 0 and less than 2.5",
                    spread
                ));
            }
        }
        let (low, high) = config.valuation_floor();
        if !(low.is_finite() && low > 0.0) {
            errors.push(format!(
                "scoring.valuation.floor_low: {} must be positive",
                low
            ));
        }
        if !(high.is_finite() && high > low) {
            errors.push(format!(
                "scoring.valuation.floor_high: {} must be greater than floor_low ({})",
                high, low
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn in_axis_range(value: f64) -> bool {
    value.is_finite() && (0.0..=10.0).contains(&value)
}

/// Walk every day count and make sure some bucket matches and the score
/// never drops as staleness grows. Reports the first problem of each kind.
fn check_bucket_sweep(buckets: &[(RangeOp, f64)]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut previous: Option<f64> = None;
    let mut gap_reported = false;
    let mut drop_reported = false;

    for days in 0..=SWEEP_DAYS {
        let score = buckets
            .iter()
            .find(|(range, _)| range.matches(days))
            .map(|(_, score)| *score);

        match score {
            None if !gap_reported => {
                errors.push(format!(
                    "scoring.distress_buckets: no bucket matches {} days since update",
                    days
                ));
                gap_reported = true;
            }
            Some(score) => {
                if let Some(prev) = previous {
                    if score < prev && !drop_reported {
                        errors.push(format!(
                            "scoring.distress_buckets: score drops from {} to {} at {} days; distress must not decrease with staleness",
                            prev, score, days
                        ));
                        drop_reported = true;
                    }
                }
                previous = Some(score);
            }
            None => {}
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Marketplace;
    use crate::scoring::{DistressBucket, ValuationConfig};
    use std::collections::HashMap;

    fn bucket(range: &str, score: f64) -> DistressBucket {
        DistressBucket {
            range: range.to_string(),
            score,
        }
    }

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
        assert!(validate_scoring(&ScoringConfig::explicit_defaults()).is_ok());
    }

    #[test]
    fn test_invalid_bucket_range() {
        let config = ScoringConfig {
            distress_buckets: Some(vec![bucket("soon", 5.0)]),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.distress_buckets[0].range"));
    }

    #[test]
    fn test_bucket_score_out_of_range() {
        let config = ScoringConfig {
            distress_buckets: Some(vec![bucket(">=0", 11.0)]),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.distress_buckets[0].score"));
    }

    #[test]
    fn test_bucket_gap_reported() {
        let config = ScoringConfig {
            distress_buckets: Some(vec![bucket("<90", 1.0), bucket(">=180", 6.0)]),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no bucket matches 90 days"));
    }

    #[test]
    fn test_bucket_decrease_reported() {
        let config = ScoringConfig {
            distress_buckets: Some(vec![bucket("<365", 8.0), bucket(">=365", 2.0)]),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at 365 days"));
    }

    #[test]
    fn test_rating_and_risk_ranges() {
        let mut overrides = HashMap::new();
        overrides.insert(Marketplace::ChromeExtension, 12.0);
        let config = ScoringConfig {
            default_rating: Some(6.0),
            technical_risk: Some(overrides),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("default_rating"));
        assert!(errors[1].contains("technical_risk.chrome_extension"));
    }

    #[test]
    fn test_invalid_valuation() {
        let config = ScoringConfig {
            valuation: Some(ValuationConfig {
                spread: Some(3.0),
                floor_low: Some(50_000.0),
                floor_high: Some(10_000.0),
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("spread"));
        assert!(errors[1].contains("floor_high"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            distress_buckets: Some(vec![bucket("bad", 1.0)]),
            unknown_staleness: Some(-1.0),
            default_rating: Some(9.0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
