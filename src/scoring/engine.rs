use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::ScoringConfig;
use super::content::{assess_opportunities, assess_risks, derive_content, DerivedContent};
use super::factors::{clamp_axis, clamp_unit, log_reach, RangeOp};
use super::radar::{compute_overall_score, RadarScore};
use super::rationale::{explain, AxisRationale};
use super::valuation::{self, MrrPotential, ValuationEstimate};
use crate::asset::{Asset, AssetSignals};

/// Everything the engine knows about one asset.
///
/// `content` is the ungated premium intelligence and is never serialized;
/// pass it through [`gate_content`](super::gate_content) before showing it.
#[derive(Debug, Clone, Serialize)]
pub struct AssetAnalysis {
    pub asset_id: String,
    pub radar: RadarScore,
    pub overall_score: u8,
    pub days_since_update: Option<u64>,
    pub valuation: ValuationEstimate,
    pub mrr_potential: MrrPotential,
    pub risks: Vec<String>,
    pub opportunities: Vec<String>,
    pub rationale: Vec<AxisRationale>,
    #[serde(skip)]
    pub content: DerivedContent,
}

/// Hunter Radar scoring.
///
/// Holds scoring config and the reference time staleness is measured from.
/// The engine never reads the clock itself, so identical inputs always give
/// identical results.
#[derive(Debug, Clone)]
pub struct HunterScoreEngine {
    config: ScoringConfig,
    distress_buckets: Vec<(RangeOp, f64)>,
    as_of: DateTime<Utc>,
}

impl HunterScoreEngine {
    /// Build an engine. Distress buckets that fail to parse are skipped;
    /// run [`validate_scoring`](super::validate_scoring) first to report them.
    pub fn new(config: ScoringConfig, as_of: DateTime<Utc>) -> Self {
        let distress_buckets = config
            .distress_buckets()
            .into_iter()
            .filter_map(|bucket| match RangeOp::parse(&bucket.range) {
                Ok(range) => Some((range, clamp_axis(bucket.score))),
                Err(e) => {
                    tracing::warn!(range = %bucket.range, error = %e, "skipping invalid distress bucket");
                    None
                }
            })
            .collect();

        Self {
            config,
            distress_buckets,
            as_of,
        }
    }

    pub fn with_defaults(as_of: DateTime<Utc>) -> Self {
        Self::new(ScoringConfig::default(), as_of)
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn compute_radar_score(&self, signals: &AssetSignals) -> RadarScore {
        let distress = self.distress(signals);
        let monetization_gap = monetization_gap(signals);
        let technical_risk = self.config.technical_risk_for(signals.marketplace);

        let rating = signals
            .clamped_rating()
            .unwrap_or_else(|| self.config.default_rating().clamp(0.0, 5.0));
        let rating_norm = clamp_unit(rating / 5.0);
        let reach = log_reach(signals.user_count, 6.0);

        let market_position = 10.0 * (0.6 * reach + 0.4 * rating_norm);
        let flip_potential = 0.3 * clamp_axis(distress)
            + 0.3 * clamp_axis(monetization_gap)
            + 10.0 * (0.25 * reach + 0.15 * rating_norm);

        RadarScore::new(
            distress,
            monetization_gap,
            technical_risk,
            market_position,
            flip_potential,
        )
    }

    pub fn compute_valuation(&self, signals: &AssetSignals, score: &RadarScore) -> ValuationEstimate {
        valuation::compute_valuation(signals, score, &self.config)
    }

    pub fn estimate_mrr_potential(&self, signals: &AssetSignals) -> MrrPotential {
        valuation::estimate_mrr_potential(signals)
    }

    /// Score an asset and derive every view of it.
    pub fn analyze(&self, asset: &Asset) -> AssetAnalysis {
        let signals = asset.signals();
        let radar = self.compute_radar_score(&signals);
        let overall_score = compute_overall_score(&radar);
        let days_since_update = signals.days_since_update(self.as_of);
        let valuation = self.compute_valuation(&signals, &radar);

        tracing::debug!(
            asset = %asset.id,
            overall = overall_score,
            distress = radar.distress,
            gap = radar.monetization_gap,
            "scored asset"
        );

        AssetAnalysis {
            asset_id: asset.id.clone(),
            radar,
            overall_score,
            days_since_update,
            mrr_potential: self.estimate_mrr_potential(&signals),
            risks: assess_risks(&signals, &radar),
            opportunities: assess_opportunities(&signals, &radar),
            rationale: explain(&radar, &signals, days_since_update),
            content: derive_content(asset, &signals, &radar, &valuation),
            valuation,
        }
    }

    /// Staleness bucket, raised to the distress-signal total if that is higher.
    fn distress(&self, signals: &AssetSignals) -> f64 {
        let staleness = match signals.days_since_update(self.as_of) {
            Some(days) => self.staleness_score(days),
            None => self.config.unknown_staleness(),
        };

        let signal_total: f64 = signals.distress_signals.iter().map(|s| s.weight()).sum();
        clamp_axis(staleness.max(signal_total.min(10.0)))
    }

    /// First matching bucket wins.
    fn staleness_score(&self, days: u64) -> f64 {
        self.distress_buckets
            .iter()
            .find(|(range, _)| range.matches(days))
            .map(|(_, score)| *score)
            .unwrap_or_else(|| {
                tracing::debug!(days, "no distress bucket matched");
                self.config.unknown_staleness()
            })
    }
}

/// How much of the listing's earning potential is not being captured.
fn monetization_gap(signals: &AssetSignals) -> f64 {
    let mrr = signals.mrr();
    let potential = valuation::potential_mrr(signals);

    let capture = if potential > 0.0 {
        clamp_unit(mrr / potential)
    } else if mrr > 0.0 {
        1.0
    } else {
        0.0
    };
    let reach = log_reach(signals.user_count, 5.0);

    10.0 * (1.0 - capture) * (0.4 + 0.6 * reach)
}
