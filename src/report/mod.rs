use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::asset::{Asset, Marketplace};
use crate::scoring::{
    display_identity, gate_content, AccessTier, AssetAnalysis, AxisRationale, DisplayIdentity,
    GatedContent, MrrPotential, RadarScore, ValuationEstimate,
};

pub const REPORT_VERSION: u32 = 1;

/// One ranked asset as exported, already gated for the viewer's tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub asset_id: String,
    pub identity: DisplayIdentity,
    pub marketplace: Marketplace,
    pub user_count: u64,
    pub radar: RadarScore,
    pub overall_score: u8,
    pub days_since_update: Option<u64>,
    pub valuation: ValuationEstimate,
    pub mrr_potential: MrrPotential,
    pub risks: Vec<String>,
    pub opportunities: Vec<String>,
    pub rationale: Vec<AxisRationale>,
    pub content: GatedContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub as_of: DateTime<Utc>,
    pub tier: AccessTier,
    /// Reveal credits spent to unlock entries the tier did not cover
    pub credits_consumed: u32,
    pub entries: Vec<ReportEntry>,
}

/// Gate every analysis for `tier` and collect them in rank order.
///
/// With `reveal_all`, entries the tier does not cover are unlocked as if a
/// reveal credit were spent on each; `credits_consumed` counts them.
pub fn build_report(
    ranked: &[(&Asset, &AssetAnalysis)],
    tier: AccessTier,
    reveal_all: bool,
    as_of: DateTime<Utc>,
    generated_at: DateTime<Utc>,
) -> Report {
    let mut credits_consumed = 0;
    let entries = ranked
        .iter()
        .enumerate()
        .map(|(idx, (asset, analysis))| {
            let content = gate_content(tier, reveal_all, analysis.content.clone());
            if content.credit_consumed() {
                credits_consumed += 1;
            }
            ReportEntry {
                rank: idx + 1,
                asset_id: asset.id.clone(),
                identity: display_identity(asset, tier, reveal_all),
                marketplace: asset.marketplace,
                user_count: asset.user_count,
                radar: analysis.radar,
                overall_score: analysis.overall_score,
                days_since_update: analysis.days_since_update,
                valuation: analysis.valuation.clone(),
                mrr_potential: analysis.mrr_potential.clone(),
                risks: analysis.risks.clone(),
                opportunities: analysis.opportunities.clone(),
                rationale: analysis.rationale.clone(),
                content,
            }
        })
        .collect();

    Report {
        version: REPORT_VERSION,
        generated_at,
        as_of,
        tier,
        credits_consumed,
        entries,
    }
}

/// Number of reveal credits `build_report` would spend for this tier
pub fn credits_needed(entry_count: usize, tier: AccessTier) -> usize {
    if tier.includes_intelligence() {
        0
    } else {
        entry_count
    }
}

/// What revealing `count` assets costs against a credit balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPlan {
    /// The tier already unlocks everything; no credits are touched
    Covered,
    /// Credits are spent and `remaining` are left afterwards
    Spend { spent: u32, remaining: u32 },
    /// The balance cannot cover the reveal
    Insufficient { needed: usize, available: u32 },
}

impl RevealPlan {
    /// True when the reveal unlocks content with credits
    pub fn uses_credits(&self) -> bool {
        matches!(self, RevealPlan::Spend { .. })
    }
}

pub fn plan_reveal(count: usize, tier: AccessTier, available: u32) -> RevealPlan {
    let needed = credits_needed(count, tier);
    if needed == 0 {
        return RevealPlan::Covered;
    }
    match u32::try_from(needed) {
        Ok(spent) if spent <= available => RevealPlan::Spend {
            spent,
            remaining: available - spent,
        },
        _ => RevealPlan::Insufficient { needed, available },
    }
}

/// Save a report to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;

    file.commit().context("Failed to save report")?;

    Ok(())
}

/// Load a previously exported report
///
/// Fails if the file has an unsupported version.
pub fn load_report(path: &Path) -> Result<Report> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open report at {}", path.display()))?;

    let report: Report = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load report from {}", path.display()))?;

    if report.version != REPORT_VERSION {
        anyhow::bail!("Unsupported report version: {}", report.version);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::HunterScoreEngine;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    fn sample_assets() -> Vec<Asset> {
        let mut stale = Asset::new("wp-1042", "SEO Booster", Marketplace::WordpressPlugin);
        stale.user_count = 89_000;
        stale.developer = Some("Dana Reyes".to_string());
        stale.last_updated = Some(as_of() - Duration::days(913));

        let mut fresh = Asset::new("cx-7781", "Tab Saver", Marketplace::ChromeExtension);
        fresh.user_count = 4_000;
        fresh.estimated_mrr = Some(800.0);
        fresh.last_updated = Some(as_of() - Duration::days(10));

        vec![stale, fresh]
    }

    fn build(tier: AccessTier, reveal_all: bool) -> Report {
        let engine = HunterScoreEngine::with_defaults(as_of());
        let assets = sample_assets();
        let analyses: Vec<_> = assets.iter().map(|a| engine.analyze(a)).collect();
        let ranked: Vec<_> = assets.iter().zip(analyses.iter()).collect();
        build_report(&ranked, tier, reveal_all, as_of(), as_of())
    }

    #[test]
    fn test_free_report_is_locked() {
        let report = build(AccessTier::Free, false);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.credits_consumed, 0);
        for entry in &report.entries {
            assert!(entry.identity.masked);
            assert!(entry.content.owner_contact.is_locked());
            assert!(entry.content.acquisition_playbook.is_locked());
        }
        assert_eq!(report.entries[0].rank, 1);
        assert_eq!(report.entries[1].rank, 2);
    }

    #[test]
    fn test_reveal_all_counts_credits() {
        let report = build(AccessTier::Scout, true);
        assert_eq!(report.credits_consumed, 2);
        assert!(!report.entries[0].content.owner_contact.is_locked());
        assert_eq!(report.entries[0].content.owner_contact.value().name, "Dana Reyes");
    }

    #[test]
    fn test_hunter_tier_spends_no_credits() {
        let report = build(AccessTier::Hunter, true);
        assert_eq!(report.credits_consumed, 0);
        assert_eq!(credits_needed(2, AccessTier::Hunter), 0);
        assert_eq!(credits_needed(2, AccessTier::Free), 2);
    }

    #[test]
    fn test_plan_reveal_single_asset() {
        assert_eq!(
            plan_reveal(1, AccessTier::Free, 0),
            RevealPlan::Insufficient {
                needed: 1,
                available: 0
            }
        );
        assert_eq!(
            plan_reveal(1, AccessTier::Scout, 3),
            RevealPlan::Spend {
                spent: 1,
                remaining: 2
            }
        );
        assert_eq!(plan_reveal(1, AccessTier::Hunter, 0), RevealPlan::Covered);
    }

    #[test]
    fn test_plan_reveal_all_shortfall() {
        assert_eq!(
            plan_reveal(5, AccessTier::Free, 4),
            RevealPlan::Insufficient {
                needed: 5,
                available: 4
            }
        );
        let exact = plan_reveal(5, AccessTier::Free, 5);
        assert_eq!(
            exact,
            RevealPlan::Spend {
                spent: 5,
                remaining: 0
            }
        );
        assert!(exact.uses_credits());
        assert!(!plan_reveal(0, AccessTier::Free, 0).uses_credits());
        assert!(!plan_reveal(5, AccessTier::Syndicate, 0).uses_credits());
    }

    #[test]
    fn test_save_and_load_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");
        let report = build(AccessTier::Free, false);

        save_report(&path, &report).unwrap();
        let loaded = load_report(&path).unwrap();

        assert_eq!(loaded.version, REPORT_VERSION);
        assert_eq!(loaded.entries.len(), 2);
        assert_eq!(loaded.entries[0].asset_id, "wp-1042");

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("Dana Reyes"));
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let mut report = build(AccessTier::Free, false);
        report.version = 9;
        save_report(&path, &report).unwrap();

        let err = load_report(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported report version"));
    }
}
