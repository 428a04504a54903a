use asset_hunter::asset::{load_catalogs, Asset, Marketplace};
use asset_hunter::report::{build_report, load_report, save_report};
use asset_hunter::scoring::{
    compute_overall_score, display_identity, gate_content, AccessTier, HunterScoreEngine,
    UnlockReason, ValuationBasis,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn stale_plugin() -> Asset {
    let mut asset = Asset::new("wp-7731", "SEO Image Optimizer", Marketplace::WordpressPlugin);
    asset.user_count = 89_000;
    asset.estimated_mrr = Some(0.0);
    asset.last_updated = Some(as_of() - Duration::days(913));
    asset.developer = Some("Priya Natarajan".to_string());
    asset.developer_email = Some("priya@example.com".to_string());
    asset.url = "https://wordpress.org/plugins/seo-image-optimizer".to_string();
    asset
}

#[test]
fn stale_unmonetized_plugin_ranks_as_prime_target() {
    let engine = HunterScoreEngine::with_defaults(as_of());
    let signals = stale_plugin().signals();
    let radar = engine.compute_radar_score(&signals);

    assert!(radar.monetization_gap >= 9.5, "gap {}", radar.monetization_gap);
    assert!(radar.distress >= 8.0, "distress {}", radar.distress);
    assert!(compute_overall_score(&radar) >= 70);

    let valuation = engine.compute_valuation(&signals, &radar);
    assert_eq!(valuation.basis, ValuationBasis::PreRevenueFloor);
    assert!(valuation.low > 0.0);
    assert!(valuation.high > valuation.low);
}

#[test]
fn free_tier_never_sees_owner_details() {
    let engine = HunterScoreEngine::with_defaults(as_of());
    let asset = stale_plugin();
    let analysis = engine.analyze(&asset);

    for tier in [AccessTier::Free, AccessTier::Scout] {
        let gated = gate_content(tier, false, analysis.content.clone());
        assert!(gated.owner_contact.is_locked());
        assert!(gated.cold_email.is_locked());
        assert!(gated.negotiation_script.is_locked());
        assert!(gated.acquisition_playbook.is_locked());
        assert!(!gated.owner_contact.value().email.is_empty());
        assert_ne!(gated.owner_contact.value().email, "priya@example.com");
    }

    let identity = display_identity(&asset, AccessTier::Free, false);
    assert!(identity.masked);
    assert!(identity.url.is_none());
    assert_ne!(identity.name, asset.name);

    let revealed = gate_content(AccessTier::Free, true, analysis.content.clone());
    assert_eq!(revealed.unlocked_by, Some(UnlockReason::RevealCredit));
    assert_eq!(revealed.owner_contact.value().email, "priya@example.com");

    let hunter = gate_content(AccessTier::Hunter, false, analysis.content);
    assert_eq!(hunter.unlocked_by, Some(UnlockReason::Tier));
}

#[test]
fn catalog_to_report_pipeline() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("listings.yaml");
    std::fs::write(
        &catalog,
        r#"
assets:
  - id: wp-7731
    name: SEO Image Optimizer
    marketplace: wordpress_plugin
    users: 89000
    last_updated: "2023-11-30"
    developer_email: priya@example.com
  - id: cx-1200
    name: Tab Saver
    marketplace: chrome_extension
    users: 4000
    estimated_mrr: 800
    rating: 4.6
    last_updated: "2026-05-20T00:00:00Z"
"#,
    )
    .unwrap();

    let pattern = dir.path().join("*.yaml").to_string_lossy().to_string();
    let assets = load_catalogs(&[pattern]).unwrap();
    assert_eq!(assets.len(), 2);

    let engine = HunterScoreEngine::with_defaults(as_of());
    let analyses: Vec<_> = assets.iter().map(|a| engine.analyze(a)).collect();
    let ranked: Vec<_> = assets.iter().zip(analyses.iter()).collect();
    let report = build_report(&ranked, AccessTier::Free, false, as_of(), as_of());

    let out = dir.path().join("report.json");
    save_report(&out, &report).unwrap();
    let raw = std::fs::read_to_string(&out).unwrap();
    assert!(!raw.contains("priya@example.com"));
    assert!(!raw.contains("SEO Image Optimizer"));

    let loaded = load_report(&out).unwrap();
    assert_eq!(loaded.entries.len(), 2);
    assert!(loaded.entries.iter().all(|e| e.overall_score <= 100));
}
