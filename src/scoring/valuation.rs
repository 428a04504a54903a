use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;
use super::radar::RadarScore;
use crate::asset::{AssetSignals, Marketplace};

/// Revenue multipliers keyed by the distress / monetization-gap composite.
/// First entry whose threshold the composite reaches wins.
const MULTIPLIER_TABLE: [(f64, f64); 4] = [(8.0, 4.0), (6.0, 3.5), (4.0, 3.0), (0.0, 2.5)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBasis {
    AnnualRevenue,
    PreRevenueFloor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationEstimate {
    pub low: f64,
    pub high: f64,
    pub multiple: String,
    pub basis: ValuationBasis,
}

/// Conversion benchmark used to estimate what a listing could earn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MrrFormula {
    pub conversion_rate: f64,
    pub avg_price: f64,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// How far a marketplace's public data can be trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceConfidence {
    pub level: ConfidenceLevel,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrrPotential {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
    pub formula: String,
    pub confidence: MarketplaceConfidence,
}

pub fn mrr_formula(marketplace: Marketplace) -> MrrFormula {
    let (conversion_rate, avg_price, description) = match marketplace {
        Marketplace::ChromeExtension | Marketplace::FirefoxAddon | Marketplace::MicrosoftApp => {
            (0.02, 5.0, "2% conversion at $5/mo")
        }
        Marketplace::ShopifyApp | Marketplace::ZapierIntegration => {
            (0.02, 10.0, "2% conversion at $10/mo")
        }
        Marketplace::WordpressPlugin => (0.01, 4.08, "1% conversion at $49/yr"),
        Marketplace::SlackApp => (0.03, 15.0, "3% conversion at $15/mo (B2B)"),
        Marketplace::AtlassianApp => (0.03, 20.0, "3% conversion at $20/mo"),
        Marketplace::SalesforceApp => (0.05, 50.0, "5% conversion at $50/mo (enterprise)"),
        Marketplace::IosApp => (0.01, 3.0, "1% conversion at $3/mo (estimate)"),
        Marketplace::AndroidApp => (0.005, 2.0, "0.5% conversion at $2/mo"),
        Marketplace::GumroadProduct => (0.10, 30.0, "10% repeat at $30/mo avg"),
        Marketplace::SaasForSale => (0.05, 30.0, "5% conversion at $30/mo (motivated seller)"),
        Marketplace::HubspotApp
        | Marketplace::NotionIntegration
        | Marketplace::FigmaPlugin
        | Marketplace::VscodeExtension
        | Marketplace::SaasProduct
        | Marketplace::Other => (0.03, 20.0, "3% conversion at $20/mo"),
    };
    MrrFormula {
        conversion_rate,
        avg_price,
        description,
    }
}

pub fn marketplace_confidence(marketplace: Marketplace) -> MarketplaceConfidence {
    let (level, reason) = match marketplace {
        Marketplace::ShopifyApp => (
            ConfidenceLevel::High,
            "Pricing publicly visible, install counts accurate",
        ),
        Marketplace::AtlassianApp => (
            ConfidenceLevel::High,
            "Pricing API available, install data reliable",
        ),
        Marketplace::SaasForSale => (
            ConfidenceLevel::High,
            "Seller-disclosed MRR, verified financials available",
        ),
        Marketplace::GumroadProduct => (
            ConfidenceLevel::Medium,
            "Sales counts partially visible, pricing known",
        ),
        Marketplace::ChromeExtension | Marketplace::FirefoxAddon => (
            ConfidenceLevel::Medium,
            "User counts accurate, revenue estimated from benchmarks",
        ),
        Marketplace::WordpressPlugin => (
            ConfidenceLevel::Medium,
            "Install counts accurate, freemium revenue estimated",
        ),
        Marketplace::MicrosoftApp | Marketplace::VscodeExtension => (
            ConfidenceLevel::Medium,
            "User counts available, revenue estimated",
        ),
        Marketplace::AndroidApp => (
            ConfidenceLevel::Low,
            "Download ranges only, revenue requires paid APIs",
        ),
        Marketplace::SlackApp => (
            ConfidenceLevel::Low,
            "Install counts often hidden, B2B pricing varies",
        ),
        Marketplace::ZapierIntegration => (
            ConfidenceLevel::Low,
            "Usage metrics limited, connector revenue varies",
        ),
        Marketplace::SalesforceApp => (
            ConfidenceLevel::Low,
            "No public API, enterprise pricing opaque",
        ),
        Marketplace::IosApp => (
            ConfidenceLevel::Low,
            "No free download/revenue API, distress signals only",
        ),
        Marketplace::HubspotApp
        | Marketplace::NotionIntegration
        | Marketplace::FigmaPlugin
        | Marketplace::SaasProduct
        | Marketplace::Other => (ConfidenceLevel::Low, "Unknown marketplace"),
    };
    MarketplaceConfidence {
        level,
        reason: reason.to_string(),
    }
}

/// MRR the listing's user base would support at benchmark conversion.
pub fn potential_mrr(signals: &AssetSignals) -> f64 {
    let formula = mrr_formula(signals.marketplace);
    signals.user_count as f64 * formula.conversion_rate * formula.avg_price
}

pub fn estimate_mrr_potential(signals: &AssetSignals) -> MrrPotential {
    let formula = mrr_formula(signals.marketplace);
    let mid = potential_mrr(signals).round();
    MrrPotential {
        low: (mid * 0.5).round(),
        mid,
        high: (mid * 2.0).round(),
        formula: formula.description.to_string(),
        confidence: marketplace_confidence(signals.marketplace),
    }
}

/// Multiplier on annual revenue for a given radar score.
pub fn revenue_multiplier(score: &RadarScore) -> f64 {
    let composite = (score.distress + score.monetization_gap) / 2.0;
    MULTIPLIER_TABLE
        .iter()
        .find(|(threshold, _)| composite >= *threshold)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(MULTIPLIER_TABLE[MULTIPLIER_TABLE.len() - 1].1)
}

pub fn compute_valuation(
    signals: &AssetSignals,
    score: &RadarScore,
    config: &ScoringConfig,
) -> ValuationEstimate {
    let mrr = signals.mrr();
    if mrr <= 0.0 {
        return floor_estimate(config);
    }

    let annual_revenue = mrr * 12.0;
    let multiplier = revenue_multiplier(score);
    let spread = config.valuation_spread();
    let low_multiple = (multiplier - spread).max(0.0);
    let high_multiple = multiplier + spread;

    let low = (annual_revenue * low_multiple).round();
    let high = (annual_revenue * high_multiple).round();

    // Revenue too small to survive rounding still gets a usable band
    if !(low.is_finite() && high.is_finite() && low > 0.0 && high > low) {
        tracing::debug!(mrr, low, high, "revenue band degenerate, using floor");
        return floor_estimate(config);
    }

    ValuationEstimate {
        low,
        high,
        multiple: format!(
            "{}-{}x ARR",
            trim_multiple(low_multiple),
            trim_multiple(high_multiple)
        ),
        basis: ValuationBasis::AnnualRevenue,
    }
}

fn floor_estimate(config: &ScoringConfig) -> ValuationEstimate {
    let (low, high) = config.valuation_floor();
    ValuationEstimate {
        low,
        high,
        multiple: "pre-revenue floor".to_string(),
        basis: ValuationBasis::PreRevenueFloor,
    }
}

/// "3" for 3.0, "2.5" for 2.5
fn trim_multiple(m: f64) -> String {
    let s = format!("{:.1}", m);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}
