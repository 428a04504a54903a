use serde::{Deserialize, Serialize};

use super::radar::RadarScore;
use super::valuation::{ValuationBasis, ValuationEstimate};
use crate::asset::{Asset, AssetSignals, DistressSignal, Marketplace};

/// Axis value at or above which a signal counts as "high".
pub const HIGH: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerContact {
    pub name: String,
    pub email: String,
    pub listing_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationScript {
    pub likely_motivation: String,
    pub best_time_to_reach: String,
    pub leverage: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionPlaybook {
    pub strategy: String,
    pub approach: String,
    pub opening_offer: String,
    pub walk_away: String,
}

/// The premium intelligence for one asset, before gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedContent {
    pub owner_contact: OwnerContact,
    pub cold_email: ColdEmail,
    pub negotiation_script: NegotiationScript,
    pub acquisition_playbook: AcquisitionPlaybook,
}

/// Build the premium content for an asset from its scores and valuation.
pub fn derive_content(
    asset: &Asset,
    signals: &AssetSignals,
    score: &RadarScore,
    valuation: &ValuationEstimate,
) -> DerivedContent {
    DerivedContent {
        owner_contact: owner_contact(asset),
        cold_email: cold_email(asset, signals, score),
        negotiation_script: negotiation_script(signals, score),
        acquisition_playbook: acquisition_playbook(asset, score, valuation),
    }
}

fn owner_contact(asset: &Asset) -> OwnerContact {
    OwnerContact {
        name: non_empty(asset.developer.as_deref())
            .unwrap_or("Unknown developer")
            .to_string(),
        email: non_empty(asset.developer_email.as_deref())
            .unwrap_or("Not listed - requires manual research")
            .to_string(),
        listing_url: non_empty(Some(asset.url.as_str()))
            .unwrap_or("Not listed")
            .to_string(),
    }
}

fn cold_email(asset: &Asset, signals: &AssetSignals, score: &RadarScore) -> ColdEmail {
    let greeting = asset
        .developer
        .as_deref()
        .and_then(|d| d.split_whitespace().next())
        .unwrap_or("there");

    let hook = if score.distress >= HIGH {
        "noticed it hasn't had an update in a while".to_string()
    } else if signals.user_count > 0 {
        format!("noticed it has built up {} users", group_digits(signals.user_count))
    } else {
        "liked what it does".to_string()
    };

    let body = format!(
        "Hi {},\n\n\
         I came across {} on {} and {}. I run a small portfolio of software \
         products and would be interested in taking it over and keeping it \
         maintained for its users.\n\n\
         Would you be open to a short conversation about a possible acquisition?\n\n\
         Best regards",
        greeting,
        asset.name,
        signals.marketplace.display_name(),
        hook
    );

    ColdEmail {
        subject: truncate_chars(&format!("Question about {}", asset.name), 50),
        body,
    }
}

fn negotiation_script(signals: &AssetSignals, score: &RadarScore) -> NegotiationScript {
    let likely_motivation = if score.distress >= HIGH {
        "Side project fatigue; the listing has gone quiet"
    } else if score.monetization_gap >= HIGH {
        "Users but little revenue; opportunity cost of keeping it running"
    } else {
        "Strategic exit at a fair multiple"
    };

    let best_time_to_reach = match signals.marketplace {
        Marketplace::SlackApp
        | Marketplace::AtlassianApp
        | Marketplace::SalesforceApp
        | Marketplace::HubspotApp
        | Marketplace::ZapierIntegration => "Tuesday to Thursday, business hours",
        _ => "Weekday mornings",
    };

    let mut leverage = Vec::new();
    if score.distress >= HIGH {
        leverage.push("Limited time for maintenance".to_string());
    }
    if score.technical_risk >= 6.0 {
        leverage.push(platform_change_note(signals).to_string());
    }
    if score.monetization_gap >= HIGH {
        leverage.push("Growth opportunity they can't pursue".to_string());
    }
    if signals.clamped_rating().is_some_and(|r| r < 3.5) {
        leverage.push("Mixed reviews putting pressure on the listing".to_string());
    }
    if leverage.is_empty() {
        leverage.push("Market conditions".to_string());
        leverage.push("Acquisition premium".to_string());
    }

    NegotiationScript {
        likely_motivation: likely_motivation.to_string(),
        best_time_to_reach: best_time_to_reach.to_string(),
        leverage,
    }
}

fn acquisition_playbook(
    asset: &Asset,
    score: &RadarScore,
    valuation: &ValuationEstimate,
) -> AcquisitionPlaybook {
    let strategy = if score.flip_potential >= HIGH {
        "Quick value creation: fix neglected issues, then introduce a premium tier"
    } else if score.flip_potential >= 4.0 {
        "Moderate upside: plan a 12 month improvement program before any exit"
    } else {
        "Long-term hold: only pursue at a discount to the valuation floor"
    };

    let approach = match non_empty(asset.developer_email.as_deref()) {
        Some(_) => format!(
            "Direct email to {}",
            non_empty(asset.developer.as_deref()).unwrap_or("the developer")
        ),
        None => format!(
            "Reach out through the {} listing's support channel",
            asset.marketplace.display_name()
        ),
    };

    let opening_offer = format!(
        "{} - {}",
        format_usd(valuation.low * 2.0 / 3.0),
        format_usd(valuation.low)
    );
    let walk_away = match valuation.basis {
        ValuationBasis::AnnualRevenue => format_usd(valuation.high * 0.8),
        ValuationBasis::PreRevenueFloor => {
            format!("{} (pre-revenue)", format_usd(valuation.high * 0.8))
        }
    };

    AcquisitionPlaybook {
        strategy: strategy.to_string(),
        approach,
        opening_offer,
        walk_away,
    }
}

/// Always returns at least one entry.
pub fn assess_risks(signals: &AssetSignals, score: &RadarScore) -> Vec<String> {
    let mut risks = Vec::new();

    let manifest_v2 = signals.distress_signals.contains(&DistressSignal::ManifestV2);
    if manifest_v2 || (signals.marketplace.is_browser_extension() && score.technical_risk >= HIGH) {
        risks.push("Manifest V3 migration required".to_string());
    } else if score.technical_risk >= 6.0 {
        risks.push(platform_change_note(signals).to_string());
    }
    if score.distress >= HIGH {
        risks.push("Codebase may need significant catch-up maintenance".to_string());
    }
    if signals.user_count < 1_000 {
        risks.push("Small user base limits resale value".to_string());
    }
    if signals.clamped_rating().is_some_and(|r| r < 3.5) {
        risks.push("Mixed reviews may drive churn".to_string());
    }
    if signals.mrr() <= 0.0 {
        risks.push("Revenue unproven; valuation rests on the pre-revenue floor".to_string());
    }
    risks.push(format!(
        "Platform dependency on {}",
        signals.marketplace.display_name()
    ));

    risks
}

/// Always returns at least one entry.
pub fn assess_opportunities(signals: &AssetSignals, score: &RadarScore) -> Vec<String> {
    let mut opportunities = Vec::new();

    if score.monetization_gap >= HIGH {
        opportunities.push("Introduce a premium tier for an unmonetized user base".to_string());
    }
    if score.distress >= HIGH {
        opportunities
            .push("Quick wins from fixing neglected bugs and refreshing the listing".to_string());
    }
    if score.market_position >= HIGH {
        opportunities.push("Established category position to build on".to_string());
    }
    if signals.user_count >= 50_000 {
        opportunities.push("Cross-sell to a large installed base".to_string());
    }
    if opportunities.is_empty() {
        opportunities.push("Standard monetization playbook applies".to_string());
    }

    opportunities
}

fn platform_change_note(signals: &AssetSignals) -> &'static str {
    if signals.marketplace.is_browser_extension() {
        "Manifest V3 migration ahead"
    } else if signals.marketplace == Marketplace::AtlassianApp {
        "Connect to Forge migration ahead"
    } else {
        "Platform changes ahead"
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn truncate_chars(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        s.to_string()
    } else {
        format!("{}...", chars[..max.saturating_sub(3)].iter().collect::<String>())
    }
}

/// 1234567 -> "1,234,567"
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole-dollar amount with separators: 12345.6 -> "$12,346"
pub fn format_usd(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round().max(0.0) } else { 0.0 };
    format!("${}", group_digits(rounded as u64))
}
