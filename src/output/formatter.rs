use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::asset::Asset;
use crate::scoring::{
    format_usd, AssetAnalysis, DisplayIdentity, Gated, GatedContent, UnlockReason,
    ValuationBasis, ValuationEstimate,
};

/// An analyzed asset as a particular viewer sees it
pub struct ScoredAsset<'a> {
    pub asset: &'a Asset,
    pub analysis: &'a AssetAnalysis,
    pub identity: DisplayIdentity,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a dollar amount in compact notation ($850, $50K, $1.2M)
pub fn format_money_compact(amount: f64) -> String {
    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    // Thresholds sit where one-decimal rounding carries into the next unit
    let formatted = if amount >= 999_950.0 {
        format!("{:.1}M", amount / 1_000_000.0)
    } else if amount >= 999.5 {
        format!("{:.1}K", amount / 1_000.0)
    } else {
        format!("{:.0}", amount)
    };

    // Trim trailing .0 (e.g., "50.0K" -> "50K")
    format!("${}", formatted.replace(".0M", "M").replace(".0K", "K"))
}

/// Valuation range in compact notation ("$10K-$50K")
pub fn format_valuation_range(valuation: &ValuationEstimate) -> String {
    format!(
        "{}-{}",
        format_money_compact(valuation.low),
        format_money_compact(valuation.high)
    )
}

/// Format days since the owner last updated a listing
/// "today", "3d" for days, "5w" for weeks, "2y" for years, "unknown" if never reported
pub fn format_staleness(days: Option<u64>) -> String {
    match days {
        None => "unknown".to_string(),
        Some(0) => "today".to_string(),
        Some(d) if d >= 365 => format!("{}y", d / 365),
        Some(d) if d >= 7 => format!("{}w", d / 7),
        Some(d) => format!("{}d", d),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format assets as a ranked table with columns: Index, Score, Name, Marketplace, Valuation
/// No headers
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 3 chars wide (overall score is 0-100)
pub fn format_scored_table(assets: &[ScoredAsset], use_colors: bool) -> String {
    if assets.is_empty() {
        return "No assets found.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 3;
    let separator = "  ";

    assets
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                scored.analysis.overall_score,
                width = score_width
            );
            let tag = scored.asset.marketplace.tag();
            let valuation = format_valuation_range(&scored.analysis.valuation);

            let fixed_width = index_width
                + 1
                + score_width
                + separator.len() * 3
                + tag.len()
                + valuation.len();

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&scored.identity.name, width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate_name(&scored.identity.name, 20),
                // No terminal (pipe), don't truncate
                None => scored.identity.name.clone(),
            };

            if use_colors {
                let name = if scored.identity.masked {
                    name.dimmed().to_string()
                } else {
                    name
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    tag.cyan(),
                    separator,
                    valuation.green()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, tag, separator, valuation
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format assets as tab-separated values for scripting
/// Columns: overall, name, marketplace, users, valuation_low, valuation_high (no headers, no colors)
pub fn format_tsv(assets: &[ScoredAsset]) -> String {
    if assets.is_empty() {
        return String::new();
    }

    assets
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}\t{:.0}\t{:.0}",
                scored.analysis.overall_score,
                scored.identity.name,
                scored.asset.marketplace.tag(),
                scored.asset.user_count,
                scored.analysis.valuation.low,
                scored.analysis.valuation.high
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ten-cell bar for a 0-10 axis value
fn axis_bar(value: f64) -> String {
    let filled = value.round().clamp(0.0, 10.0) as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
}

/// Format one asset with the full radar breakdown and gated intelligence
pub fn format_asset_detail(
    scored: &ScoredAsset,
    content: &GatedContent,
    use_colors: bool,
) -> String {
    let analysis = scored.analysis;
    let asset = scored.asset;
    let mut lines = Vec::new();

    let title = format!("{} ({}/100)", scored.identity.name, analysis.overall_score);
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });
    if !scored.identity.description.is_empty() {
        lines.push(format!("  {}", scored.identity.description));
    }
    lines.push(format!(
        "  Marketplace: {}",
        asset.marketplace.display_name()
    ));
    lines.push(format!("  Users: {}", crate::scoring::group_digits(asset.user_count)));
    lines.push(format!(
        "  Last updated: {}",
        format_staleness(analysis.days_since_update)
    ));
    match &scored.identity.url {
        Some(url) if use_colors => lines.push(format!("  URL: {}", url.underline())),
        Some(url) => lines.push(format!("  URL: {}", url)),
        None => lines.push("  URL: [hidden until revealed]".to_string()),
    }

    lines.push(String::new());
    lines.push("Hunter Radar".to_string());
    for entry in &analysis.rationale {
        let bar = axis_bar(entry.score);
        let bar = if use_colors {
            bar.yellow().to_string()
        } else {
            bar
        };
        lines.push(format!(
            "  {:<18} {} {:>4.1}  {}",
            entry.axis, bar, entry.score, entry.rationale
        ));
        lines.push(format!("  {:<18} {}", "", entry.evidence));
    }

    lines.push(String::new());
    let valuation = &analysis.valuation;
    let basis = match valuation.basis {
        ValuationBasis::AnnualRevenue => "annual revenue",
        ValuationBasis::PreRevenueFloor => "no reported revenue",
    };
    lines.push(format!(
        "Valuation: {} - {} ({}, {})",
        format_usd(valuation.low),
        format_usd(valuation.high),
        valuation.multiple,
        basis
    ));
    let potential = &analysis.mrr_potential;
    lines.push(format!(
        "MRR potential: {} / {} / {} per month ({} confidence)",
        format_usd(potential.low),
        format_usd(potential.mid),
        format_usd(potential.high),
        potential.confidence.level.as_str()
    ));
    lines.push(format!("  {}", potential.formula));

    lines.push(String::new());
    lines.push("Risks:".to_string());
    lines.extend(analysis.risks.iter().map(|r| format!("  - {}", r)));
    lines.push("Opportunities:".to_string());
    lines.extend(analysis.opportunities.iter().map(|o| format!("  + {}", o)));

    lines.push(String::new());
    lines.extend(format_gated_content(content, use_colors));

    lines.join("\n")
}

fn section<T>(label: &str, gated: &Gated<T>, use_colors: bool) -> String {
    if gated.is_locked() && use_colors {
        format!("{} {}", label, "(locked)".red())
    } else if gated.is_locked() {
        format!("{} (locked)", label)
    } else {
        label.to_string()
    }
}

fn format_gated_content(content: &GatedContent, use_colors: bool) -> Vec<String> {
    let mut lines = Vec::new();

    let owner = content.owner_contact.value();
    lines.push(section("Owner contact", &content.owner_contact, use_colors));
    lines.push(format!("  Name: {}", owner.name));
    lines.push(format!("  Email: {}", owner.email));
    lines.push(format!("  Listing: {}", owner.listing_url));

    let email = content.cold_email.value();
    lines.push(section("Cold email", &content.cold_email, use_colors));
    lines.push(format!("  Subject: {}", email.subject));
    lines.extend(email.body.lines().map(|l| format!("  {}", l)));

    let script = content.negotiation_script.value();
    lines.push(section(
        "Negotiation script",
        &content.negotiation_script,
        use_colors,
    ));
    lines.push(format!("  Likely motivation: {}", script.likely_motivation));
    lines.push(format!("  Best time to reach: {}", script.best_time_to_reach));
    lines.extend(script.leverage.iter().map(|l| format!("  * {}", l)));

    let playbook = content.acquisition_playbook.value();
    lines.push(section(
        "Acquisition playbook",
        &content.acquisition_playbook,
        use_colors,
    ));
    lines.push(format!("  Strategy: {}", playbook.strategy));
    lines.push(format!("  Approach: {}", playbook.approach));
    lines.push(format!("  Opening offer: {}", playbook.opening_offer));
    lines.push(format!("  Walk away: {}", playbook.walk_away));

    if content.unlocked_by == Some(UnlockReason::RevealCredit) {
        lines.push(String::new());
        let note = "Revealed with a reveal credit (1 credit consumed)";
        lines.push(if use_colors {
            note.yellow().to_string()
        } else {
            note.to_string()
        });
    }

    lines
}
