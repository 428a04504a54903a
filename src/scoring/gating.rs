use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::content::{
    AcquisitionPlaybook, ColdEmail, DerivedContent, NegotiationScript, OwnerContact,
};
use crate::asset::{Asset, Marketplace};

/// Subscription level, ordered from least to most access.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    #[default]
    Free,
    Scout,
    Hunter,
    Syndicate,
}

impl AccessTier {
    /// Owner contact, cold email, negotiation script and playbook.
    pub fn includes_intelligence(self) -> bool {
        self >= AccessTier::Hunter
    }

    /// Real asset names and listing URLs.
    pub fn includes_identity(self) -> bool {
        self >= AccessTier::Scout
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessTier::Free => "free",
            AccessTier::Scout => "scout",
            AccessTier::Hunter => "hunter",
            AccessTier::Syndicate => "syndicate",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(AccessTier::Free),
            "scout" => Ok(AccessTier::Scout),
            "hunter" => Ok(AccessTier::Hunter),
            "syndicate" => Ok(AccessTier::Syndicate),
            other => Err(format!(
                "unknown tier '{}' (expected free, scout, hunter or syndicate)",
                other
            )),
        }
    }
}

/// A value that is either shown as-is or replaced by its locked placeholder.
/// Both arms always carry something renderable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Gated<T> {
    Unlocked(T),
    Locked(T),
}

impl<T> Gated<T> {
    pub fn value(&self) -> &T {
        match self {
            Gated::Unlocked(v) | Gated::Locked(v) => v,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Gated::Locked(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockReason {
    Tier,
    RevealCredit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatedContent {
    pub owner_contact: Gated<OwnerContact>,
    pub cold_email: Gated<ColdEmail>,
    pub negotiation_script: Gated<NegotiationScript>,
    pub acquisition_playbook: Gated<AcquisitionPlaybook>,
    pub unlocked_by: Option<UnlockReason>,
}

impl GatedContent {
    /// True when a reveal credit, not the tier, unlocked the content. The
    /// caller is responsible for debiting the credit.
    pub fn credit_consumed(&self) -> bool {
        self.unlocked_by == Some(UnlockReason::RevealCredit)
    }
}

pub fn locked_owner_contact() -> OwnerContact {
    OwnerContact {
        name: "[Locked]".to_string(),
        email: "[Upgrade to Hunter tier to unlock]".to_string(),
        listing_url: "[Locked]".to_string(),
    }
}

pub fn locked_cold_email() -> ColdEmail {
    ColdEmail {
        subject: "[Upgrade to unlock cold email templates]".to_string(),
        body: "[Premium feature - unlock with Hunter tier or above]".to_string(),
    }
}

pub fn locked_negotiation_script() -> NegotiationScript {
    NegotiationScript {
        likely_motivation: "[Locked]".to_string(),
        best_time_to_reach: "[Locked]".to_string(),
        leverage: vec!["[Upgrade to unlock]".to_string()],
    }
}

pub fn locked_acquisition_playbook() -> AcquisitionPlaybook {
    AcquisitionPlaybook {
        strategy: "[Upgrade to Hunter or Syndicate to unlock acquisition playbook]".to_string(),
        approach: "[Locked]".to_string(),
        opening_offer: "[Locked]".to_string(),
        walk_away: "[Locked]".to_string(),
    }
}

/// Apply tier and reveal-credit rules to derived content.
///
/// Hunter and Syndicate see everything. Lower tiers see placeholders unless a
/// reveal credit is available, in which case the content is unlocked and
/// `unlocked_by` records that the credit was spent.
pub fn gate_content(
    tier: AccessTier,
    has_reveal_credit: bool,
    content: DerivedContent,
) -> GatedContent {
    let unlocked_by = if tier.includes_intelligence() {
        Some(UnlockReason::Tier)
    } else if has_reveal_credit {
        Some(UnlockReason::RevealCredit)
    } else {
        None
    };

    if unlocked_by.is_some() {
        GatedContent {
            owner_contact: Gated::Unlocked(content.owner_contact),
            cold_email: Gated::Unlocked(content.cold_email),
            negotiation_script: Gated::Unlocked(content.negotiation_script),
            acquisition_playbook: Gated::Unlocked(content.acquisition_playbook),
            unlocked_by,
        }
    } else {
        GatedContent {
            owner_contact: Gated::Locked(locked_owner_contact()),
            cold_email: Gated::Locked(locked_cold_email()),
            negotiation_script: Gated::Locked(locked_negotiation_script()),
            acquisition_playbook: Gated::Locked(locked_acquisition_playbook()),
            unlocked_by: None,
        }
    }
}

/// Name, description and URL as a given viewer may see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayIdentity {
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub masked: bool,
}

/// Free viewers without a reveal get a masked name, a generic description
/// and no URL; everyone else sees the listing.
pub fn display_identity(asset: &Asset, tier: AccessTier, has_reveal_credit: bool) -> DisplayIdentity {
    if tier.includes_identity() || has_reveal_credit {
        return DisplayIdentity {
            name: asset.name.clone(),
            description: asset.description.clone().unwrap_or_default(),
            url: Some(asset.url.clone()).filter(|u| !u.is_empty()),
            masked: false,
        };
    }

    DisplayIdentity {
        name: masked_name(asset),
        description: masked_description(asset.category.as_deref()),
        url: None,
        masked: true,
    }
}

fn masked_name(asset: &Asset) -> String {
    let prefix = match asset.marketplace {
        Marketplace::ChromeExtension | Marketplace::FirefoxAddon => "Browser Extension",
        Marketplace::ShopifyApp => "E-commerce App",
        Marketplace::WordpressPlugin => "CMS Plugin",
        Marketplace::SlackApp => "Team Integration",
        Marketplace::VscodeExtension => "Code Extension",
        Marketplace::SaasProduct | Marketplace::SaasForSale => "SaaS Platform",
        _ => asset
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Software Asset"),
    };

    let chars: Vec<char> = asset.id.chars().collect();
    let suffix: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{} #{}", prefix, suffix)
}

fn masked_description(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some("Browser Extension") => {
            "Productivity tool with established user base showing signs of reduced maintenance"
        }
        Some("E-commerce") => {
            "Commerce solution with active merchant installs and recurring revenue potential"
        }
        Some("SaaS") => "Software platform with verified revenue and growth metrics",
        Some("Mobile App") => "Mobile application with engaged user community",
        Some("Marketplace") => "Marketplace platform connecting buyers and sellers",
        _ => "Software asset with established distribution and monetization opportunity",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_content() -> DerivedContent {
        DerivedContent {
            owner_contact: OwnerContact {
                name: "Dana Reyes".to_string(),
                email: "dana@example.com".to_string(),
                listing_url: "https://example.com/listing".to_string(),
            },
            cold_email: ColdEmail {
                subject: "Question about Tab Manager Pro".to_string(),
                body: "Hi Dana".to_string(),
            },
            negotiation_script: NegotiationScript {
                likely_motivation: "Side project fatigue".to_string(),
                best_time_to_reach: "Weekday mornings".to_string(),
                leverage: vec!["Limited time for maintenance".to_string()],
            },
            acquisition_playbook: AcquisitionPlaybook {
                strategy: "Quick value creation".to_string(),
                approach: "Direct email".to_string(),
                opening_offer: "$24,000 - $36,000".to_string(),
                walk_away: "$48,000".to_string(),
            },
        }
    }

    #[test]
    fn test_tier_ordering() {
        assert!(AccessTier::Free < AccessTier::Scout);
        assert!(AccessTier::Scout < AccessTier::Hunter);
        assert!(AccessTier::Hunter < AccessTier::Syndicate);
        assert!(!AccessTier::Scout.includes_intelligence());
        assert!(AccessTier::Hunter.includes_intelligence());
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("Hunter".parse::<AccessTier>(), Ok(AccessTier::Hunter));
        assert!("platinum".parse::<AccessTier>().is_err());
    }

    #[test]
    fn test_hunter_sees_everything() {
        let gated = gate_content(AccessTier::Hunter, false, sample_content());
        assert_eq!(gated.owner_contact.value().email, "dana@example.com");
        assert!(!gated.acquisition_playbook.is_locked());
        assert_eq!(gated.unlocked_by, Some(UnlockReason::Tier));
        assert!(!gated.credit_consumed());
    }

    #[test]
    fn test_scout_gets_placeholders() {
        let gated = gate_content(AccessTier::Scout, false, sample_content());
        assert!(gated.owner_contact.is_locked());
        assert!(gated.cold_email.is_locked());
        assert!(gated.negotiation_script.is_locked());
        assert!(gated.acquisition_playbook.is_locked());
        assert_eq!(gated.owner_contact.value(), &locked_owner_contact());
        assert_eq!(gated.unlocked_by, None);
    }

    #[test]
    fn test_reveal_credit_unlocks_free_tier() {
        let gated = gate_content(AccessTier::Free, true, sample_content());
        assert_eq!(gated.cold_email.value().subject, "Question about Tab Manager Pro");
        assert!(gated.credit_consumed());
    }

    #[test]
    fn test_reveal_credit_not_spent_when_tier_suffices() {
        let gated = gate_content(AccessTier::Syndicate, true, sample_content());
        assert_eq!(gated.unlocked_by, Some(UnlockReason::Tier));
        assert!(!gated.credit_consumed());
    }

    #[test]
    fn test_gated_serializes_with_state() {
        let gated = gate_content(AccessTier::Free, false, sample_content());
        let json = serde_json::to_value(&gated).unwrap();
        assert_eq!(json["cold_email"]["state"], "locked");
        assert_eq!(
            json["cold_email"]["value"]["body"],
            "[Premium feature - unlock with Hunter tier or above]"
        );
    }

    #[test]
    fn test_display_identity_masked_for_free() {
        let mut asset = Asset::new("demo-1042", "Tab Manager Pro", Marketplace::ChromeExtension);
        asset.url = "https://example.com".to_string();
        let identity = display_identity(&asset, AccessTier::Free, false);
        assert!(identity.masked);
        assert_eq!(identity.name, "Browser Extension #1042");
        assert!(identity.url.is_none());
    }

    #[test]
    fn test_display_identity_short_id() {
        let asset = Asset::new("7", "Thing", Marketplace::Other);
        let identity = display_identity(&asset, AccessTier::Free, false);
        assert_eq!(identity.name, "Software Asset #7");
    }

    #[test]
    fn test_display_identity_visible_for_scout_and_reveal() {
        let asset = Asset::new("demo-1", "Tab Manager Pro", Marketplace::ChromeExtension);
        assert_eq!(display_identity(&asset, AccessTier::Scout, false).name, "Tab Manager Pro");
        assert_eq!(display_identity(&asset, AccessTier::Free, true).name, "Tab Manager Pro");
    }
}
