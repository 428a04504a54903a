use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Marketplace an asset is listed on.
///
/// Parsed leniently: canonical tags (`chrome_extension`), the short scanner
/// names (`chrome`) and store names (`Chrome Web Store`) all map to the same
/// variant. Anything unrecognised becomes `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Marketplace {
    ChromeExtension,
    FirefoxAddon,
    ShopifyApp,
    WordpressPlugin,
    SlackApp,
    ZapierIntegration,
    AtlassianApp,
    SalesforceApp,
    HubspotApp,
    NotionIntegration,
    FigmaPlugin,
    VscodeExtension,
    IosApp,
    AndroidApp,
    MicrosoftApp,
    GumroadProduct,
    SaasProduct,
    SaasForSale,
    Other,
}

impl Marketplace {
    pub const ALL: [Marketplace; 19] = [
        Marketplace::ChromeExtension,
        Marketplace::FirefoxAddon,
        Marketplace::ShopifyApp,
        Marketplace::WordpressPlugin,
        Marketplace::SlackApp,
        Marketplace::ZapierIntegration,
        Marketplace::AtlassianApp,
        Marketplace::SalesforceApp,
        Marketplace::HubspotApp,
        Marketplace::NotionIntegration,
        Marketplace::FigmaPlugin,
        Marketplace::VscodeExtension,
        Marketplace::IosApp,
        Marketplace::AndroidApp,
        Marketplace::MicrosoftApp,
        Marketplace::GumroadProduct,
        Marketplace::SaasProduct,
        Marketplace::SaasForSale,
        Marketplace::Other,
    ];

    /// Canonical snake_case tag, as written in catalogs and config.
    pub fn tag(self) -> &'static str {
        match self {
            Marketplace::ChromeExtension => "chrome_extension",
            Marketplace::FirefoxAddon => "firefox_addon",
            Marketplace::ShopifyApp => "shopify_app",
            Marketplace::WordpressPlugin => "wordpress_plugin",
            Marketplace::SlackApp => "slack_app",
            Marketplace::ZapierIntegration => "zapier_integration",
            Marketplace::AtlassianApp => "atlassian_app",
            Marketplace::SalesforceApp => "salesforce_app",
            Marketplace::HubspotApp => "hubspot_app",
            Marketplace::NotionIntegration => "notion_integration",
            Marketplace::FigmaPlugin => "figma_plugin",
            Marketplace::VscodeExtension => "vscode_extension",
            Marketplace::IosApp => "ios_app",
            Marketplace::AndroidApp => "android_app",
            Marketplace::MicrosoftApp => "microsoft_app",
            Marketplace::GumroadProduct => "gumroad_product",
            Marketplace::SaasProduct => "saas_product",
            Marketplace::SaasForSale => "saas_forsale",
            Marketplace::Other => "other",
        }
    }

    /// Store name shown to users.
    pub fn display_name(self) -> &'static str {
        match self {
            Marketplace::ChromeExtension => "Chrome Web Store",
            Marketplace::FirefoxAddon => "Firefox Add-ons",
            Marketplace::ShopifyApp => "Shopify App Store",
            Marketplace::WordpressPlugin => "WordPress.org",
            Marketplace::SlackApp => "Slack App Directory",
            Marketplace::ZapierIntegration => "Zapier",
            Marketplace::AtlassianApp => "Atlassian Marketplace",
            Marketplace::SalesforceApp => "Salesforce AppExchange",
            Marketplace::HubspotApp => "HubSpot App Marketplace",
            Marketplace::NotionIntegration => "Notion Integrations",
            Marketplace::FigmaPlugin => "Figma Community",
            Marketplace::VscodeExtension => "VS Code Marketplace",
            Marketplace::IosApp => "iOS App Store",
            Marketplace::AndroidApp => "Google Play Store",
            Marketplace::MicrosoftApp => "Microsoft Store",
            Marketplace::GumroadProduct => "Gumroad",
            Marketplace::SaasProduct => "SaaS",
            Marketplace::SaasForSale => "Acquire.com",
            Marketplace::Other => "Other",
        }
    }

    /// True for marketplaces whose listings are browser extensions.
    pub fn is_browser_extension(self) -> bool {
        matches!(self, Marketplace::ChromeExtension | Marketplace::FirefoxAddon)
    }

    /// Parse a marketplace name. Never fails; unknown names map to `Other`.
    pub fn parse(s: &str) -> Self {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' || c == '.' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "chrome_extension" | "chrome" | "chrome_web_store" => Marketplace::ChromeExtension,
            "firefox_addon" | "firefox" | "firefox_add_ons" | "firefox_extension" => {
                Marketplace::FirefoxAddon
            }
            "shopify_app" | "shopify" | "shopify_app_store" => Marketplace::ShopifyApp,
            "wordpress_plugin" | "wordpress" | "wordpress_org" => Marketplace::WordpressPlugin,
            "slack_app" | "slack" | "slack_app_directory" => Marketplace::SlackApp,
            "zapier_integration" | "zapier" => Marketplace::ZapierIntegration,
            "atlassian_app" | "atlassian" | "atlassian_marketplace" => Marketplace::AtlassianApp,
            "salesforce_app" | "salesforce" | "salesforce_appexchange" => {
                Marketplace::SalesforceApp
            }
            "hubspot_app" | "hubspot" => Marketplace::HubspotApp,
            "notion_integration" | "notion" => Marketplace::NotionIntegration,
            "figma_plugin" | "figma" => Marketplace::FigmaPlugin,
            "vscode_extension" | "vscode" => Marketplace::VscodeExtension,
            "ios_app" | "ios" | "ios_app_store" => Marketplace::IosApp,
            "android_app" | "android" | "google_play_store" => Marketplace::AndroidApp,
            "microsoft_app" | "microsoft" | "microsoft_store" => Marketplace::MicrosoftApp,
            "gumroad_product" | "gumroad" => Marketplace::GumroadProduct,
            "saas_product" | "saas" => Marketplace::SaasProduct,
            "saas_forsale" | "acquire_com" | "flippa" => Marketplace::SaasForSale,
            _ => Marketplace::Other,
        }
    }
}

impl From<String> for Marketplace {
    fn from(s: String) -> Self {
        Marketplace::parse(&s)
    }
}

impl From<Marketplace> for String {
    fn from(m: Marketplace) -> Self {
        m.tag().to_string()
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Observed maintenance problems reported for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistressSignal {
    NoUpdates,
    BrokenSupport,
    ManifestV2,
    DecliningReviews,
    OwnerInactive,
}

impl DistressSignal {
    /// Contribution of this signal to the distress axis.
    pub fn weight(self) -> f64 {
        match self {
            DistressSignal::NoUpdates => 3.0,
            DistressSignal::BrokenSupport => 2.0,
            DistressSignal::ManifestV2 => 4.0,
            DistressSignal::DecliningReviews => 2.0,
            DistressSignal::OwnerInactive => 3.0,
        }
    }
}

/// Largest MRR the scoring core accepts. Anything above is capped so that
/// annual revenue times any multiple stays finite.
pub const MAX_MRR: f64 = 1e12;

/// Raw signals the scoring core works from.
///
/// Built with [`Asset::signals`], which coerces catalog values into range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSignals {
    pub user_count: u64,
    pub estimated_mrr: f64,
    pub last_updated_by_owner: Option<DateTime<Utc>>,
    pub rating: Option<f64>,
    pub marketplace: Marketplace,
    pub category: Option<String>,
    pub distress_signals: Vec<DistressSignal>,
}

impl AssetSignals {
    /// Signals with every field at its default for the given marketplace.
    pub fn new(marketplace: Marketplace) -> Self {
        Self {
            user_count: 0,
            estimated_mrr: 0.0,
            last_updated_by_owner: None,
            rating: None,
            marketplace,
            category: None,
            distress_signals: Vec::new(),
        }
    }

    /// MRR with negative and non-finite values treated as zero and huge
    /// values capped at [`MAX_MRR`].
    pub fn mrr(&self) -> f64 {
        if self.estimated_mrr.is_finite() && self.estimated_mrr > 0.0 {
            self.estimated_mrr.min(MAX_MRR)
        } else {
            0.0
        }
    }

    /// Rating clamped into [0, 5], or None if absent or not a number.
    pub fn clamped_rating(&self) -> Option<f64> {
        self.rating
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 5.0))
    }

    /// Whole days between the owner's last update and `as_of`.
    /// Updates dated after `as_of` count as zero days.
    pub fn days_since_update(&self, as_of: DateTime<Utc>) -> Option<u64> {
        self.last_updated_by_owner
            .map(|updated| (as_of - updated).num_days().max(0) as u64)
    }
}

/// A listing as stored in a catalog file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub marketplace: Marketplace,
    #[serde(default, alias = "users")]
    pub user_count: u64,
    #[serde(default)]
    pub estimated_mrr: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub developer: Option<String>,
    #[serde(default)]
    pub developer_email: Option<String>,
    #[serde(default)]
    pub distress_signals: Vec<DistressSignal>,
}

impl Asset {
    /// Minimal asset with the given id, name and marketplace.
    pub fn new(id: impl Into<String>, name: impl Into<String>, marketplace: Marketplace) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: String::new(),
            description: None,
            marketplace,
            user_count: 0,
            estimated_mrr: None,
            last_updated: None,
            rating: None,
            category: None,
            developer: None,
            developer_email: None,
            distress_signals: Vec::new(),
        }
    }

    /// Scoring inputs for this asset, with defaults substituted.
    pub fn signals(&self) -> AssetSignals {
        let estimated_mrr = match self.estimated_mrr {
            Some(mrr) if mrr.is_finite() && mrr >= 0.0 => mrr,
            Some(mrr) => {
                tracing::warn!(asset = %self.id, mrr, "estimated_mrr out of range, using 0");
                0.0
            }
            None => 0.0,
        };

        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                tracing::warn!(asset = %self.id, rating, "rating outside 0-5, clamping");
            }
        }

        // A signal reported twice still counts once
        let mut distress_signals: Vec<DistressSignal> = Vec::new();
        for signal in &self.distress_signals {
            if !distress_signals.contains(signal) {
                distress_signals.push(*signal);
            }
        }

        AssetSignals {
            user_count: self.user_count,
            estimated_mrr,
            last_updated_by_owner: self.last_updated,
            rating: self.rating,
            marketplace: self.marketplace,
            category: self.category.clone(),
            distress_signals,
        }
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s).map(Some).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}': expected RFC 3339 or YYYY-MM-DD", s))
}
