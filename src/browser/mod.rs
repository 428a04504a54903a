use anyhow::{Context, Result};

use crate::scoring::DisplayIdentity;

/// Open an asset's marketplace listing in the user's default browser
///
/// # Errors
/// Returns error if the identity is masked or has no listing URL, or if the
/// browser cannot be opened
pub fn open_listing(identity: &DisplayIdentity) -> Result<String> {
    if identity.masked {
        anyhow::bail!("Listing is hidden for this tier. Reveal it or upgrade to Scout");
    }
    let url = identity
        .url
        .as_deref()
        .context("Asset has no listing URL")?;
    open_url(url)?;
    Ok(url.to_string())
}

/// Open a URL in the user's default browser
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_identity_refused() {
        let identity = DisplayIdentity {
            name: "CMS Plugin #1042".to_string(),
            description: String::new(),
            url: None,
            masked: true,
        };
        let err = open_listing(&identity).unwrap_err();
        assert!(err.to_string().contains("hidden"));
    }

    #[test]
    fn test_missing_url_refused() {
        let identity = DisplayIdentity {
            name: "SEO Booster".to_string(),
            description: String::new(),
            url: None,
            masked: false,
        };
        let err = open_listing(&identity).unwrap_err();
        assert!(err.to_string().contains("no listing URL"));
    }
}
