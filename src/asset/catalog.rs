use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::types::Asset;

/// Catalog files are either a bare list of assets or `{ assets: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { assets: Vec<Asset> },
    List(Vec<Asset>),
}

impl CatalogFile {
    fn into_assets(self) -> Vec<Asset> {
        match self {
            CatalogFile::Wrapped { assets } => assets,
            CatalogFile::List(assets) => assets,
        }
    }
}

/// Load assets from a single catalog file.
///
/// `.json` files are parsed as JSON, anything else as YAML.
pub fn load_catalog(path: &Path) -> Result<Vec<Asset>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog at {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let catalog: CatalogFile = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: invalid YAML in {}", path.display()))?
    };

    let assets = catalog.into_assets();
    tracing::debug!(path = %path.display(), count = assets.len(), "loaded catalog");
    Ok(assets)
}

/// Replace a leading `~/` with the home directory.
fn expand_home(pattern: &str) -> String {
    match (pattern.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
        _ => pattern.to_string(),
    }
}

/// Expand glob patterns and load every matching catalog.
///
/// Assets are de-duplicated by id; the first occurrence wins. A pattern that
/// matches nothing is an error so typos don't silently produce empty lists.
pub fn load_catalogs(patterns: &[String]) -> Result<Vec<Asset>> {
    if patterns.is_empty() {
        bail!("No catalogs configured. Pass --catalog <path> or add `catalogs` to the config file");
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let pattern = expand_home(pattern);
        let matches: Vec<PathBuf> = glob::glob(&pattern)
            .with_context(|| format!("Invalid catalog pattern '{}'", pattern))?
            .filter_map(|entry| entry.ok())
            .filter(|p| p.is_file())
            .collect();

        if matches.is_empty() {
            bail!("Catalog pattern '{}' matched no files", pattern);
        }
        for path in matches {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    let mut seen_ids = HashSet::new();
    let mut assets = Vec::new();
    for path in &paths {
        for asset in load_catalog(path)? {
            if seen_ids.insert(asset.id.clone()) {
                assets.push(asset);
            } else {
                tracing::warn!(id = %asset.id, path = %path.display(), "duplicate asset id, keeping first");
            }
        }
    }

    Ok(assets)
}
