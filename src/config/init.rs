use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::{ensure_parent_dir, Config};
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# asset-hunter configuration
#
# tier: free | scout | hunter | syndicate
# catalogs: glob patterns for YAML or JSON asset catalogs
# scoring: overrides for the Hunter Radar; delete any key to use the default
";

/// Render the starter config with every scoring default spelled out.
pub fn default_config_yaml() -> Result<String> {
    let config = Config {
        catalogs: vec!["~/.config/asset-hunter/catalogs/*.yaml".to_string()],
        scoring: Some(ScoringConfig::explicit_defaults()),
        ..Config::default()
    };
    let body = serde_saphyr::to_string(&config).context("Failed to render default config")?;
    Ok(format!("{}\n{}", HEADER, body))
}

/// Write the starter config to `path`.
///
/// Refuses to replace an existing file unless `force` is set. The write is
/// atomic, so an interrupted run never leaves a half-written config behind.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    ensure_parent_dir(path)?;
    let yaml = default_config_yaml()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write config")?;
    file.commit().context("Failed to save config")?;

    Ok(())
}
