use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use asset_hunter::asset::Asset;
use asset_hunter::output::ScoredAsset;
use asset_hunter::report::{plan_reveal, RevealPlan};
use asset_hunter::scoring::{
    display_identity, gate_content, AccessTier, AssetAnalysis, HunterScoreEngine,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_CATALOG: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List assets ranked by Hunter score (default if no subcommand)
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show the full radar breakdown for an asset by its index number
    Show {
        /// Index number of the asset (1-based, as shown in list)
        index: usize,
        /// Spend a reveal credit to unlock identity and intelligence
        #[arg(long)]
        reveal: bool,
    },
    /// Open an asset's marketplace listing in browser by its index number
    Open {
        /// Index number of the asset (1-based, as shown in list)
        index: usize,
    },
    /// Write a JSON report of every ranked asset
    Export {
        /// Destination file
        path: PathBuf,
        /// Spend one reveal credit per asset the tier does not unlock
        #[arg(long)]
        reveal_all: bool,
    },
    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "asset-hunter")]
#[command(about = "Rank distressed software assets for acquisition", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/asset-hunter/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Catalog file or glob pattern (repeatable, replaces config catalogs)
    #[arg(long = "catalog", global = true)]
    catalogs: Vec<String>,

    /// Override the tier from the config file
    #[arg(long, global = true)]
    tier: Option<AccessTier>,

    /// Measure staleness from this RFC 3339 time instead of now
    #[arg(long, global = true)]
    as_of: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_as_of(value: Option<&str>) -> Result<DateTime<Utc>, humantime::TimestampError> {
    match value {
        Some(s) => humantime::parse_rfc3339_weak(s).map(DateTime::<Utc>::from),
        None => Ok(Utc::now()),
    }
}

/// Resolve a 1-based index or exit with a usage error
fn pick(index: usize, len: usize) -> usize {
    if index < 1 || index > len {
        eprintln!("Invalid index {}. Must be between 1 and {}.", index, len);
        std::process::exit(EXIT_USAGE);
    }
    index - 1
}

fn main() {
    let cli = Cli::parse();
    asset_hunter::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::List {
        format: OutputFormat::Table,
    });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = match config_path
            .clone()
            .map(Ok)
            .unwrap_or_else(asset_hunter::config::get_config_path)
        {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = asset_hunter::config::write_default_config(&path, force) {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match asset_hunter::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let tier = cli.tier.unwrap_or(config.tier);

    // Validate scoring config at startup
    let effective_scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = asset_hunter::scoring::validate_scoring(&effective_scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let as_of = match parse_as_of(cli.as_of.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid --as-of: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    };

    let patterns = if cli.catalogs.is_empty() {
        config.catalogs.clone()
    } else {
        cli.catalogs.clone()
    };
    let assets = match asset_hunter::asset::load_catalogs(&patterns) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Catalog error: {:#}", e);
            std::process::exit(EXIT_CATALOG);
        }
    };

    tracing::debug!(
        assets = assets.len(),
        %tier,
        reveal_credits = config.reveal_credits,
        as_of = %as_of.to_rfc3339(),
        "loaded catalogs"
    );

    let engine = HunterScoreEngine::new(effective_scoring, as_of);
    let mut ranked: Vec<(Asset, AssetAnalysis)> = assets
        .into_iter()
        .map(|asset| {
            let analysis = engine.analyze(&asset);
            (asset, analysis)
        })
        .collect();

    // Sort by overall score descending, then bigger audience, then id for stable output
    ranked.sort_by(|a, b| {
        b.1.overall_score
            .cmp(&a.1.overall_score)
            .then_with(|| b.0.user_count.cmp(&a.0.user_count))
            .then_with(|| a.0.id.cmp(&b.0.id))
    });

    let use_colors = asset_hunter::output::should_use_colors();

    match command {
        Commands::List { format } => {
            let rows: Vec<ScoredAsset> = ranked
                .iter()
                .map(|(asset, analysis)| ScoredAsset {
                    asset,
                    analysis,
                    identity: display_identity(asset, tier, false),
                })
                .collect();

            match format {
                OutputFormat::Table => {
                    println!(
                        "{}",
                        asset_hunter::output::format_scored_table(&rows, use_colors)
                    );
                }
                OutputFormat::Tsv => {
                    let output = asset_hunter::output::format_tsv(&rows);
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
                OutputFormat::Json => {
                    let refs: Vec<(&Asset, &AssetAnalysis)> =
                        ranked.iter().map(|(a, r)| (a, r)).collect();
                    let report =
                        asset_hunter::report::build_report(&refs, tier, false, as_of, Utc::now());
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Failed to render report: {}", e);
                            std::process::exit(EXIT_CATALOG);
                        }
                    }
                }
            }

            if cli.verbose {
                eprintln!();
                eprintln!("Total: {} assets in {:?}", ranked.len(), start_time.elapsed());
            }
        }
        Commands::Show { index, reveal } => {
            let (asset, analysis) = &ranked[pick(index, ranked.len())];

            let plan = if reveal {
                plan_reveal(1, tier, config.reveal_credits)
            } else {
                RevealPlan::Covered
            };
            if let RevealPlan::Insufficient { .. } = plan {
                eprintln!("No reveal credits left. Upgrade to Hunter or add reveal_credits to the config.");
                std::process::exit(EXIT_USAGE);
            }
            let has_reveal_credit = plan.uses_credits();

            let scored = ScoredAsset {
                asset,
                analysis,
                identity: display_identity(asset, tier, has_reveal_credit),
            };
            let content = gate_content(tier, has_reveal_credit, analysis.content.clone());
            println!(
                "{}",
                asset_hunter::output::format_asset_detail(&scored, &content, use_colors)
            );

            if let RevealPlan::Spend { remaining, .. } = plan {
                eprintln!("{} reveal credit(s) remaining after this reveal", remaining);
            }
        }
        Commands::Open { index } => {
            let (asset, _analysis) = &ranked[pick(index, ranked.len())];
            let identity = display_identity(asset, tier, false);

            match asset_hunter::browser::open_listing(&identity) {
                Ok(url) => println!("Opening {} in browser: {}", identity.name, url),
                Err(e) => {
                    eprintln!("Cannot open listing: {}", e);
                    std::process::exit(EXIT_USAGE);
                }
            }
        }
        Commands::Export { path, reveal_all } => {
            if reveal_all {
                if let RevealPlan::Insufficient { needed, available } =
                    plan_reveal(ranked.len(), tier, config.reveal_credits)
                {
                    eprintln!(
                        "Revealing all {} assets needs {} credits but only {} are available.",
                        ranked.len(),
                        needed,
                        available
                    );
                    std::process::exit(EXIT_USAGE);
                }
            }

            let refs: Vec<(&Asset, &AssetAnalysis)> =
                ranked.iter().map(|(a, r)| (a, r)).collect();
            let report =
                asset_hunter::report::build_report(&refs, tier, reveal_all, as_of, Utc::now());

            if let Err(e) = asset_hunter::report::save_report(&path, &report) {
                eprintln!("Export error: {:#}", e);
                std::process::exit(EXIT_CATALOG);
            }

            println!(
                "Exported {} assets to {}",
                report.entries.len(),
                path.display()
            );
            if report.credits_consumed > 0 {
                eprintln!("{} reveal credit(s) consumed", report.credits_consumed);
            }
        }
        Commands::Init { .. } => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
