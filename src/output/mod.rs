pub mod formatter;

pub use formatter::{
    format_asset_detail, format_money_compact, format_scored_table, format_staleness, format_tsv,
    format_valuation_range, should_use_colors, ScoredAsset,
};
