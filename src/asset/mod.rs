pub mod catalog;
pub mod types;

pub use catalog::{load_catalog, load_catalogs};
pub use types::{Asset, AssetSignals, DistressSignal, Marketplace};
