pub mod asset;
pub mod browser;
pub mod config;
pub mod logging;
pub mod output;
pub mod report;
pub mod scoring;
