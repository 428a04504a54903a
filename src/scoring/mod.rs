pub mod config;
pub mod content;
pub mod engine;
pub mod factors;
pub mod gating;
pub mod radar;
pub mod rationale;
pub mod validation;
pub mod valuation;

pub use config::*;
pub use content::{
    derive_content, format_usd, group_digits, AcquisitionPlaybook, ColdEmail, DerivedContent,
    NegotiationScript, OwnerContact,
};
pub use engine::{AssetAnalysis, HunterScoreEngine};
pub use factors::RangeOp;
pub use gating::{display_identity, gate_content, AccessTier, DisplayIdentity, Gated, GatedContent, UnlockReason};
pub use radar::{compute_overall_score, RadarScore};
pub use rationale::{explain, AxisRationale};
pub use validation::validate_scoring;
pub use valuation::{ConfidenceLevel, MrrPotential, ValuationBasis, ValuationEstimate};
