use anyhow::{bail, Result};
use std::fmt;

/// Day-count range used by distress buckets.
///
/// Syntax: `<N`, `<=N`, `>N`, `>=N`, `N-M` (inclusive) or a bare `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64),
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if let Some((low, high)) = s.split_once('-') {
            if low.trim().is_empty() {
                bail!("Negative day counts are not allowed: {}", s);
            }
            let low: u64 = low.trim().parse()?;
            let high: u64 = high.trim().parse()?;
            if low > high {
                bail!("Range start is after range end: {}", s);
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

/// Users on a log10 scale, normalised so that `10^decades` users maps to 1.0.
pub fn log_reach(users: u64, decades: f64) -> f64 {
    if decades <= 0.0 {
        return 0.0;
    }
    let reach = ((users as f64) + 1.0).log10() / decades;
    clamp_unit(reach)
}

/// Clamp into [0, 1]; NaN becomes 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp into the radar axis range [0, 10]; NaN becomes 0.
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 10.0)
    }
}
