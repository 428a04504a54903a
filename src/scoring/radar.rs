use serde::{Deserialize, Serialize};

use super::factors::clamp_axis;

/// The five Hunter Radar axes, each in [0, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarScore {
    pub distress: f64,
    pub monetization_gap: f64,
    pub technical_risk: f64,
    pub market_position: f64,
    pub flip_potential: f64,
}

impl RadarScore {
    /// Build a score, clamping every axis into [0, 10].
    pub fn new(
        distress: f64,
        monetization_gap: f64,
        technical_risk: f64,
        market_position: f64,
        flip_potential: f64,
    ) -> Self {
        Self {
            distress: clamp_axis(distress),
            monetization_gap: clamp_axis(monetization_gap),
            technical_risk: clamp_axis(technical_risk),
            market_position: clamp_axis(market_position),
            flip_potential: clamp_axis(flip_potential),
        }
    }

    /// Axes in display order with their labels.
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("Distress", self.distress),
            ("Monetization Gap", self.monetization_gap),
            ("Technical Risk", self.technical_risk),
            ("Market Position", self.market_position),
            ("Flip Potential", self.flip_potential),
        ]
    }
}

/// Mean of the five axes scaled to 0-100 and rounded.
pub fn compute_overall_score(score: &RadarScore) -> u8 {
    let sum: f64 = score.axes().iter().map(|(_, v)| clamp_axis(*v)).sum();
    let overall = (sum / 5.0 * 10.0).round();
    overall.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_axes() {
        let score = RadarScore::new(12.0, -3.0, f64::NAN, 5.0, 10.0);
        assert_eq!(score.distress, 10.0);
        assert_eq!(score.monetization_gap, 0.0);
        assert_eq!(score.technical_risk, 0.0);
        assert_eq!(score.market_position, 5.0);
    }

    #[test]
    fn test_overall_mean_scaled() {
        let score = RadarScore::new(8.0, 10.0, 3.0, 7.0, 9.0);
        // (8 + 10 + 3 + 7 + 9) / 5 * 10 = 74
        assert_eq!(compute_overall_score(&score), 74);
    }

    #[test]
    fn test_overall_rounds_to_nearest() {
        let score = RadarScore::new(5.05, 5.0, 5.0, 5.0, 5.0);
        // 25.05 / 5 * 10 = 50.1
        assert_eq!(compute_overall_score(&score), 50);

        let score = RadarScore::new(7.5, 7.5, 7.5, 7.5, 7.6);
        // 37.6 / 5 * 10 = 75.2
        assert_eq!(compute_overall_score(&score), 75);
    }

    #[test]
    fn test_overall_bounds() {
        assert_eq!(compute_overall_score(&RadarScore::new(0.0, 0.0, 0.0, 0.0, 0.0)), 0);
        assert_eq!(compute_overall_score(&RadarScore::new(10.0, 10.0, 10.0, 10.0, 10.0)), 100);
    }

    #[test]
    fn test_overall_ignores_out_of_range_fields() {
        // Fields set directly, bypassing new()
        let score = RadarScore {
            distress: 50.0,
            monetization_gap: f64::NAN,
            technical_risk: 10.0,
            market_position: 10.0,
            flip_potential: 10.0,
        };
        assert_eq!(compute_overall_score(&score), 80);
    }
}
