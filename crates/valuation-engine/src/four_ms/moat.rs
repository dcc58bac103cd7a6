use std::collections::BTreeMap;

use analysis_core::stats::{average_nonzero, is_consistent, round_to, thirds_change_pct};
use analysis_core::{FactorScore, Grade};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::rounded_breakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginTrend {
    Growing,
    Stable,
    Declining,
}

impl MarginTrend {
    /// First third against last third of the filed values; moves within
    /// 10% either way are stable.
    pub fn of(values: &[Option<f64>]) -> Self {
        match thirds_change_pct(values) {
            Some(change) if change > 10.0 => MarginTrend::Growing,
            Some(change) if change < -10.0 => MarginTrend::Declining,
            _ => MarginTrend::Stable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarginTrend::Growing => "Growing",
            MarginTrend::Stable => "Stable",
            MarginTrend::Declining => "Declining",
        }
    }
}

/// Moat: durable competitive advantage read from returns and margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoatScore {
    /// Average of the valid ROE years, `None` when none remain
    pub roe_avg: Option<f64>,
    pub roe_consistent: bool,
    pub gross_margin_avg: f64,
    pub gross_margin_trend: MarginTrend,
    pub operating_margin_avg: f64,

    pub score: f64,
    pub grade: Grade,
    pub notes: Vec<String>,
    pub score_breakdown: BTreeMap<String, f64>,
}

impl MoatScore {
    /// ROE level (30), ROE consistency (20), gross margin level (20),
    /// gross margin trend (15) and operating margin (15).
    ///
    /// `valid_roe` must already have sentinel values removed; `sentinel_dropped`
    /// says whether any were.
    pub fn compute(
        valid_roe: &[Option<f64>],
        sentinel_dropped: bool,
        gross_margin: &[Option<f64>],
        operating_margin: &[Option<f64>],
    ) -> Self {
        let mut notes = Vec::new();
        let mut breakdown = BTreeMap::new();
        let roe_years = valid_roe.iter().flatten().count();

        let roe_avg = (roe_years > 0).then(|| average_nonzero(valid_roe));
        let roe_level = match roe_avg {
            Some(avg) => {
                let (points, label) = if avg >= 20.0 {
                    (30.0, format!("Excellent ROE of {:.1}% indicates strong moat", avg))
                } else if avg >= 15.0 {
                    (24.0, format!("Good ROE of {:.1}% suggests competitive advantage", avg))
                } else if avg >= 10.0 {
                    (18.0, format!("Moderate ROE of {:.1}%", avg))
                } else if avg >= 5.0 {
                    (12.0, format!("Below-average ROE of {:.1}%", avg))
                } else {
                    (6.0, format!("Weak ROE of {:.1}% - no evident moat", avg))
                };
                notes.push(label);
                points
            }
            None => {
                notes.push("ROE unavailable (negative equity from stock buybacks)".to_string());
                15.0
            }
        };
        breakdown.insert("ROE Level".to_string(), roe_level);

        let roe_consistent = roe_years >= 2 && is_consistent(valid_roe, 15.0);
        let roe_consistency = if roe_years >= 2 {
            if roe_consistent {
                notes.push("Consistent ROE > 15% shows durable advantage".to_string());
                20.0
            } else if is_consistent(valid_roe, 10.0) {
                12.0
            } else {
                6.0
            }
        } else {
            if sentinel_dropped && roe_avg.is_some() {
                notes.push("ROE consistency cannot be measured (negative equity)".to_string());
            }
            10.0
        };
        breakdown.insert("ROE Consistency".to_string(), roe_consistency);

        let gross_margin_avg = average_nonzero(gross_margin);
        let gm_level = if gross_margin_avg >= 40.0 {
            notes.push("High gross margins indicate pricing power".to_string());
            20.0
        } else if gross_margin_avg >= 30.0 {
            15.0
        } else if gross_margin_avg >= 20.0 {
            10.0
        } else if gross_margin_avg >= 10.0 {
            6.0
        } else {
            3.0
        };
        breakdown.insert("Gross Margin Level".to_string(), gm_level);

        let gross_margin_trend = MarginTrend::of(gross_margin);
        let gm_trend = match gross_margin_trend {
            MarginTrend::Growing => {
                notes.push("Expanding gross margins - strengthening moat".to_string());
                15.0
            }
            MarginTrend::Stable => 10.0,
            MarginTrend::Declining => {
                notes.push("Declining gross margins - potential moat erosion".to_string());
                5.0
            }
        };
        breakdown.insert("Gross Margin Trend".to_string(), gm_trend);

        let operating_margin_avg = average_nonzero(operating_margin);
        let om = if operating_margin_avg >= 25.0 {
            notes.push("Excellent operating efficiency".to_string());
            15.0
        } else if operating_margin_avg >= 15.0 {
            12.0
        } else if operating_margin_avg >= 10.0 {
            8.0
        } else if operating_margin_avg >= 5.0 {
            5.0
        } else {
            2.0
        };
        breakdown.insert("Operating Margin".to_string(), om);

        let score = roe_level + roe_consistency + gm_level + gm_trend + om;

        Self {
            roe_avg,
            roe_consistent,
            gross_margin_avg,
            gross_margin_trend,
            operating_margin_avg,
            score,
            grade: Grade::from_score(score),
            notes,
            score_breakdown: breakdown,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "roe_avg": self.roe_avg.map(|v| round_to(v, 2)),
            "roe_consistent": self.roe_consistent,
            "gross_margin_avg": round_to(self.gross_margin_avg, 2),
            "gross_margin_trend": self.gross_margin_trend.as_str(),
            "operating_margin_avg": round_to(self.operating_margin_avg, 2),
            "score": round_to(self.score, 1),
            "grade": self.grade.as_str(),
            "notes": self.notes,
            "score_breakdown": rounded_breakdown(&self.score_breakdown),
        })
    }
}

impl FactorScore for MoatScore {
    fn name(&self) -> &'static str {
        "Moat"
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn notes(&self) -> &[String] {
        &self.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat(value: f64, n: usize) -> Vec<Option<f64>> {
        vec![Some(value); n]
    }

    #[test]
    fn test_wide_moat() {
        let gm = vec![Some(40.0), Some(42.0), Some(44.0), Some(46.0), Some(48.0), Some(50.0)];
        let result = MoatScore::compute(&flat(22.0, 6), false, &gm, &flat(26.0, 6));
        assert_relative_eq!(result.score, 100.0);
        assert_eq!(result.gross_margin_trend, MarginTrend::Growing);
        assert!(result.roe_consistent);
        assert_eq!(result.grade, Grade::A);
        assert!(result.notes[0].starts_with("Excellent ROE of 22.0%"));
    }

    #[test]
    fn test_no_valid_roe_gets_neutral_points() {
        let result = MoatScore::compute(&[None, None, None], true, &flat(25.0, 3), &flat(12.0, 3));
        assert!(result.roe_avg.is_none());
        assert_relative_eq!(result.score_breakdown["ROE Level"], 15.0);
        assert_relative_eq!(result.score_breakdown["ROE Consistency"], 10.0);
        assert_eq!(result.notes[0], "ROE unavailable (negative equity from stock buybacks)");
        // 15 + 10 + 10 (gm) + 10 (stable) + 8 (om)
        assert_relative_eq!(result.score, 53.0);
    }

    #[test]
    fn test_single_valid_roe_after_sentinel_drop() {
        let result = MoatScore::compute(&[None, Some(18.0), None], true, &flat(35.0, 3), &flat(16.0, 3));
        assert_eq!(result.roe_avg, Some(18.0));
        assert_relative_eq!(result.score_breakdown["ROE Consistency"], 10.0);
        assert!(result
            .notes
            .iter()
            .any(|n| n == "ROE consistency cannot be measured (negative equity)"));
    }

    #[test]
    fn test_declining_margins() {
        let gm = vec![Some(30.0), Some(28.0), Some(24.0), Some(22.0), Some(20.0), Some(18.0)];
        let result = MoatScore::compute(&flat(8.0, 6), false, &gm, &flat(3.0, 6));
        assert_eq!(result.gross_margin_trend, MarginTrend::Declining);
        assert_relative_eq!(result.score_breakdown["ROE Level"], 12.0);
        assert_relative_eq!(result.score_breakdown["ROE Consistency"], 6.0);
        assert_relative_eq!(result.score_breakdown["Gross Margin Trend"], 5.0);
        assert_relative_eq!(result.score_breakdown["Operating Margin"], 2.0);
    }

    #[test]
    fn test_trend_needs_three_points() {
        assert_eq!(MarginTrend::of(&[Some(10.0), Some(50.0)]), MarginTrend::Stable);
        assert_eq!(MarginTrend::of(&[Some(10.0), Some(10.5), Some(10.9)]), MarginTrend::Stable);
    }
}
