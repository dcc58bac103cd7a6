use std::collections::BTreeMap;

use analysis_core::stats::{coefficient_of_variation, positive_share_pct, round_to};
use analysis_core::{FactorScore, Grade};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::rounded_breakdown;
use crate::sectors;

/// Meaning: how predictable the business is from its own history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictabilityScore {
    /// 100 - revenue CoV, floored at 0
    pub revenue_stability: f64,
    /// Percent of filed years with positive net income
    pub earnings_consistency: f64,
    /// 100 - CoV of the profitable years, floored at 0
    pub net_income_stability: f64,
    /// Years of history against a ten-year target, capped at 100
    pub data_quality: f64,
    pub years_of_data: usize,

    pub sector: Option<String>,
    pub sector_note: Option<String>,

    pub score: f64,
    pub grade: Grade,
    pub notes: Vec<String>,
    pub score_breakdown: BTreeMap<String, f64>,
}

impl PredictabilityScore {
    /// Four 25-point components: revenue stability, profitable years,
    /// earnings stability and length of history.
    pub fn compute(symbol: Option<&str>, revenue: &[Option<f64>], net_income: &[Option<f64>]) -> Self {
        let mut notes = Vec::new();
        let mut breakdown = BTreeMap::new();

        let revenue_cv = coefficient_of_variation(revenue);
        let (stability_score, note) = if revenue_cv < 15.0 {
            (25.0, "Highly stable revenue - predictable business")
        } else if revenue_cv < 25.0 {
            (20.0, "Stable revenue stream")
        } else if revenue_cv < 40.0 {
            (15.0, "Moderate revenue volatility")
        } else if revenue_cv < 60.0 {
            (10.0, "Revenue shows significant volatility")
        } else {
            (5.0, "Highly volatile revenue - harder to predict")
        };
        notes.push(note.to_string());
        breakdown.insert("Revenue Stability".to_string(), stability_score);

        let earnings_pct = positive_share_pct(net_income);
        let (earnings_score, note) = if earnings_pct >= 100.0 {
            (25.0, Some("Profitable every year - strong earnings quality"))
        } else if earnings_pct >= 80.0 {
            (20.0, Some("Profitable most years"))
        } else if earnings_pct >= 60.0 {
            (15.0, None)
        } else if earnings_pct >= 40.0 {
            (10.0, Some("Inconsistent profitability"))
        } else {
            (5.0, Some("Frequently unprofitable - high risk"))
        };
        notes.extend(note.map(str::to_string));
        breakdown.insert("Earnings Consistency".to_string(), earnings_score);

        // CoV already ignores loss years
        let ni_cv = coefficient_of_variation(net_income);
        let (ni_score, note) = if ni_cv < 20.0 {
            (25.0, Some("Highly predictable earnings"))
        } else if ni_cv < 35.0 {
            (20.0, Some("Stable earnings pattern"))
        } else if ni_cv < 50.0 {
            (15.0, None)
        } else if ni_cv < 70.0 {
            (10.0, Some("Volatile earnings - harder to predict"))
        } else {
            (5.0, Some("Highly volatile earnings"))
        };
        notes.extend(note.map(str::to_string));
        breakdown.insert("Net Income Stability".to_string(), ni_score);

        let years_of_data = revenue
            .iter()
            .flatten()
            .count()
            .max(net_income.iter().flatten().count());
        let (data_score, note) = match years_of_data {
            10.. => (25.0, None),
            7..=9 => (20.0, None),
            5..=6 => (15.0, Some(format!("Limited history ({} years)", years_of_data))),
            3..=4 => (
                10.0,
                Some(format!("Short history ({} years) - less certainty", years_of_data)),
            ),
            _ => (5.0, Some("Insufficient data for confident analysis".to_string())),
        };
        notes.extend(note);
        breakdown.insert("Data Quality".to_string(), data_score);

        let (sector, sector_note) = match symbol {
            Some(symbol) => {
                let profile = sectors::profile_for_symbol(symbol);
                notes.push(format!("Sector: {}", profile.display_name));
                (
                    Some(profile.display_name.to_string()),
                    Some(profile.investment_note.to_string()),
                )
            }
            None => (None, None),
        };

        let score = stability_score + earnings_score + ni_score + data_score;

        Self {
            revenue_stability: 100.0 - revenue_cv.min(100.0),
            earnings_consistency: earnings_pct,
            net_income_stability: 100.0 - ni_cv.min(100.0),
            data_quality: (years_of_data as f64 * 10.0).min(100.0),
            years_of_data,
            sector,
            sector_note,
            score,
            grade: Grade::from_score(score),
            notes,
            score_breakdown: breakdown,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "revenue_stability": round_to(self.revenue_stability, 1),
            "earnings_consistency": round_to(self.earnings_consistency, 1),
            "net_income_stability": round_to(self.net_income_stability, 1),
            "data_quality": round_to(self.data_quality, 1),
            "sector": self.sector,
            "sector_note": self.sector_note,
            "score": round_to(self.score, 1),
            "grade": self.grade.as_str(),
            "notes": self.notes,
            "score_breakdown": rounded_breakdown(&self.score_breakdown),
        })
    }
}

impl FactorScore for PredictabilityScore {
    fn name(&self) -> &'static str {
        "Meaning"
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

    fn steady(n: usize, start: f64) -> Vec<Option<f64>> {
        (0..n).map(|i| Some(start + i as f64)).collect()
    }

    #[test]
    fn test_steady_decade_scores_full_marks() {
        let result = PredictabilityScore::compute(None, &steady(10, 100.0), &steady(10, 50.0));
        assert_relative_eq!(result.score, 100.0);
        assert_eq!(result.grade, Grade::A);
        assert_eq!(result.years_of_data, 10);
        assert_relative_eq!(result.data_quality, 100.0);
        assert!(result.sector.is_none());
    }

    #[test]
    fn test_loss_years_hurt_consistency_not_stability() {
        let ni = vec![Some(10.0), Some(-5.0), Some(10.0), Some(10.0), Some(-2.0)];
        let result = PredictabilityScore::compute(None, &steady(5, 100.0), &ni);
        assert_relative_eq!(result.earnings_consistency, 60.0);
        assert_relative_eq!(result.score_breakdown["Earnings Consistency"], 15.0);
        // the three profitable years are identical
        assert_relative_eq!(result.score_breakdown["Net Income Stability"], 25.0);
        assert_relative_eq!(result.score_breakdown["Data Quality"], 15.0);
        assert!(result.notes.iter().any(|n| n == "Limited history (5 years)"));
    }

    #[test]
    fn test_missing_history_is_low_confidence() {
        let result = PredictabilityScore::compute(None, &[None, Some(100.0)], &[None, None]);
        assert_relative_eq!(result.score_breakdown["Revenue Stability"], 5.0);
        assert_relative_eq!(result.score_breakdown["Earnings Consistency"], 5.0);
        assert_relative_eq!(result.score_breakdown["Data Quality"], 5.0);
        assert_relative_eq!(result.score, 20.0);
        assert_eq!(result.grade, Grade::F);
    }

    #[test]
    fn test_sector_context_is_attached_but_not_scored() {
        let plain = PredictabilityScore::compute(None, &steady(8, 100.0), &steady(8, 20.0));
        let tagged = PredictabilityScore::compute(Some("renata"), &steady(8, 100.0), &steady(8, 20.0));
        assert_relative_eq!(plain.score, tagged.score);
        assert_eq!(tagged.sector.as_deref(), Some("Pharmaceuticals"));
        assert_eq!(tagged.notes.last().map(String::as_str), Some("Sector: Pharmaceuticals"));
    }
}
