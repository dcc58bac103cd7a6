use std::collections::BTreeMap;

use analysis_core::stats::{average_nonzero, is_consistent, round_to};
use analysis_core::{FactorScore, Grade};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::rounded_breakdown;

/// Management: capital allocation, leverage and cash conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementScore {
    pub roe_above_15: bool,
    /// Average D/E, `None` when equity was never positive
    pub debt_to_equity: Option<f64>,
    pub debt_reasonable: bool,
    /// Average FCF over average net income, `None` without profits
    pub fcf_to_ni_ratio: Option<f64>,

    pub score: f64,
    pub grade: Grade,
    pub notes: Vec<String>,
    pub score_breakdown: BTreeMap<String, f64>,
}

impl ManagementScore {
    /// ROE consistency (34), debt management (33) and cash generation (33).
    ///
    /// `valid_roe` and `valid_de` must already have undefined values removed.
    pub fn compute(
        valid_roe: &[Option<f64>],
        valid_de: &[Option<f64>],
        free_cash_flow: &[Option<f64>],
        net_income: &[Option<f64>],
    ) -> Self {
        let mut notes = Vec::new();
        let mut breakdown = BTreeMap::new();

        let roe_years = valid_roe.iter().flatten().count();
        let roe_above_15 = roe_years >= 2 && is_consistent(valid_roe, 15.0);
        let roe_points = if roe_years < 2 {
            notes.push("Capital allocation hard to measure (negative equity from buybacks)".to_string());
            17.0
        } else if roe_above_15 {
            notes.push("Consistent ROE > 15% shows good capital allocation".to_string());
            34.0
        } else if is_consistent(valid_roe, 10.0) {
            24.0
        } else if average_nonzero(valid_roe) >= 10.0 {
            16.0
        } else {
            8.0
        };
        breakdown.insert("ROE Consistency".to_string(), roe_points);

        let de_years = valid_de.iter().flatten().count();
        let (debt_to_equity, debt_reasonable, debt_points) = if de_years == 0 {
            notes.push("Debt/equity ratio N/A (negative equity)".to_string());
            (None, true, 20.0)
        } else {
            let avg = average_nonzero(valid_de);
            let (points, note) = if avg < 0.3 {
                (33.0, "Very low debt provides financial flexibility")
            } else if avg < 0.5 {
                (26.0, "Conservative debt levels")
            } else if avg < 1.0 {
                (18.0, "Moderate debt - monitor carefully")
            } else if avg < 2.0 {
                (10.0, "Elevated debt levels")
            } else {
                (5.0, "High debt is a concern")
            };
            notes.push(note.to_string());
            (Some(avg), avg < 0.5, points)
        };
        breakdown.insert("Debt Management".to_string(), debt_points);

        let ni_avg = average_nonzero(net_income);
        let fcf_to_ni_ratio = (ni_avg > 0.0).then(|| average_nonzero(free_cash_flow) / ni_avg);
        let ratio = fcf_to_ni_ratio.unwrap_or(0.0);
        let (cash_points, note) = if ratio >= 1.0 {
            (33.0, Some("FCF exceeds net income - high quality earnings"))
        } else if ratio >= 0.8 {
            (26.0, Some("Strong free cash flow generation"))
        } else if ratio >= 0.5 {
            (18.0, None)
        } else if ratio >= 0.2 {
            (10.0, Some("Weak cash conversion"))
        } else {
            (5.0, Some("Poor cash generation vs earnings"))
        };
        notes.extend(note.map(str::to_string));
        breakdown.insert("Cash Generation".to_string(), cash_points);

        let score = roe_points + debt_points + cash_points;

        Self {
            roe_above_15,
            debt_to_equity,
            debt_reasonable,
            fcf_to_ni_ratio,
            score,
            grade: Grade::from_score(score),
            notes,
            score_breakdown: breakdown,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "roe_above_15": self.roe_above_15,
            "debt_to_equity": self.debt_to_equity.map(|v| round_to(v, 2)),
            "debt_reasonable": self.debt_reasonable,
            "fcf_to_ni_ratio": self.fcf_to_ni_ratio.map(|v| round_to(v, 2)),
            "score": round_to(self.score, 1),
            "grade": self.grade.as_str(),
            "notes": self.notes,
            "score_breakdown": rounded_breakdown(&self.score_breakdown),
        })
    }
}

impl FactorScore for ManagementScore {
    fn name(&self) -> &'static str {
        "Management"
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn notes(&self) -> &[String] {
        &self.notes
    }
}
