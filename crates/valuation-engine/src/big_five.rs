//! Big Five growth check: revenue, EPS, book value, operating cash flow and
//! free cash flow must compound at the pass rate for at least three of five.

use analysis_core::{AnalysisError, FinancialRecord, FinancialSeries, Grade, ValuationConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::growth::{GrowthAnalyzer, GrowthMetric};

pub const BIG_FIVE_TOTAL: u8 = 5;

/// Five metric histories on a shared fiscal-year index.
///
/// All five series must be the same length. With an empty `fiscal_years`
/// growth spans fall back to array positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BigFiveInput {
    #[serde(default)]
    pub fiscal_years: Vec<i32>,
    pub revenue: Vec<Option<f64>>,
    pub eps: Vec<Option<f64>>,
    pub equity: Vec<Option<f64>>,
    pub operating_cf: Vec<Option<f64>>,
    pub free_cf: Vec<Option<f64>>,
}

impl BigFiveInput {
    /// Extracts the five series from yearly records, sorting oldest first.
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        let mut sorted: Vec<&FinancialRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.fiscal_year);

        Self {
            fiscal_years: sorted.iter().map(|r| r.fiscal_year).collect(),
            revenue: sorted.iter().map(|r| r.revenue).collect(),
            eps: sorted.iter().map(|r| r.eps).collect(),
            equity: sorted.iter().map(|r| r.total_equity).collect(),
            operating_cf: sorted.iter().map(|r| r.operating_cash_flow).collect(),
            free_cf: sorted.iter().map(|r| r.free_cash_flow_or_derived()).collect(),
        }
    }

    /// Every series must line up with the others, years or not.
    fn check_lengths(&self) -> Result<(), AnalysisError> {
        let expected = self.revenue.len();
        let lengths = [
            ("eps", self.eps.len()),
            ("equity", self.equity.len()),
            ("operating_cf", self.operating_cf.len()),
            ("free_cf", self.free_cf.len()),
        ];
        if let Some((name, len)) = lengths.iter().find(|(_, len)| *len != expected) {
            return Err(AnalysisError::contract(format!(
                "{} has {} entries but revenue has {}",
                name, len, expected
            )));
        }
        Ok(())
    }

    fn series(&self, values: &[Option<f64>]) -> Result<FinancialSeries, AnalysisError> {
        if self.fiscal_years.is_empty() {
            Ok(FinancialSeries::from_values(values.iter().copied()))
        } else {
            FinancialSeries::with_years(&self.fiscal_years, values)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigFiveResult {
    pub revenue: GrowthMetric,
    pub eps: GrowthMetric,
    pub equity: GrowthMetric,
    pub operating_cf: GrowthMetric,
    pub free_cf: GrowthMetric,

    /// Number of passing metrics, 0-5
    pub score: u8,
    pub total: u8,
    pub passes: bool,
    pub grade: Grade,
}

impl BigFiveResult {
    pub fn metrics(&self) -> [&GrowthMetric; 5] {
        [&self.revenue, &self.eps, &self.equity, &self.operating_cf, &self.free_cf]
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "revenue": self.revenue.to_json(),
            "eps": self.eps.to_json(),
            "equity": self.equity.to_json(),
            "operating_cf": self.operating_cf.to_json(),
            "free_cf": self.free_cf.to_json(),
            "score": self.score,
            "total": self.total,
            "passes": self.passes,
            "grade": self.grade.as_str(),
        })
    }
}

/// Letter grade for a Big Five pass count.
pub fn grade_for_score(score: u8) -> Result<Grade, AnalysisError> {
    match score {
        5 => Ok(Grade::A),
        4 => Ok(Grade::B),
        3 => Ok(Grade::C),
        2 => Ok(Grade::D),
        0 | 1 => Ok(Grade::F),
        other => Err(AnalysisError::contract(format!(
            "Big Five score {} is outside 0..={}",
            other, BIG_FIVE_TOTAL
        ))),
    }
}

#[derive(Debug, Clone, Default)]
pub struct BigFiveScorer {
    config: ValuationConfig,
    analyzer: GrowthAnalyzer,
}

impl BigFiveScorer {
    pub fn new(config: ValuationConfig) -> Self {
        Self {
            analyzer: GrowthAnalyzer::new(config.clone()),
            config,
        }
    }

    /// Grades all five metrics. Fails only when the series do not line up
    /// with each other or with the fiscal-year index.
    pub fn calculate(&self, input: &BigFiveInput) -> Result<BigFiveResult, AnalysisError> {
        input.check_lengths()?;
        let revenue = self.analyzer.evaluate("Revenue", &input.series(&input.revenue)?);
        let eps = self.analyzer.evaluate("EPS", &input.series(&input.eps)?);
        let equity = self.analyzer.evaluate("Book Value", &input.series(&input.equity)?);
        let operating_cf = self
            .analyzer
            .evaluate("Operating Cash Flow", &input.series(&input.operating_cf)?);
        let free_cf = self.analyzer.evaluate("Free Cash Flow", &input.series(&input.free_cf)?);

        let score = [&revenue, &eps, &equity, &operating_cf, &free_cf]
            .iter()
            .filter(|m| m.passes)
            .count() as u8;

        Ok(BigFiveResult {
            revenue,
            eps,
            equity,
            operating_cf,
            free_cf,
            score,
            total: BIG_FIVE_TOTAL,
            passes: score >= self.config.big_five_pass_score,
            grade: grade_for_score(score)?,
        })
    }

    pub fn calculate_from_records(&self, records: &[FinancialRecord]) -> Result<BigFiveResult, AnalysisError> {
        let input = BigFiveInput::from_records(records);
        if input.fiscal_years.windows(2).any(|w| w[0] == w[1]) {
            return Err(AnalysisError::InvalidData(
                "duplicate fiscal year in financial records".to_string(),
            ));
        }
        self.calculate(&input)
    }
}
