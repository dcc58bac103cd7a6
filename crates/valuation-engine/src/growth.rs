//! Growth series analysis: sign-pattern classification and compound annual
//! growth over a yearly history.

use analysis_core::stats::round_to;
use analysis_core::{FinancialSeries, ValuationConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Sign pattern of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeriesPattern {
    Normal,
    /// Mostly negative: the business is burning cash or losing money
    Negative,
    /// Mixed signs: growth can be computed but cannot be trusted
    Inconsistent,
    NoData,
}

/// Sign counts of a series. Missing and zero values are counted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCounts {
    pub positive: usize,
    pub negative: usize,
    pub zero_null: usize,
}

impl PatternCounts {
    pub fn of(series: &FinancialSeries) -> Self {
        let mut counts = PatternCounts {
            positive: 0,
            negative: 0,
            zero_null: 0,
        };
        for value in series.values() {
            match value {
                Some(v) if v > 0.0 => counts.positive += 1,
                Some(v) if v < 0.0 => counts.negative += 1,
                _ => counts.zero_null += 1,
            }
        }
        counts
    }

    pub fn total_valid(&self) -> usize {
        self.positive + self.negative
    }

    pub fn negative_share(&self) -> Option<f64> {
        match self.total_valid() {
            0 => None,
            total => Some(self.negative as f64 / total as f64),
        }
    }

    pub fn pattern(&self, config: &ValuationConfig) -> SeriesPattern {
        match self.negative_share() {
            None => SeriesPattern::NoData,
            Some(share) if share >= config.negative_share => SeriesPattern::Negative,
            Some(share) if share >= config.inconsistent_share => SeriesPattern::Inconsistent,
            Some(_) => SeriesPattern::Normal,
        }
    }
}

/// Growth verdict for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowthStatus {
    Strong,
    Pass,
    Weak,
    Fail,
    Negative,
    Inconsistent,
    NoData,
}

impl GrowthStatus {
    /// Graded at basis-point precision, the precision `cagr_pct` is
    /// reported at, so a displayed 10.00% never reads as a miss.
    pub fn from_cagr(cagr: f64, config: &ValuationConfig) -> Self {
        let cagr = round_to(cagr, 4);
        if cagr >= config.strong_growth {
            GrowthStatus::Strong
        } else if cagr >= config.pass_growth {
            GrowthStatus::Pass
        } else if cagr >= config.weak_growth {
            GrowthStatus::Weak
        } else {
            GrowthStatus::Fail
        }
    }

    pub fn passes(&self) -> bool {
        matches!(self, GrowthStatus::Strong | GrowthStatus::Pass)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStatus::Strong => "STRONG",
            GrowthStatus::Pass => "PASS",
            GrowthStatus::Weak => "WEAK",
            GrowthStatus::Fail => "FAIL",
            GrowthStatus::Negative => "NEGATIVE",
            GrowthStatus::Inconsistent => "INCONSISTENT",
            GrowthStatus::NoData => "NO_DATA",
        }
    }
}

/// Evaluated growth of a single metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetric {
    pub name: String,
    pub values: FinancialSeries,
    /// Years between the first and last observation
    pub years: u32,
    /// Decimal CAGR; `None` when growth is undefined
    pub cagr: Option<f64>,
    pub status: GrowthStatus,
    pub passes: bool,
    pub note: Option<String>,
}

impl GrowthMetric {
    pub fn cagr_pct(&self) -> Option<f64> {
        self.cagr.map(|c| c * 100.0)
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "values": self.values.values().map(|v| v.map(|x| round_to(x, 2))).collect::<Vec<_>>(),
            "years": self.years,
            "cagr_pct": self.cagr_pct().map(|p| round_to(p, 2)),
            "passes": self.passes,
            "status": self.status.as_str(),
            "note": self.note,
        })
    }
}

/// Compound annual growth between the first and last positive observation.
///
/// The span is the fiscal-year gap between those two points when both carry
/// a year, otherwise their index gap. Returns 0.0 with fewer than two
/// positive points or a non-positive span.
pub fn cagr(series: &FinancialSeries) -> f64 {
    let points = series.positive_points();
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() >= 2 => (*first, *last),
        _ => return 0.0,
    };

    let span = match (first.fiscal_year, last.fiscal_year) {
        (Some(start), Some(end)) => f64::from(end) - f64::from(start),
        _ => (last.index - first.index) as f64,
    };
    compound_rate(first.value, last.value, span)
}

/// CAGR over a plain value list, spanning array positions.
pub fn cagr_by_index(values: &[Option<f64>]) -> f64 {
    cagr(&FinancialSeries::from_values(values.iter().copied()))
}

fn compound_rate(start: f64, end: f64, span: f64) -> f64 {
    if span <= 0.0 || start <= 0.0 {
        return 0.0;
    }
    let rate = (end / start).powf(1.0 / span) - 1.0;
    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

/// Classifies series and grades their growth.
#[derive(Debug, Clone, Default)]
pub struct GrowthAnalyzer {
    config: ValuationConfig,
}

impl GrowthAnalyzer {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, series: &FinancialSeries) -> SeriesPattern {
        PatternCounts::of(series).pattern(&self.config)
    }

    pub fn evaluate(&self, name: &str, series: &FinancialSeries) -> GrowthMetric {
        let counts = PatternCounts::of(series);
        let pattern = counts.pattern(&self.config);
        tracing::trace!(
            metric = name,
            positive = counts.positive,
            negative = counts.negative,
            zero_null = counts.zero_null,
            ?pattern,
            "classified growth series"
        );

        let (cagr, status, note) = match pattern {
            SeriesPattern::NoData => (None, GrowthStatus::NoData, Some("No filed values".to_string())),
            SeriesPattern::Negative => (
                None,
                GrowthStatus::Negative,
                Some(format!(
                    "Negative in {} of {} reported years - cash burning, growth not scored",
                    counts.negative,
                    counts.total_valid()
                )),
            ),
            SeriesPattern::Inconsistent => {
                let rate = cagr(series);
                (
                    Some(rate),
                    GrowthStatus::Inconsistent,
                    Some(format!(
                        "Sign flips ({} negative of {} reported years) - {:.1}% CAGR on positive years shown but not passed",
                        counts.negative,
                        counts.total_valid(),
                        rate * 100.0
                    )),
                )
            }
            SeriesPattern::Normal if counts.positive < 2 => (
                None,
                GrowthStatus::NoData,
                Some("Fewer than two positive years - growth undefined".to_string()),
            ),
            SeriesPattern::Normal => {
                let rate = cagr(series);
                (Some(rate), GrowthStatus::from_cagr(rate, &self.config), None)
            }
        };

        GrowthMetric {
            name: name.to_string(),
            values: series.clone(),
            years: series.span_years(),
            cagr,
            status,
            passes: status.passes(),
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn analyzer() -> GrowthAnalyzer {
        GrowthAnalyzer::default()
    }

    #[test]
    fn test_flat_series_fails() {
        let metric = analyzer().evaluate("Revenue", &FinancialSeries::from_reported(&[100.0, 100.0, 100.0]));
        assert_relative_eq!(metric.cagr.unwrap(), 0.0);
        assert_eq!(metric.status, GrowthStatus::Fail);
        assert!(!metric.passes);
    }

    #[test]
    fn test_doubling_in_one_year_is_strong() {
        let metric = analyzer().evaluate("Revenue", &FinancialSeries::from_reported(&[100.0, 200.0]));
        assert_relative_eq!(metric.cagr.unwrap(), 1.0);
        assert_eq!(metric.status, GrowthStatus::Strong);
        assert!(metric.passes);
    }

    #[test]
    fn test_span_uses_fiscal_years_not_index() {
        let series = FinancialSeries::with_years(&[2018, 2023], &[Some(100.0), Some(200.0)]).unwrap();
        let expected = 2f64.powf(1.0 / 5.0) - 1.0;
        assert_relative_eq!(cagr(&series), expected, epsilon = 1e-12);
        assert_eq!(analyzer().evaluate("EPS", &series).years, 5);
    }

    #[test]
    fn test_span_skips_filtered_years_by_fiscal_gap() {
        // 2019 is a loss year; the gap from 2018 to 2021 is still three years
        let series = FinancialSeries::with_years(
            &[2018, 2019, 2020, 2021],
            &[Some(100.0), Some(-10.0), None, Some(133.1)],
        )
        .unwrap();
        assert_relative_eq!(cagr(&series), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_index_fallback() {
        assert_relative_eq!(cagr_by_index(&[Some(100.0), None, Some(121.0)]), 0.1, epsilon = 1e-9);
        assert_relative_eq!(cagr_by_index(&[Some(100.0)]), 0.0);
        assert_relative_eq!(cagr_by_index(&[]), 0.0);
    }

    #[test]
    fn test_thirty_percent_negative_is_inconsistent() {
        let values = [1.0, -1.0, 2.0, -1.0, 3.0, 4.0, -2.0, 5.0, 6.0, 7.0];
        let series = FinancialSeries::from_reported(&values);
        assert_eq!(analyzer().classify(&series), SeriesPattern::Inconsistent);
    }

    #[test]
    fn test_twenty_percent_negative_is_normal() {
        let values = [1.0, -1.0, 2.0, 3.0, 3.5, 4.0, -2.0, 5.0, 6.0, 7.0];
        let series = FinancialSeries::from_reported(&values);
        assert_eq!(analyzer().classify(&series), SeriesPattern::Normal);
    }

    #[test]
    fn test_seventy_percent_negative_is_negative() {
        let values = [-1.0, -2.0, 3.0, -1.0, -4.0, 5.0, -2.0, -3.0, 6.0, -1.0];
        let series = FinancialSeries::from_reported(&values);
        assert_eq!(analyzer().classify(&series), SeriesPattern::Negative);

        // one fewer loss year drops back to inconsistent
        let mut softer = values;
        softer[9] = 7.0;
        let series = FinancialSeries::from_reported(&softer);
        assert_eq!(analyzer().classify(&series), SeriesPattern::Inconsistent);
    }

    #[test]
    fn test_extreme_fiscal_years_do_not_overflow() {
        let series = FinancialSeries::with_years(&[i32::MIN, i32::MAX], &[Some(1.0), Some(2.0)]).unwrap();
        assert_eq!(series.span_years(), u32::MAX);
        let rate = cagr(&series);
        assert!(rate.is_finite() && rate > 0.0 && rate < 1e-6);
    }

    #[test]
    fn test_mostly_negative_is_not_scored() {
        let series = FinancialSeries::from_reported(&[-5.0, -4.0, -6.0, -3.0, 2.0]);
        let metric = analyzer().evaluate("Free Cash Flow", &series);
        assert_eq!(metric.status, GrowthStatus::Negative);
        assert!(metric.cagr.is_none());
        assert!(!metric.passes);
        assert!(metric.to_json()["cagr_pct"].is_null());
    }

    #[test]
    fn test_inconsistent_fails_even_with_high_cagr() {
        // positive years grow 100 -> 300 over two index steps (~73% CAGR)
        let series = FinancialSeries::from_reported(&[100.0, -50.0, 300.0]);
        let metric = analyzer().evaluate("EPS", &series);
        assert_eq!(metric.status, GrowthStatus::Inconsistent);
        assert!(metric.cagr.unwrap() > 0.15);
        assert!(!metric.passes);
        assert!(metric.note.is_some());
    }

    #[test]
    fn test_empty_and_all_missing_are_no_data() {
        let metric = analyzer().evaluate("Revenue", &FinancialSeries::from_values(vec![None, Some(0.0)]));
        assert_eq!(metric.status, GrowthStatus::NoData);
        assert!(metric.cagr.is_none());

        let metric = analyzer().evaluate("Revenue", &FinancialSeries::default());
        assert_eq!(metric.status, GrowthStatus::NoData);
        assert_eq!(metric.years, 0);
    }

    #[test]
    fn test_single_positive_year_is_no_data() {
        let metric = analyzer().evaluate("Revenue", &FinancialSeries::from_values(vec![None, Some(50.0)]));
        assert_eq!(metric.status, GrowthStatus::NoData);
        assert!(!metric.passes);
    }

    #[test]
    fn test_status_thresholds() {
        let config = ValuationConfig::default();
        assert_eq!(GrowthStatus::from_cagr(0.15, &config), GrowthStatus::Strong);
        assert_eq!(GrowthStatus::from_cagr(0.10, &config), GrowthStatus::Pass);
        assert_eq!(GrowthStatus::from_cagr(0.05, &config), GrowthStatus::Weak);
        assert_eq!(GrowthStatus::from_cagr(0.049, &config), GrowthStatus::Fail);
    }

    #[test]
    fn test_status_graded_at_reported_precision() {
        let config = ValuationConfig::default();
        // 100 -> 146.4 over four years is 9.998%, reported as 10.00%
        let rate = cagr(&FinancialSeries::from_reported(&[100.0, 110.0, 121.0, 133.1, 146.4]));
        assert!(rate < 0.10);
        assert_eq!(GrowthStatus::from_cagr(rate, &config), GrowthStatus::Pass);
        assert_eq!(GrowthStatus::from_cagr(0.0994, &config), GrowthStatus::Weak);
    }

    #[test]
    fn test_to_json_rounds_values() {
        let series = FinancialSeries::from_values(vec![Some(1.23456), None, Some(2.0)]);
        let json = analyzer().evaluate("EPS", &series).to_json();
        assert_eq!(json["values"][0], json!(1.23));
        assert!(json["values"][1].is_null());
        assert_eq!(json["status"], "STRONG");
    }
}
