//! Ratio histories derived from raw yearly statements.
//!
//! Ratios with a non-positive denominator are `None`: dividing by negative
//! equity would flip the sign and read as a healthy return.

use analysis_core::stats::{mean, round_to};
use analysis_core::{FinancialRecord, ValuationConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Share of operating income kept after tax in the ROIC approximation.
const AFTER_TAX_SHARE: f64 = 0.75;

/// Yearly ratios, oldest first, aligned with `fiscal_years`. Percentages
/// are in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioHistory {
    pub fiscal_years: Vec<i32>,
    pub revenue: Vec<Option<f64>>,
    pub net_income: Vec<Option<f64>>,
    pub free_cash_flow: Vec<Option<f64>>,
    pub gross_margin: Vec<Option<f64>>,
    pub operating_margin: Vec<Option<f64>>,
    pub net_margin: Vec<Option<f64>>,
    pub roe: Vec<Option<f64>>,
    pub roa: Vec<Option<f64>>,
    pub roic: Vec<Option<f64>>,
    pub debt_to_equity: Vec<Option<f64>>,
}

impl RatioHistory {
    pub fn from_records(records: &[FinancialRecord]) -> Self {
        let mut sorted: Vec<&FinancialRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.fiscal_year);

        let mut history = Self::default();
        for record in sorted {
            let revenue = record.revenue.filter(|r| *r > 0.0);
            let equity = record.total_equity.filter(|e| *e > 0.0);
            let assets = record.total_assets.filter(|a| *a > 0.0);

            history.fiscal_years.push(record.fiscal_year);
            history.revenue.push(record.revenue);
            history.net_income.push(record.net_income);
            history.free_cash_flow.push(record.free_cash_flow_or_derived());
            history.gross_margin.push(pct(record.gross_profit, revenue));
            history.operating_margin.push(pct(record.operating_income, revenue));
            history.net_margin.push(pct(record.net_income, revenue));
            history.roe.push(pct(record.net_income, equity));
            history.roa.push(pct(record.net_income, assets));
            history.roic.push(roic(record));
            history
                .debt_to_equity
                .push(record.total_debt.zip(equity).map(|(debt, equity)| debt / equity));
        }
        history
    }

    pub fn len(&self) -> usize {
        self.fiscal_years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fiscal_years.is_empty()
    }

    /// Average and latest value of each ratio, `null` where nothing was
    /// derivable.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "gross_margin": ratio_json(&self.gross_margin),
            "operating_margin": ratio_json(&self.operating_margin),
            "net_margin": ratio_json(&self.net_margin),
            "roe": ratio_json(&self.roe),
            "roa": ratio_json(&self.roa),
            "roic": ratio_json(&self.roic),
            "debt_to_equity": ratio_json(&self.debt_to_equity),
        })
    }
}

fn ratio_json(values: &[Option<f64>]) -> serde_json::Value {
    let filed: Vec<f64> = values.iter().flatten().copied().collect();
    let latest = values.iter().rev().flatten().next().copied();
    json!({
        "avg": (!filed.is_empty()).then(|| round_to(mean(&filed), 2)),
        "latest": latest.map(|v| round_to(v, 2)),
    })
}

fn pct(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    numerator.zip(denominator).map(|(n, d)| n / d * 100.0)
}

/// After-tax operating income over equity plus debt.
fn roic(record: &FinancialRecord) -> Option<f64> {
    let operating_income = record.operating_income?;
    let invested = record.total_equity? + record.total_debt.unwrap_or(0.0);
    (invested > 0.0).then(|| operating_income * AFTER_TAX_SHARE / invested * 100.0)
}

/// Average of the positive filed P/E ratios, or the configured default.
pub fn historical_pe(records: &[FinancialRecord], config: &ValuationConfig) -> f64 {
    let filed: Vec<f64> = records
        .iter()
        .filter_map(|r| r.pe_ratio)
        .filter(|pe| pe.is_finite() && *pe > 0.0)
        .collect();
    if filed.is_empty() {
        config.default_historical_pe
    } else {
        mean(&filed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(year: i32) -> FinancialRecord {
        FinancialRecord {
            fiscal_year: year,
            revenue: Some(200.0),
            gross_profit: Some(80.0),
            operating_income: Some(40.0),
            net_income: Some(25.0),
            total_assets: Some(500.0),
            total_equity: Some(125.0),
            total_debt: Some(75.0),
            operating_cash_flow: Some(35.0),
            capital_expenditure: Some(-10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_ratios_from_statements() {
        let history = RatioHistory::from_records(&[record(2022)]);
        assert_relative_eq!(history.gross_margin[0].unwrap(), 40.0);
        assert_relative_eq!(history.operating_margin[0].unwrap(), 20.0);
        assert_relative_eq!(history.net_margin[0].unwrap(), 12.5);
        assert_relative_eq!(history.roe[0].unwrap(), 20.0);
        assert_relative_eq!(history.roa[0].unwrap(), 5.0);
        assert_relative_eq!(history.roic[0].unwrap(), 15.0);
        assert_relative_eq!(history.debt_to_equity[0].unwrap(), 0.6);
        assert_relative_eq!(history.free_cash_flow[0].unwrap(), 25.0);
    }

    #[test]
    fn test_negative_equity_leaves_gaps() {
        let mut r = record(2023);
        r.total_equity = Some(-40.0);
        let history = RatioHistory::from_records(&[r]);
        assert!(history.roe[0].is_none());
        assert!(history.debt_to_equity[0].is_none());
        // equity + debt is still positive
        assert_relative_eq!(history.roic[0].unwrap(), 30.0 / 35.0 * 100.0);
    }

    #[test]
    fn test_zero_revenue_has_no_margins() {
        let mut r = record(2023);
        r.revenue = Some(0.0);
        let history = RatioHistory::from_records(&[r]);
        assert!(history.gross_margin[0].is_none());
        assert!(history.net_margin[0].is_none());
        assert_eq!(history.revenue[0], Some(0.0));
    }

    #[test]
    fn test_sorted_oldest_first() {
        let history = RatioHistory::from_records(&[record(2024), record(2021), record(2022)]);
        assert_eq!(history.fiscal_years, vec![2021, 2022, 2024]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_historical_pe() {
        let config = ValuationConfig::default();
        let mut records: Vec<FinancialRecord> = (2020..2023).map(record).collect();
        assert_relative_eq!(historical_pe(&records, &config), 15.0);

        records[0].pe_ratio = Some(12.0);
        records[1].pe_ratio = Some(-8.0);
        records[2].pe_ratio = Some(18.0);
        assert_relative_eq!(historical_pe(&records, &config), 15.0);

        records[1].pe_ratio = Some(24.0);
        assert_relative_eq!(historical_pe(&records, &config), 18.0);
    }

    #[test]
    fn test_json_reports_average_and_latest() {
        let mut older = record(2021);
        older.net_income = Some(15.0);
        let mut newer = record(2022);
        newer.total_equity = Some(-10.0);
        let json = RatioHistory::from_records(&[older, newer]).to_json();

        assert_eq!(json["net_margin"]["avg"], 10.0);
        assert_eq!(json["net_margin"]["latest"], 12.5);
        assert_eq!(json["roa"]["latest"], 5.0);
        assert_eq!(json["roic"]["avg"].as_f64().map(|v| v > 15.0), Some(true));
        // negative equity leaves the latest ROE undefined, so the older one is reported
        assert_eq!(json["roe"]["avg"], 12.0);
        assert_eq!(json["roe"]["latest"], 12.0);
        assert!(RatioHistory::default().to_json()["roa"]["avg"].is_null());
    }
}
