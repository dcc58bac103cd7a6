//! Split adjustment for per-share history.

use analysis_core::{FinancialRecord, FinancialSeries, StockSplit};

/// Product of the ratios of splits effective after `fiscal_year`. Ratios
/// at or below 1 are ignored.
pub fn split_factor(splits: &[StockSplit], fiscal_year: i32) -> f64 {
    splits
        .iter()
        .filter(|s| s.fiscal_year > fiscal_year && s.ratio.is_finite() && s.ratio > 1.0)
        .map(|s| s.ratio)
        .product()
}

/// Restates a per-share series in post-split units. Observations without
/// a fiscal year are left as filed.
pub fn adjust_per_share(series: &FinancialSeries, splits: &[StockSplit]) -> FinancialSeries {
    if splits.is_empty() {
        return series.clone();
    }
    series.map_values(|obs| match obs.fiscal_year {
        Some(year) => obs.value.map(|v| v / split_factor(splits, year)),
        None => obs.value,
    })
}

/// Restates EPS in each record in post-split units.
pub fn adjust_records(records: &[FinancialRecord], splits: &[StockSplit]) -> Vec<FinancialRecord> {
    records
        .iter()
        .map(|record| {
            let factor = split_factor(splits, record.fiscal_year);
            FinancialRecord {
                eps: record.eps.map(|eps| eps / factor),
                ..record.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn splits() -> Vec<StockSplit> {
        vec![
            StockSplit {
                fiscal_year: 2020,
                ratio: 2.0,
            },
            StockSplit {
                fiscal_year: 2022,
                ratio: 3.0,
            },
        ]
    }

    #[test]
    fn test_factor_counts_later_splits_only() {
        let splits = splits();
        assert_relative_eq!(split_factor(&splits, 2019), 6.0);
        assert_relative_eq!(split_factor(&splits, 2020), 3.0);
        assert_relative_eq!(split_factor(&splits, 2022), 1.0);
        assert_relative_eq!(split_factor(&[], 2010), 1.0);
    }

    #[test]
    fn test_reverse_split_ratio_is_ignored() {
        let splits = vec![StockSplit {
            fiscal_year: 2021,
            ratio: 0.5,
        }];
        assert_relative_eq!(split_factor(&splits, 2019), 1.0);
    }

    #[test]
    fn test_adjust_series() {
        let eps = FinancialSeries::with_years(&[2019, 2021, 2023], &[Some(12.0), Some(6.0), None]).unwrap();
        let adjusted = adjust_per_share(&eps, &splits());
        let values: Vec<Option<f64>> = adjusted.values().collect();
        assert_relative_eq!(values[0].unwrap(), 2.0);
        assert_relative_eq!(values[1].unwrap(), 2.0);
        assert!(values[2].is_none());
    }

    #[test]
    fn test_adjust_records_touches_eps_only() {
        let mut record = FinancialRecord::new(2019);
        record.eps = Some(9.0);
        record.revenue = Some(100.0);
        let adjusted = adjust_records(&[record], &splits());
        assert_relative_eq!(adjusted[0].eps.unwrap(), 1.5);
        assert_eq!(adjusted[0].revenue, Some(100.0));
    }
}
