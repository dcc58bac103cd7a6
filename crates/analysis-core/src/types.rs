use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// One fiscal-year data point of a financial metric.
///
/// `None` means nothing was filed for that year. Zero and negative values
/// are real observations and are kept as such.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(fiscal_year: i32, value: Option<f64>) -> Self {
        Self {
            fiscal_year: Some(fiscal_year),
            value,
        }
    }
}

/// Yearly history of a single metric, oldest first.
///
/// Deserializes from a list of observations and rejects years out of order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Observation>", into = "Vec<Observation>")]
pub struct FinancialSeries {
    observations: Vec<Observation>,
}

/// A positive observation kept for growth math: array position, value and
/// fiscal year (when known).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositivePoint {
    pub index: usize,
    pub value: f64,
    pub fiscal_year: Option<i32>,
}

impl FinancialSeries {
    /// Series without fiscal years. Growth spans fall back to index gaps.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            observations: values
                .into_iter()
                .map(|value| Observation {
                    fiscal_year: None,
                    value,
                })
                .collect(),
        }
    }

    /// Convenience for fully populated histories.
    pub fn from_reported(values: &[f64]) -> Self {
        Self::from_values(values.iter().map(|v| Some(*v)))
    }

    /// Series keyed by fiscal year. Years must be strictly increasing and
    /// line up one-to-one with `values`.
    pub fn with_years(years: &[i32], values: &[Option<f64>]) -> Result<Self, AnalysisError> {
        if years.len() != values.len() {
            return Err(AnalysisError::contract(format!(
                "fiscal year index has {} entries but series has {}",
                years.len(),
                values.len()
            )));
        }
        Self::from_pairs(years.iter().copied().zip(values.iter().copied()))
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = (i32, Option<f64>)>,
    {
        let series = Self {
            observations: pairs
                .into_iter()
                .map(|(year, value)| Observation::new(year, value))
                .collect(),
        };
        series.validate()?;
        Ok(series)
    }

    /// Checks the oldest-first ordering of any fiscal years present.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let mut previous: Option<i32> = None;
        for year in self.observations.iter().filter_map(|o| o.fiscal_year) {
            if let Some(prev) = previous {
                if year <= prev {
                    return Err(AnalysisError::contract(format!(
                        "fiscal years must be strictly increasing (oldest first), got {} after {}",
                        year, prev
                    )));
                }
            }
            previous = Some(year);
        }
        Ok(())
    }

    /// Same years, values rewritten by `f`.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(&Observation) -> Option<f64>,
    {
        Self {
            observations: self
                .observations
                .iter()
                .map(|o| Observation {
                    fiscal_year: o.fiscal_year,
                    value: f(o),
                })
                .collect(),
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.observations.iter().map(|o| o.value)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Most recent filed value.
    pub fn latest(&self) -> Option<f64> {
        self.observations.iter().rev().find_map(|o| o.value)
    }

    /// Strictly positive observations in order.
    pub fn positive_points(&self) -> Vec<PositivePoint> {
        self.observations
            .iter()
            .enumerate()
            .filter_map(|(index, o)| match o.value {
                Some(value) if value > 0.0 => Some(PositivePoint {
                    index,
                    value,
                    fiscal_year: o.fiscal_year,
                }),
                _ => None,
            })
            .collect()
    }

    /// Years covered from first to last observation.
    pub fn span_years(&self) -> u32 {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) if self.observations.len() > 1 => {
                match (first.fiscal_year, last.fiscal_year) {
                    (Some(a), Some(b)) if b > a => b.abs_diff(a),
                    _ => (self.observations.len() - 1) as u32,
                }
            }
            _ => 0,
        }
    }
}

impl TryFrom<Vec<Observation>> for FinancialSeries {
    type Error = AnalysisError;

    fn try_from(observations: Vec<Observation>) -> Result<Self, Self::Error> {
        let series = Self { observations };
        series.validate()?;
        Ok(series)
    }
}

impl From<FinancialSeries> for Vec<Observation> {
    fn from(series: FinancialSeries) -> Self {
        series.observations
    }
}

/// Letter grade shared by every score in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// 85 / 70 / 55 / 40 banding on a 0-100 score.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Grade::A
        } else if score >= 70.0 {
            Grade::B
        } else if score >= 55.0 {
            Grade::C
        } else if score >= 40.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buy/hold/sell verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    Avoid,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG_BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
            Recommendation::Avoid => "AVOID",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Recommendation::StrongBuy | Recommendation::Buy)
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company financials for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub fiscal_year: i32,
    // Income statement
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub gross_profit: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    // Balance sheet
    #[serde(default)]
    pub total_assets: Option<f64>,
    #[serde(default)]
    pub total_liabilities: Option<f64>,
    #[serde(default)]
    pub total_equity: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
    // Cash flow statement
    #[serde(default)]
    pub operating_cash_flow: Option<f64>,
    #[serde(default)]
    pub capital_expenditure: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    /// Filed P/E ratio for the year, if the source reports one
    #[serde(default)]
    pub pe_ratio: Option<f64>,
}

impl FinancialRecord {
    pub fn new(fiscal_year: i32) -> Self {
        Self {
            fiscal_year,
            ..Default::default()
        }
    }

    /// Reported FCF, or operating cash flow less capital expenditure.
    /// Capex is subtracted as an outflow whichever sign the filer used.
    pub fn free_cash_flow_or_derived(&self) -> Option<f64> {
        self.free_cash_flow.or_else(|| match (self.operating_cash_flow, self.capital_expenditure) {
            (Some(ocf), Some(capex)) => Some(ocf - capex.abs()),
            _ => None,
        })
    }
}

/// A stock split effective in `fiscal_year`, e.g. ratio 4.0 for 4-for-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockSplit {
    pub fiscal_year: i32,
    pub ratio: f64,
}

/// Everything the engine needs to value one company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyFinancials {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Analyst EPS growth estimate as a decimal (0.12 = 12%)
    #[serde(default)]
    pub analyst_growth_rate: Option<f64>,
    /// Overrides the P/E average derived from the filed ratios
    #[serde(default)]
    pub historical_pe: Option<f64>,
    #[serde(default)]
    pub splits: Vec<StockSplit>,
    pub records: Vec<FinancialRecord>,
}
