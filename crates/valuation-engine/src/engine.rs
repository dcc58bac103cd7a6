//! Full Rule #1 analysis of one company: Big Five, sticker price and the
//! Four Ms, folded into a single recommendation.

use analysis_core::stats::round_to;
use analysis_core::{AnalysisError, CompanyFinancials, FinancialSeries, Recommendation, ValuationConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::big_five::{BigFiveResult, BigFiveScorer};
use crate::four_ms::{FourMsEvaluator, FourMsInput, FourMsResult};
use crate::ratios::{self, RatioHistory};
use crate::sectors::{self, Sector};
use crate::splits;
use crate::sticker_price::{StickerPriceCalculator, StickerPriceOutcome, ValuationStatus};

/// Minimum yearly records before any analysis is attempted.
const MIN_RECORDS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOneAnalysis {
    pub symbol: String,
    pub name: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub current_price: Option<f64>,
    pub data_years: usize,
    pub sector: Sector,
    /// P/E used for the projection
    pub historical_pe: f64,

    pub big_five: BigFiveResult,
    pub ratios: RatioHistory,
    pub sticker_price: StickerPriceOutcome,
    /// Only evaluated when a sticker price could be projected
    pub four_ms: Option<FourMsResult>,

    pub valuation_status: ValuationStatus,
    pub valuation_note: Option<String>,
    pub recommendation: Option<Recommendation>,
}

impl RuleOneAnalysis {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "symbol": self.symbol,
            "name": self.name,
            "generated_at": self.generated_at.to_rfc3339(),
            "current_price": self.current_price.map(|p| round_to(p, 2)),
            "data_years": self.data_years,
            "sector": self.sector.as_str(),
            "historical_pe": round_to(self.historical_pe, 2),
            "big_five": self.big_five.to_json(),
            "ratios": self.ratios.to_json(),
            "sticker_price": self.sticker_price.to_json(),
            "four_ms": self.four_ms.as_ref().map(FourMsResult::to_json),
            "valuation_status": self.valuation_status,
            "valuation_note": self.valuation_note,
            "recommendation": self.recommendation,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    config: ValuationConfig,
    big_five: BigFiveScorer,
    sticker: StickerPriceCalculator,
    four_ms: FourMsEvaluator,
}

impl ValuationEngine {
    pub fn new(config: ValuationConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            big_five: BigFiveScorer::new(config.clone()),
            sticker: StickerPriceCalculator::new(config.clone()),
            four_ms: FourMsEvaluator::new(config.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ValuationConfig {
        &self.config
    }

    pub fn analyze(&self, company: &CompanyFinancials) -> Result<RuleOneAnalysis, AnalysisError> {
        let span = tracing::info_span!("rule_one", symbol = %company.symbol);
        let _enter = span.enter();

        if company.records.len() < MIN_RECORDS {
            return Err(AnalysisError::InsufficientData(format!(
                "{} has {} yearly records, need at least {}",
                company.symbol,
                company.records.len(),
                MIN_RECORDS
            )));
        }

        let mut records = splits::adjust_records(&company.records, &company.splits);
        records.sort_by_key(|r| r.fiscal_year);
        if let Some(pair) = records.windows(2).find(|w| w[0].fiscal_year == w[1].fiscal_year) {
            return Err(AnalysisError::InvalidData(format!(
                "{} has duplicate fiscal year {}",
                company.symbol, pair[0].fiscal_year
            )));
        }

        let big_five = self.big_five.calculate_from_records(&records)?;
        let failing: Vec<&str> = big_five
            .metrics()
            .iter()
            .filter(|m| !m.passes)
            .map(|m| m.name.as_str())
            .collect();
        tracing::debug!(score = big_five.score, passes = big_five.passes, ?failing, "Big Five scored");

        let ratios = RatioHistory::from_records(&records);
        let historical_pe = company
            .historical_pe
            .filter(|pe| pe.is_finite() && *pe > 0.0)
            .unwrap_or_else(|| ratios::historical_pe(&records, &self.config));

        let eps = FinancialSeries::from_pairs(records.iter().map(|r| (r.fiscal_year, r.eps)))?;
        let sticker_price = self.sticker.calculate_from_history(
            &eps,
            historical_pe,
            company.current_price,
            company.analyst_growth_rate,
        )?;

        let four_ms = match sticker_price.as_calculated() {
            Some(price) => {
                let input = FourMsInput::from_ratios(
                    Some(&company.symbol),
                    &ratios,
                    company.current_price,
                    Some(price.sticker_price),
                    big_five.score,
                );
                Some(self.four_ms.evaluate(&input)?)
            }
            None => {
                tracing::info!(
                    "Valuation not calculable: {}",
                    sticker_price.note().unwrap_or("unknown reason")
                );
                None
            }
        };

        let recommendation = match &four_ms {
            Some(result) => Some(result.recommendation),
            None => sticker_price.as_calculated().and_then(|p| p.recommendation),
        };

        tracing::info!(
            big_five = big_five.score,
            status = ?sticker_price.status(),
            recommendation = recommendation.map(|r| r.as_str()).unwrap_or("NONE"),
            "Rule #1 analysis complete"
        );

        Ok(RuleOneAnalysis {
            symbol: company.symbol.clone(),
            name: company.name.clone(),
            generated_at: Utc::now(),
            current_price: company.current_price,
            data_years: records.len(),
            sector: sectors::sector_for(&company.symbol),
            historical_pe,
            valuation_status: sticker_price.status(),
            valuation_note: sticker_price.note().map(str::to_string),
            big_five,
            ratios,
            sticker_price,
            four_ms,
            recommendation,
        })
    }
}
