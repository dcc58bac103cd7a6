//! Sticker price: projected EPS at a capped growth rate, times a bounded
//! P/E, discounted back at the required return. The margin-of-safety price
//! is a fixed fraction of it.

use analysis_core::stats::round_to;
use analysis_core::{AnalysisError, FinancialSeries, Recommendation, ValuationConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::growth::{self, PatternCounts, SeriesPattern};

/// Inputs for a sticker price with a pre-computed growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickerPriceInput {
    pub current_eps: f64,
    /// Historical EPS CAGR as a decimal
    pub eps_growth_rate: f64,
    pub historical_pe: f64,
    #[serde(default)]
    pub analyst_growth_rate: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
}

/// A computed sticker price with every intermediate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerPrice {
    pub current_eps: f64,
    pub eps_growth_rate: f64,
    pub used_growth_rate: f64,
    pub historical_pe: f64,

    pub future_eps: f64,
    pub future_pe: f64,
    pub future_price: f64,

    pub sticker_price: f64,
    pub margin_of_safety: f64,

    pub current_price: Option<f64>,
    /// Percent below the sticker price (negative = above)
    pub discount_to_sticker: Option<f64>,
    /// Percent below the MOS price (negative = above)
    pub discount_to_mos: Option<f64>,
    pub recommendation: Option<Recommendation>,
}

impl StickerPrice {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "status": ValuationStatus::Calculable,
            "current_eps": round_to(self.current_eps, 2),
            "eps_growth_rate": round_to(self.eps_growth_rate * 100.0, 2),
            "used_growth_rate": round_to(self.used_growth_rate * 100.0, 2),
            "historical_pe": round_to(self.historical_pe, 2),
            "future_eps": round_to(self.future_eps, 2),
            "future_pe": round_to(self.future_pe, 2),
            "future_price": round_to(self.future_price, 2),
            "sticker_price": round_to(self.sticker_price, 2),
            "margin_of_safety": round_to(self.margin_of_safety, 2),
            "current_price": self.current_price.map(|p| round_to(p, 2)),
            "discount_to_sticker": self.discount_to_sticker.map(|d| round_to(d, 2)),
            "discount_to_mos": self.discount_to_mos.map(|d| round_to(d, 2)),
            "recommendation": self.recommendation,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationStatus {
    Calculable,
    NotCalculable,
}

/// Result of the gated projection over a raw EPS history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StickerPriceOutcome {
    Calculated(StickerPrice),
    NotCalculable {
        reason: String,
        pattern: Option<SeriesPattern>,
    },
}

impl StickerPriceOutcome {
    pub fn status(&self) -> ValuationStatus {
        match self {
            StickerPriceOutcome::Calculated(_) => ValuationStatus::Calculable,
            StickerPriceOutcome::NotCalculable { .. } => ValuationStatus::NotCalculable,
        }
    }

    pub fn as_calculated(&self) -> Option<&StickerPrice> {
        match self {
            StickerPriceOutcome::Calculated(price) => Some(price),
            StickerPriceOutcome::NotCalculable { .. } => None,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            StickerPriceOutcome::Calculated(_) => None,
            StickerPriceOutcome::NotCalculable { reason, .. } => Some(reason),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            StickerPriceOutcome::Calculated(price) => price.to_json(),
            StickerPriceOutcome::NotCalculable { reason, pattern } => json!({
                "status": ValuationStatus::NotCalculable,
                "note": reason,
                "pattern": pattern,
            }),
        }
    }
}

/// Price ladder shared by the sticker price and the margin-of-safety factor:
/// below MOS is STRONG_BUY, below sticker BUY, below the sell premium HOLD,
/// otherwise SELL.
pub fn price_signal(current_price: f64, sticker_price: f64, config: &ValuationConfig) -> Recommendation {
    let mos = sticker_price * config.mos_fraction;
    if current_price < mos {
        Recommendation::StrongBuy
    } else if current_price < sticker_price {
        Recommendation::Buy
    } else if current_price < sticker_price * config.sell_premium {
        Recommendation::Hold
    } else {
        Recommendation::Sell
    }
}

#[derive(Debug, Clone, Default)]
pub struct StickerPriceCalculator {
    config: ValuationConfig,
}

impl StickerPriceCalculator {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// Projects a sticker price from a known growth rate.
    pub fn calculate(&self, input: &StickerPriceInput) -> Result<StickerPrice, AnalysisError> {
        for (label, value) in [
            ("current_eps", input.current_eps),
            ("eps_growth_rate", input.eps_growth_rate),
            ("historical_pe", input.historical_pe),
        ] {
            if !value.is_finite() {
                return Err(AnalysisError::contract(format!("{} must be finite, got {}", label, value)));
            }
        }
        let config = &self.config;

        let base_growth = match input.analyst_growth_rate {
            Some(analyst) if analyst.is_finite() => input.eps_growth_rate.min(analyst),
            _ => input.eps_growth_rate,
        };
        let used_growth_rate = base_growth.min(config.max_growth_rate).max(config.min_growth_rate);

        let future_eps = input.current_eps * (1.0 + used_growth_rate).powi(config.horizon());

        // e.g. 10% growth -> P/E 20
        let growth_pe = used_growth_rate * 100.0 * config.pe_growth_multiple;
        let future_pe = if input.historical_pe > 0.0 {
            growth_pe.min(input.historical_pe)
        } else {
            growth_pe
        }
        .min(config.max_pe)
        .max(config.min_pe);

        let future_price = future_eps * future_pe;
        let sticker_price = future_price / config.discount_factor();
        let margin_of_safety = sticker_price * config.mos_fraction;

        let mut result = StickerPrice {
            current_eps: input.current_eps,
            eps_growth_rate: input.eps_growth_rate,
            used_growth_rate,
            historical_pe: input.historical_pe,
            future_eps,
            future_pe,
            future_price,
            sticker_price,
            margin_of_safety,
            current_price: None,
            discount_to_sticker: None,
            discount_to_mos: None,
            recommendation: None,
        };

        if let Some(price) = input.current_price.filter(|p| *p > 0.0 && p.is_finite()) {
            result.current_price = Some(price);
            if sticker_price > 0.0 {
                result.discount_to_sticker = Some((sticker_price - price) / sticker_price * 100.0);
                result.discount_to_mos = Some((margin_of_safety - price) / margin_of_safety * 100.0);
            }
            result.recommendation = Some(price_signal(price, sticker_price, config));
        }

        Ok(result)
    }

    /// Projects from a raw EPS history, refusing histories whose growth
    /// rate would be meaningless (losses, sign flips, too few years).
    pub fn calculate_from_history(
        &self,
        eps_history: &FinancialSeries,
        historical_pe: f64,
        current_price: Option<f64>,
        analyst_growth_rate: Option<f64>,
    ) -> Result<StickerPriceOutcome, AnalysisError> {
        eps_history.validate()?;

        let counts = PatternCounts::of(eps_history);
        let pattern = counts.pattern(&self.config);
        let refusal = match pattern {
            SeriesPattern::NoData => Some("No EPS history available".to_string()),
            SeriesPattern::Negative => Some(format!(
                "EPS negative in {} of {} reported years - company is loss-making",
                counts.negative,
                counts.total_valid()
            )),
            SeriesPattern::Inconsistent => Some(format!(
                "EPS sign flips ({} negative of {} reported years) - growth rate unreliable",
                counts.negative,
                counts.total_valid()
            )),
            SeriesPattern::Normal if counts.positive < 2 => {
                Some("Need at least two positive EPS years to project growth".to_string())
            }
            SeriesPattern::Normal => None,
        };
        if let Some(reason) = refusal {
            tracing::debug!(?pattern, "sticker price not calculable: {}", reason);
            return Ok(StickerPriceOutcome::NotCalculable {
                reason,
                pattern: Some(pattern),
            });
        }

        let current_eps = match eps_history.latest() {
            Some(eps) if eps > 0.0 => eps,
            _ => {
                return Ok(StickerPriceOutcome::NotCalculable {
                    reason: "Latest EPS is not positive".to_string(),
                    pattern: Some(pattern),
                })
            }
        };

        let price = self.calculate(&StickerPriceInput {
            current_eps,
            eps_growth_rate: growth::cagr(eps_history),
            historical_pe,
            analyst_growth_rate,
            current_price,
        })?;
        Ok(StickerPriceOutcome::Calculated(price))
    }
}
