use analysis_core::stats::round_to;
use analysis_core::{FactorScore, Grade, Recommendation, ValuationConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::sticker_price::price_signal;

/// Margin of safety: where the live price sits against the sticker price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginOfSafetyScore {
    pub current_price: Option<f64>,
    pub sticker_price: Option<f64>,
    pub margin_of_safety: Option<f64>,
    /// Percent below the sticker price (negative = above)
    pub discount_pct: Option<f64>,

    pub score: f64,
    pub grade: Grade,
    /// Price ladder verdict, `None` without a usable price pair
    pub signal: Option<Recommendation>,
    pub notes: Vec<String>,
}

impl MarginOfSafetyScore {
    pub fn compute(current_price: Option<f64>, sticker_price: Option<f64>, config: &ValuationConfig) -> Self {
        let usable = |v: Option<f64>| v.filter(|p| p.is_finite() && *p > 0.0);
        let margin_of_safety = usable(sticker_price).map(|s| s * config.mos_fraction);

        let (price, sticker) = match (usable(current_price), usable(sticker_price)) {
            (Some(price), Some(sticker)) => (price, sticker),
            _ => {
                let score = 10.0;
                return Self {
                    current_price,
                    sticker_price,
                    margin_of_safety,
                    discount_pct: None,
                    score,
                    grade: Grade::from_score(score),
                    signal: None,
                    notes: vec!["No price comparison possible - margin of safety unknown".to_string()],
                };
            }
        };

        let mos = sticker * config.mos_fraction;
        let discount = (sticker - price) / sticker * 100.0;
        let mut notes = Vec::new();

        let score = if price < mos {
            notes.push(format!("Price is {:.1}% below Sticker Price - excellent value!", discount));
            notes.push("Trading below Margin of Safety - maximum safety".to_string());
            100.0
        } else if price < sticker {
            notes.push(format!("Price is {:.1}% below Sticker Price - good value", discount));
            50.0 + 40.0 * (sticker - price) / (sticker - mos)
        } else if price < sticker * config.fair_value_band {
            notes.push("Price is near fair value - hold position".to_string());
            40.0
        } else if price < sticker * config.sell_premium {
            notes.push("Slightly overvalued - consider taking profits".to_string());
            25.0
        } else {
            notes.push("Significantly overvalued - consider selling".to_string());
            10.0
        };

        Self {
            current_price,
            sticker_price,
            margin_of_safety,
            discount_pct: Some(discount),
            score,
            grade: Grade::from_score(score),
            signal: Some(price_signal(price, sticker, config)),
            notes,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "current_price": self.current_price.map(|v| round_to(v, 2)),
            "sticker_price": self.sticker_price.map(|v| round_to(v, 2)),
            "margin_of_safety": self.margin_of_safety.map(|v| round_to(v, 2)),
            "discount_pct": self.discount_pct.map(|v| round_to(v, 2)),
            "score": round_to(self.score, 1),
            "grade": self.grade.as_str(),
            "recommendation": self.signal,
            "notes": self.notes,
        })
    }
}

impl FactorScore for MarginOfSafetyScore {
    fn name(&self) -> &'static str {
        "Margin of Safety"
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

    fn mos(price: f64) -> MarginOfSafetyScore {
        MarginOfSafetyScore::compute(Some(price), Some(100.0), &ValuationConfig::default())
    }

    #[test]
    fn test_price_bands() {
        let cheap = mos(40.0);
        assert_relative_eq!(cheap.score, 100.0);
        assert_eq!(cheap.signal, Some(Recommendation::StrongBuy));
        assert_relative_eq!(cheap.discount_pct.unwrap(), 60.0);

        let buy = mos(75.0);
        // halfway between MOS and sticker
        assert_relative_eq!(buy.score, 70.0);
        assert_eq!(buy.signal, Some(Recommendation::Buy));

        let fair = mos(105.0);
        assert_relative_eq!(fair.score, 40.0);
        assert_eq!(fair.signal, Some(Recommendation::Hold));

        let rich = mos(120.0);
        assert_relative_eq!(rich.score, 25.0);
        assert_eq!(rich.signal, Some(Recommendation::Hold));

        let expensive = mos(130.0);
        assert_relative_eq!(expensive.score, 10.0);
        assert_eq!(expensive.signal, Some(Recommendation::Sell));
    }

    #[test]
    fn test_score_is_continuous_at_mos_boundary() {
        assert_relative_eq!(mos(50.0).score, 90.0);
        assert_relative_eq!(mos(99.999).score, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_missing_price_has_no_signal() {
        let config = ValuationConfig::default();
        let result = MarginOfSafetyScore::compute(None, Some(80.0), &config);
        assert!(result.signal.is_none());
        assert_relative_eq!(result.score, 10.0);
        assert_relative_eq!(result.margin_of_safety.unwrap(), 40.0);

        let result = MarginOfSafetyScore::compute(Some(50.0), Some(-3.0), &config);
        assert!(result.signal.is_none());
        assert!(result.margin_of_safety.is_none());
    }
}
