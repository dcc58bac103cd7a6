use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// Longest projection horizon `validate` accepts.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Relative weights of the four factors in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub predictability: f64,
    pub moat: f64,
    pub management: f64,
    pub margin_of_safety: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            predictability: 0.20,
            moat: 0.30,
            management: 0.20,
            margin_of_safety: 0.30,
        }
    }
}

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.predictability + self.moat + self.management + self.margin_of_safety
    }
}

/// Valuation policy shared by every calculator.
///
/// Built once (defaults or environment) and passed by reference, so a
/// threshold lives in exactly one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationConfig {
    /// CAGR at or above this is STRONG (decimal)
    pub strong_growth: f64,
    /// CAGR at or above this passes the growth check
    pub pass_growth: f64,
    /// CAGR at or above this is WEAK rather than FAIL
    pub weak_growth: f64,

    /// Share of negative years that marks a series as cash burning
    pub negative_share: f64,
    /// Share of negative years that marks a series as inconsistent
    pub inconsistent_share: f64,

    /// Growth rate floor used for projection
    pub min_growth_rate: f64,
    /// Growth rate cap used for projection
    pub max_growth_rate: f64,
    /// Future P/E = growth% x this multiple
    pub pe_growth_multiple: f64,
    pub min_pe: f64,
    pub max_pe: f64,
    /// P/E used when no filed ratios are available
    pub default_historical_pe: f64,
    pub projection_years: u32,
    /// Annual return demanded when discounting the future price
    pub required_return: f64,
    /// Fraction of the sticker price that is the buy-below threshold
    pub mos_fraction: f64,
    /// Price/sticker multiple above which the price signal is SELL
    pub sell_premium: f64,
    /// Price/sticker multiple treated as "near fair value" by the MOS scorer
    pub fair_value_band: f64,

    /// Big Five passes needed for the growth check
    pub big_five_pass_score: u8,
    pub weights: FactorWeights,
    /// ROE/D-E magnitudes beyond this are treated as undefined (percent)
    pub roe_sentinel_bound: f64,
    /// Composite needed before a BUY signal is allowed through
    pub buy_min_score: f64,
    /// Composite below which the verdict is AVOID
    pub avoid_below_score: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            strong_growth: 0.15,
            pass_growth: 0.10,
            weak_growth: 0.05,
            negative_share: 0.7,
            inconsistent_share: 0.3,
            min_growth_rate: 0.01,
            max_growth_rate: 0.15,
            pe_growth_multiple: 2.0,
            min_pe: 5.0,
            max_pe: 50.0,
            default_historical_pe: 15.0,
            projection_years: 10,
            required_return: 0.15,
            mos_fraction: 0.5,
            sell_premium: 1.25,
            fair_value_band: 1.10,
            big_five_pass_score: 3,
            weights: FactorWeights::default(),
            roe_sentinel_bound: 100.0,
            buy_min_score: 60.0,
            avoid_below_score: 40.0,
        }
    }
}

impl ValuationConfig {
    /// Defaults overlaid with `RULE_ONE_*` environment variables.
    /// Values that fail to parse keep their default.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            strong_growth: env_or("RULE_ONE_STRONG_GROWTH", d.strong_growth),
            pass_growth: env_or("RULE_ONE_PASS_GROWTH", d.pass_growth),
            weak_growth: env_or("RULE_ONE_WEAK_GROWTH", d.weak_growth),
            min_growth_rate: env_or("RULE_ONE_MIN_GROWTH_RATE", d.min_growth_rate),
            max_growth_rate: env_or("RULE_ONE_MAX_GROWTH_RATE", d.max_growth_rate),
            pe_growth_multiple: env_or("RULE_ONE_PE_GROWTH_MULTIPLE", d.pe_growth_multiple),
            min_pe: env_or("RULE_ONE_MIN_PE", d.min_pe),
            max_pe: env_or("RULE_ONE_MAX_PE", d.max_pe),
            default_historical_pe: env_or("RULE_ONE_DEFAULT_PE", d.default_historical_pe),
            projection_years: env_or("RULE_ONE_PROJECTION_YEARS", d.projection_years),
            required_return: env_or("RULE_ONE_REQUIRED_RETURN", d.required_return),
            mos_fraction: env_or("RULE_ONE_MOS_FRACTION", d.mos_fraction),
            big_five_pass_score: env_or("RULE_ONE_BIG_FIVE_PASS_SCORE", d.big_five_pass_score),
            ..d
        }
    }

    /// Rejects policies the calculators cannot honour.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.weak_growth <= self.pass_growth && self.pass_growth <= self.strong_growth) {
            return Err(AnalysisError::Config(
                "growth thresholds must satisfy weak <= pass <= strong".to_string(),
            ));
        }
        if !(0.0 < self.inconsistent_share && self.inconsistent_share <= self.negative_share && self.negative_share <= 1.0) {
            return Err(AnalysisError::Config(
                "negative-share thresholds must satisfy 0 < inconsistent <= negative <= 1".to_string(),
            ));
        }
        if self.min_growth_rate > self.max_growth_rate {
            return Err(AnalysisError::Config(format!(
                "min growth rate {} exceeds max growth rate {}",
                self.min_growth_rate, self.max_growth_rate
            )));
        }
        if self.min_pe <= 0.0 || self.min_pe > self.max_pe {
            return Err(AnalysisError::Config(format!(
                "P/E clamp [{}, {}] is invalid",
                self.min_pe, self.max_pe
            )));
        }
        if self.projection_years == 0 || self.projection_years > MAX_PROJECTION_YEARS {
            return Err(AnalysisError::Config(format!(
                "projection horizon {} must be between 1 and {} years",
                self.projection_years, MAX_PROJECTION_YEARS
            )));
        }
        if self.required_return <= -1.0 {
            return Err(AnalysisError::Config("required return must be greater than -100%".to_string()));
        }
        if !(self.mos_fraction > 0.0 && self.mos_fraction < 1.0) {
            return Err(AnalysisError::Config(format!(
                "margin of safety fraction {} must be between 0 and 1",
                self.mos_fraction
            )));
        }
        if self.sell_premium < self.fair_value_band || self.fair_value_band < 1.0 {
            return Err(AnalysisError::Config(
                "premium bands must satisfy 1 <= fair value band <= sell premium".to_string(),
            ));
        }
        if self.big_five_pass_score > 5 {
            return Err(AnalysisError::Config(format!(
                "Big Five pass score {} is outside 0..=5",
                self.big_five_pass_score
            )));
        }
        if (self.weights.total() - 1.0).abs() > 1e-9 {
            return Err(AnalysisError::Config(format!(
                "factor weights must sum to 1.0, got {}",
                self.weights.total()
            )));
        }
        Ok(())
    }

    /// (1 + required return) ^ horizon, about 4.046 for the default policy.
    pub fn discount_factor(&self) -> f64 {
        (1.0 + self.required_return).powi(self.horizon())
    }

    /// Projection horizon as a `powi` exponent, saturating instead of wrapping.
    pub fn horizon(&self) -> i32 {
        i32::try_from(self.projection_years).unwrap_or(i32::MAX)
    }
}

fn env_or<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
