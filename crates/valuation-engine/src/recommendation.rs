//! Final verdict: folds the Big Five growth check into the Four Ms composite.
//!
//! A failed growth check costs points and caps the verdict at HOLD/AVOID,
//! because the sticker price behind the MOS signal is unreliable for a
//! company that is not compounding.

use analysis_core::{AnalysisError, FactorScore, Grade, Recommendation, ValuationConfig};
use serde::{Deserialize, Serialize};

use crate::big_five::BIG_FIVE_TOTAL;

/// Points lost per Big Five metric short of the pass score.
const PENALTY_PER_MISSING_PASS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Weighted composite before the growth penalty
    pub composite_score: f64,
    pub overall_score: f64,
    pub overall_grade: Grade,
    pub recommendation: Recommendation,
    pub big_five_score: u8,
    pub big_five_penalty: f64,
    pub big_five_warning: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationResolver {
    config: ValuationConfig,
}

impl RecommendationResolver {
    pub fn new(config: ValuationConfig) -> Self {
        Self { config }
    }

    /// 0 at or above the pass score, then 10 points per missing pass
    /// (2 -> 10, 1 -> 20, 0 -> 30 with the default pass score of 3).
    pub fn big_five_penalty(&self, big_five_score: u8) -> Result<f64, AnalysisError> {
        if big_five_score > BIG_FIVE_TOTAL {
            return Err(AnalysisError::contract(format!(
                "Big Five score {} is outside 0..={}",
                big_five_score, BIG_FIVE_TOTAL
            )));
        }
        let missing = self.config.big_five_pass_score.saturating_sub(big_five_score);
        Ok(missing as f64 * PENALTY_PER_MISSING_PASS)
    }

    /// `mos_signal` is the price ladder verdict of the margin-of-safety
    /// factor, `None` when no price comparison was possible.
    pub fn resolve(
        &self,
        composite_score: f64,
        big_five_score: u8,
        mos_signal: Option<Recommendation>,
    ) -> Result<Resolution, AnalysisError> {
        let penalty = self.big_five_penalty(big_five_score)?;
        let warning = big_five_score < self.config.big_five_pass_score;

        let overall_score = (composite_score - penalty).max(0.0);
        let overall_grade = Grade::from_score(overall_score);
        let sell_leaning = mos_signal == Some(Recommendation::Sell);
        let weak = overall_score < self.config.avoid_below_score;

        let recommendation = if warning {
            if sell_leaning || weak {
                Recommendation::Avoid
            } else {
                Recommendation::Hold
            }
        } else {
            match mos_signal {
                Some(signal) if signal.is_buy() && overall_score >= self.config.buy_min_score => signal,
                _ if sell_leaning || weak => Recommendation::Avoid,
                _ => Recommendation::Hold,
            }
        };

        Ok(Resolution {
            composite_score,
            overall_score,
            overall_grade,
            recommendation,
            big_five_score,
            big_five_penalty: penalty,
            big_five_warning: warning,
        })
    }

    /// Headline lines: verdict, then each factor's lead note prefixed with
    /// its name. A failed growth check is reported first.
    pub fn summary(&self, resolution: &Resolution, factors: &[&dyn FactorScore]) -> Vec<String> {
        let mut summary = Vec::new();
        if resolution.big_five_warning {
            summary.push(format!(
                "Big Five failed ({}/{}) - score penalty -{:.0}, recommendation capped",
                resolution.big_five_score, BIG_FIVE_TOTAL, resolution.big_five_penalty
            ));
        }

        let headline = if resolution.overall_score >= 70.0 {
            "This appears to be a Rule #1 company"
        } else if resolution.overall_score >= 50.0 {
            "This company has some Rule #1 qualities but needs more analysis"
        } else {
            "This company may not meet Rule #1 criteria"
        };
        summary.push(headline.to_string());

        summary.extend(
            factors
                .iter()
                .filter_map(|f| f.headline().map(|note| format!("{}: {}", f.name(), note))),
        );
        summary
    }
}
