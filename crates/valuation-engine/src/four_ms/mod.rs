//! Four Ms: Meaning (predictability), Moat, Management and Margin of
//! Safety, each scored 0-100 from ratio histories and blended into one
//! composite.
//!
//! The four scorers are independent of each other. Percent-valued
//! histories (ROE, margins) are in percent, D/E is a plain ratio.

mod management;
mod margin;
mod meaning;
mod moat;

use std::collections::BTreeMap;

pub use management::ManagementScore;
pub use margin::MarginOfSafetyScore;
pub use meaning::PredictabilityScore;
pub use moat::{MarginTrend, MoatScore};

use analysis_core::stats::round_to;
use analysis_core::{AnalysisError, FactorScore, Grade, Recommendation, ValuationConfig};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::recommendation::RecommendationResolver;
use crate::ratios::RatioHistory;

/// Ratio histories, oldest first, plus the price pair and the Big Five
/// pass count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FourMsInput {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub revenue: Vec<Option<f64>>,
    #[serde(default)]
    pub net_income: Vec<Option<f64>>,
    /// Percent
    #[serde(default)]
    pub roe: Vec<Option<f64>>,
    /// Percent
    #[serde(default)]
    pub gross_margin: Vec<Option<f64>>,
    /// Percent
    #[serde(default)]
    pub operating_margin: Vec<Option<f64>>,
    #[serde(default)]
    pub debt_to_equity: Vec<Option<f64>>,
    #[serde(default)]
    pub free_cash_flow: Vec<Option<f64>>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub sticker_price: Option<f64>,
    pub big_five_score: u8,
}

impl FourMsInput {
    pub fn from_ratios(
        symbol: Option<&str>,
        ratios: &RatioHistory,
        current_price: Option<f64>,
        sticker_price: Option<f64>,
        big_five_score: u8,
    ) -> Self {
        Self {
            symbol: symbol.map(str::to_string),
            revenue: ratios.revenue.clone(),
            net_income: ratios.net_income.clone(),
            roe: ratios.roe.clone(),
            gross_margin: ratios.gross_margin.clone(),
            operating_margin: ratios.operating_margin.clone(),
            debt_to_equity: ratios.debt_to_equity.clone(),
            free_cash_flow: ratios.free_cash_flow.clone(),
            current_price,
            sticker_price,
            big_five_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourMsResult {
    pub meaning: PredictabilityScore,
    pub moat: MoatScore,
    pub management: ManagementScore,
    pub margin_of_safety: MarginOfSafetyScore,

    /// Weighted blend of the four scores
    pub composite_score: f64,
    /// Composite less the Big Five penalty, floored at 0
    pub overall_score: f64,
    pub overall_grade: Grade,
    pub recommendation: Recommendation,
    pub summary: Vec<String>,

    pub big_five_score: u8,
    pub big_five_penalty: f64,
    pub big_five_warning: bool,
}

impl FourMsResult {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "meaning": self.meaning.to_json(),
            "moat": self.moat.to_json(),
            "management": self.management.to_json(),
            "mos": self.margin_of_safety.to_json(),
            "composite_score": round_to(self.composite_score, 1),
            "overall_score": round_to(self.overall_score, 1),
            "overall_grade": self.overall_grade.as_str(),
            "recommendation": self.recommendation,
            "summary": self.summary,
            "big_five_score": self.big_five_score,
            "big_five_penalty": round_to(self.big_five_penalty, 1),
            "big_five_warning": self.big_five_warning,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FourMsEvaluator {
    config: ValuationConfig,
    resolver: RecommendationResolver,
}

impl FourMsEvaluator {
    pub fn new(config: ValuationConfig) -> Self {
        Self {
            resolver: RecommendationResolver::new(config.clone()),
            config,
        }
    }

    pub fn evaluate_meaning(
        &self,
        symbol: Option<&str>,
        revenue: &[Option<f64>],
        net_income: &[Option<f64>],
    ) -> PredictabilityScore {
        PredictabilityScore::compute(symbol, revenue, net_income)
    }

    pub fn evaluate_moat(
        &self,
        roe: &[Option<f64>],
        gross_margin: &[Option<f64>],
        operating_margin: &[Option<f64>],
    ) -> MoatScore {
        let (valid_roe, dropped) = self.drop_sentinels(roe);
        MoatScore::compute(&valid_roe, dropped, gross_margin, operating_margin)
    }

    pub fn evaluate_management(
        &self,
        roe: &[Option<f64>],
        debt_to_equity: &[Option<f64>],
        free_cash_flow: &[Option<f64>],
        net_income: &[Option<f64>],
    ) -> ManagementScore {
        let (valid_roe, _) = self.drop_sentinels(roe);
        // negative D/E only comes from negative equity
        let valid_de: Vec<Option<f64>> = debt_to_equity.iter().map(|d| d.filter(|v| *v >= 0.0)).collect();
        ManagementScore::compute(&valid_roe, &valid_de, free_cash_flow, net_income)
    }

    pub fn evaluate_margin_of_safety(
        &self,
        current_price: Option<f64>,
        sticker_price: Option<f64>,
    ) -> MarginOfSafetyScore {
        MarginOfSafetyScore::compute(current_price, sticker_price, &self.config)
    }

    /// All four factors, the weighted composite and the resolved verdict.
    /// Fails only for a Big Five score outside 0..=5.
    pub fn evaluate(&self, input: &FourMsInput) -> Result<FourMsResult, AnalysisError> {
        let meaning = self.evaluate_meaning(input.symbol.as_deref(), &input.revenue, &input.net_income);
        let moat = self.evaluate_moat(&input.roe, &input.gross_margin, &input.operating_margin);
        let management = self.evaluate_management(
            &input.roe,
            &input.debt_to_equity,
            &input.free_cash_flow,
            &input.net_income,
        );
        let margin_of_safety = self.evaluate_margin_of_safety(input.current_price, input.sticker_price);

        let weights = &self.config.weights;
        let composite_score = meaning.score * weights.predictability
            + moat.score * weights.moat
            + management.score * weights.management
            + margin_of_safety.score * weights.margin_of_safety;

        let resolution = self
            .resolver
            .resolve(composite_score, input.big_five_score, margin_of_safety.signal)?;
        let factors: [&dyn FactorScore; 4] = [&meaning, &moat, &management, &margin_of_safety];
        let summary = self.resolver.summary(&resolution, &factors);

        tracing::debug!(
            composite = composite_score,
            overall = resolution.overall_score,
            recommendation = %resolution.recommendation,
            "Four Ms evaluated"
        );

        Ok(FourMsResult {
            meaning,
            moat,
            management,
            margin_of_safety,
            composite_score,
            overall_score: resolution.overall_score,
            overall_grade: resolution.overall_grade,
            recommendation: resolution.recommendation,
            summary,
            big_five_score: resolution.big_five_score,
            big_five_penalty: resolution.big_five_penalty,
            big_five_warning: resolution.big_five_warning,
        })
    }

    /// Blanks ROE years outside the sentinel bound; the flag reports
    /// whether any filed value was blanked.
    fn drop_sentinels(&self, roe: &[Option<f64>]) -> (Vec<Option<f64>>, bool) {
        let bound = self.config.roe_sentinel_bound;
        let valid: Vec<Option<f64>> = roe.iter().map(|r| r.filter(|v| v.abs() <= bound)).collect();
        let dropped = valid.iter().flatten().count() < roe.iter().flatten().count();
        (valid, dropped)
    }
}

fn rounded_breakdown(breakdown: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    breakdown.iter().map(|(k, v)| (k.clone(), round_to(*v, 1))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat(value: f64, n: usize) -> Vec<Option<f64>> {
        vec![Some(value); n]
    }

    fn quality_company(big_five_score: u8, price: f64) -> FourMsInput {
        FourMsInput {
            symbol: None,
            revenue: (0..10).map(|i| Some(100.0 + i as f64)).collect(),
            net_income: (0..10).map(|i| Some(20.0 + i as f64 * 0.2)).collect(),
            roe: flat(22.0, 10),
            gross_margin: (0..10).map(|i| Some(40.0 + i as f64)).collect(),
            operating_margin: flat(26.0, 10),
            debt_to_equity: flat(0.1, 10),
            free_cash_flow: flat(25.0, 10),
            current_price: Some(price),
            sticker_price: Some(100.0),
            big_five_score,
        }
    }

    #[test]
    fn test_composite_uses_factor_weights() {
        let result = FourMsEvaluator::default().evaluate(&quality_company(5, 40.0)).unwrap();
        assert_relative_eq!(result.meaning.score, 100.0);
        assert_relative_eq!(result.moat.score, 100.0);
        assert_relative_eq!(result.management.score, 100.0);
        assert_relative_eq!(result.margin_of_safety.score, 100.0);
        assert_relative_eq!(result.composite_score, 100.0);
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
        assert_eq!(result.summary[0], "This appears to be a Rule #1 company");
    }

    #[test]
    fn test_overvalued_quality_company() {
        let result = FourMsEvaluator::default().evaluate(&quality_company(5, 130.0)).unwrap();
        // 0.2*100 + 0.3*100 + 0.2*100 + 0.3*10
        assert_relative_eq!(result.composite_score, 73.0);
        assert_eq!(result.recommendation, Recommendation::Avoid);
    }

    #[test]
    fn test_failed_big_five_caps_recommendation() {
        let result = FourMsEvaluator::default().evaluate(&quality_company(1, 40.0)).unwrap();
        assert_relative_eq!(result.overall_score, 80.0);
        assert_eq!(result.recommendation, Recommendation::Hold);
        assert!(result.big_five_warning);
        assert!(result.summary[0].starts_with("Big Five failed"));
    }

    #[test]
    fn test_sentinel_roe_is_excluded() {
        let evaluator = FourMsEvaluator::default();
        let roe = vec![Some(450.0), Some(-300.0), Some(18.0), Some(19.0)];
        let moat = evaluator.evaluate_moat(&roe, &flat(30.0, 4), &flat(15.0, 4));
        assert_relative_eq!(moat.roe_avg.unwrap(), 18.5);
        assert!(moat.roe_consistent);

        let all_sentinel = evaluator.evaluate_moat(&[Some(500.0), Some(-250.0)], &[], &[]);
        assert!(all_sentinel.roe_avg.is_none());
        assert_relative_eq!(all_sentinel.score_breakdown["ROE Level"], 15.0);
    }

    #[test]
    fn test_roe_at_the_bound_is_kept() {
        let evaluator = FourMsEvaluator::default();
        let roe = vec![Some(100.0), Some(-100.0), Some(20.0), Some(20.0)];
        let moat = evaluator.evaluate_moat(&roe, &flat(30.0, 4), &flat(15.0, 4));
        assert_relative_eq!(moat.roe_avg.unwrap(), 10.0);
        assert!(moat.roe_consistent);
        assert!(moat.notes.iter().all(|n| !n.contains("negative equity")));

        let just_over = vec![Some(100.001), Some(20.0), Some(20.0)];
        let moat = evaluator.evaluate_moat(&just_over, &[], &[]);
        assert_relative_eq!(moat.roe_avg.unwrap(), 20.0);
    }

    #[test]
    fn test_negative_debt_to_equity_is_undefined() {
        let management =
            FourMsEvaluator::default().evaluate_management(&flat(16.0, 3), &flat(-1.5, 3), &flat(10.0, 3), &flat(10.0, 3));
        assert!(management.debt_to_equity.is_none());
        assert_relative_eq!(management.score_breakdown["Debt Management"], 20.0);
    }

    #[test]
    fn test_out_of_range_big_five_is_rejected() {
        let err = FourMsEvaluator::default().evaluate(&quality_company(9, 40.0)).unwrap_err();
        assert!(matches!(err, AnalysisError::ContractViolation(_)));
    }

    #[test]
    fn test_json_uses_short_factor_keys() {
        let result = FourMsEvaluator::default().evaluate(&quality_company(4, 75.0)).unwrap();
        let value = result.to_json();
        assert_eq!(value["recommendation"], "BUY");
        assert_eq!(value["mos"]["score"], 70.0);
        assert_eq!(value["moat"]["gross_margin_trend"], "Growing");
        assert_eq!(value["big_five_warning"], false);
    }
}
