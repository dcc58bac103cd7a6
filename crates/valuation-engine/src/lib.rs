//! Rule #1 valuation: Big Five growth check, sticker price, Four Ms and
//! the combined recommendation.
//!
//! Every calculator is a pure function of its inputs and the injected
//! [`ValuationConfig`]; they can be shared across threads freely.

pub mod big_five;
pub mod engine;
pub mod four_ms;
pub mod growth;
pub mod ratios;
pub mod recommendation;
pub mod sectors;
pub mod splits;
pub mod sticker_price;

pub use analysis_core::{AnalysisError, CompanyFinancials, FinancialRecord, FinancialSeries, Grade, Recommendation, ValuationConfig};
pub use big_five::{BigFiveInput, BigFiveResult, BigFiveScorer};
pub use engine::{RuleOneAnalysis, ValuationEngine};
pub use four_ms::{FourMsEvaluator, FourMsInput, FourMsResult};
pub use growth::{GrowthAnalyzer, GrowthMetric, GrowthStatus, SeriesPattern};
pub use recommendation::{RecommendationResolver, Resolution};
pub use sticker_price::{StickerPrice, StickerPriceCalculator, StickerPriceInput, StickerPriceOutcome, ValuationStatus};
