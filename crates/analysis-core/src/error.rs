use thiserror::Error;

/// Errors raised by the valuation engine.
///
/// Poor data quality (missing years, loss-making series, negative equity)
/// is reported inside results, not through this type. Only broken call
/// contracts, company bundles too small or malformed to analyse, and
/// unusable configuration end up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    pub fn contract(msg: impl Into<String>) -> Self {
        AnalysisError::ContractViolation(msg.into())
    }
}
