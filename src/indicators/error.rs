use thiserror::Error;

/// Rejected indicator parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("{name} window must be at least 1")]
    ZeroWindow { name: &'static str },

    #[error("{name} span must be at least 1")]
    ZeroSpan { name: &'static str },

    #[error("band multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),
}
