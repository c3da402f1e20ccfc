// =============================================================================
// Engine Errors
// =============================================================================
//
// Only two things can make the engine refuse to run: malformed input (bars or
// configuration) and stages invoked out of order.  Warm-up windows, flat
// prices and zero denominators are *not* errors; they surface as `None` in
// the indicator series and simply keep rules from firing.
// =============================================================================

use thiserror::Error;

/// The unified error type for the signal engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The bar sequence is empty, out of date order, or OHLC-inconsistent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stage was invoked before the stage it depends on produced output.
    #[error("not ready: {0}")]
    NotReady(String),

    /// A `RuleConfig` threshold or window is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "InvalidInput",
            Self::NotReady(_) => "NotReady",
            Self::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
