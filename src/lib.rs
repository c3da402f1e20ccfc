// =============================================================================
// fade-signals — daily indicator & signal engine
// =============================================================================
//
// Bars -> indicators -> signals -> statistics, for one symbol's daily history.
// Every stage is a pure function of its inputs; `Pipeline` strings them
// together and guards the stage order.
// =============================================================================

pub mod analysis;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod rule_config;
pub mod signals;
pub mod stats;
pub mod types;

pub use error::{EngineError, Result};
pub use indicators::{compute, IndicatorSet};
pub use market_data::{Bar, BarSeries};
pub use pipeline::{Pipeline, PipelineReport};
pub use rule_config::RuleConfig;
pub use signals::{generate, RuleKind, Signal};
pub use stats::{summarize, StatsReport};
pub use types::Direction;
