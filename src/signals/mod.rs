// =============================================================================
// Signals Module
// =============================================================================
//
// Turns bars + indicators into discrete trade suggestions:
// - Rule library (six direction-symmetric predicates)
// - Generator (per-bar evaluation of the enabled rules)

pub mod generator;
pub mod rules;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Direction;

pub use generator::generate;
pub use rules::{BarContext, RuleKind};

/// One trade suggestion emitted by a rule on a specific bar.
///
/// Signals are plain output values; nothing mutates them after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Position of the bar in the series.
    pub index: usize,
    pub date: NaiveDate,
    pub direction: Direction,
    /// Reference (entry) price the rule trades at.
    pub price: f64,
    pub rule: RuleKind,
    /// Human-readable explanation of why the rule fired.
    pub reason: String,
    /// Present only for rules with an ATR risk band.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub take_profit: Option<f64>,
}
