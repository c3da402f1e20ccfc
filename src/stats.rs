// =============================================================================
// Statistics Aggregator — signal counts per direction and per rule
// =============================================================================
//
// Rules are independent and may fire on the same bar, so per-rule totals are
// counted per signal, not per bar.  `bars_with_signals` reports how many
// distinct bars produced at least one signal; it is at most `total_signals`
// and the gap between the two is the amount of co-firing.
// =============================================================================

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::signals::{RuleKind, Signal};
use crate::types::Direction;

/// Counts for a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleStats {
    pub rule: RuleKind,
    pub total: usize,
    pub buy: usize,
    pub sell: usize,
    /// `buy / sell`; `None` ("N/A") when the rule produced no sells.
    pub buy_sell_ratio: Option<f64>,
}

impl RuleStats {
    fn new(rule: RuleKind, buy: usize, sell: usize) -> Self {
        Self {
            rule,
            total: buy + sell,
            buy,
            sell,
            buy_sell_ratio: if sell > 0 {
                Some(buy as f64 / sell as f64)
            } else {
                None
            },
        }
    }
}

/// Summary of a signal list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_signals: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub bars_with_signals: usize,
    /// One entry per rule in table order, including rules with no signals.
    pub by_rule: Vec<RuleStats>,
}

impl StatsReport {
    /// Counts for `rule`.
    pub fn rule(&self, rule: RuleKind) -> Option<&RuleStats> {
        self.by_rule.iter().find(|r| r.rule == rule)
    }
}

/// Aggregate `signals` into a [`StatsReport`].
pub fn summarize(signals: &[Signal]) -> StatsReport {
    let by_rule = RuleKind::ALL
        .iter()
        .map(|&rule| {
            RuleStats::new(
                rule,
                count(signals, |s| s.rule == rule && s.direction == Direction::Buy),
                count(signals, |s| s.rule == rule && s.direction == Direction::Sell),
            )
        })
        .collect();

    let bars: BTreeSet<usize> = signals.iter().map(|s| s.index).collect();

    StatsReport {
        total_signals: signals.len(),
        buy_signals: count(signals, |s| s.direction == Direction::Buy),
        sell_signals: count(signals, |s| s.direction == Direction::Sell),
        bars_with_signals: bars.len(),
        by_rule,
    }
}

fn count(signals: &[Signal], pred: impl Fn(&Signal) -> bool) -> usize {
    signals.iter().filter(|s| pred(s)).count()
}

impl std::fmt::Display for StatsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total Signals: {}", self.total_signals)?;
        writeln!(f, "Buy Signals: {}", self.buy_signals)?;
        writeln!(f, "Sell Signals: {}", self.sell_signals)?;
        for r in &self.by_rule {
            writeln!(f)?;
            writeln!(f, "{}: {} (buy {}, sell {})", r.rule, r.total, r.buy, r.sell)?;
            match r.buy_sell_ratio {
                Some(ratio) => writeln!(f, "Signal Ratio (Buy/Sell): {ratio:.2}")?,
                None => writeln!(f, "Signal Ratio: N/A")?,
            }
        }
        Ok(())
    }
}
