// =============================================================================
// Signal Generator
// =============================================================================
//
// Walks the bars in order and asks every enabled rule about each bar.  Output
// order is (bar index, position of the rule in `enabled_rules`).  Bars where
// nothing fires contribute nothing.
// =============================================================================

use tracing::{debug, trace};

use crate::error::{EngineError, Result};
use crate::indicators::IndicatorSet;
use crate::market_data::BarSeries;
use crate::rule_config::RuleConfig;
use crate::signals::{BarContext, RuleKind, Signal};

/// Evaluate the enabled rule set over every bar of `series`.
///
/// Fails with [`EngineError::NotReady`] when `indicators` was not computed
/// for this series (empty, or aligned to a different number of bars).
pub fn generate(
    series: &BarSeries,
    indicators: &IndicatorSet,
    config: &RuleConfig,
) -> Result<Vec<Signal>> {
    if indicators.is_empty() {
        return Err(EngineError::NotReady(
            "indicators have not been computed for this series".to_string(),
        ));
    }
    if indicators.len() != series.len() {
        return Err(EngineError::NotReady(format!(
            "indicators cover {} bars but the series has {}",
            indicators.len(),
            series.len()
        )));
    }

    let rules = distinct_rules(&config.enabled_rules);
    let mut signals = Vec::new();

    for (index, bar) in series.bars().iter().enumerate() {
        let ctx = BarContext::new(index, bar, indicators, config);
        for rule in &rules {
            if let Some(signal) = rule.evaluate(&ctx) {
                trace!(
                    index,
                    date = %signal.date,
                    rule = %signal.rule,
                    direction = %signal.direction,
                    price = signal.price,
                    "rule fired"
                );
                signals.push(signal);
            }
        }
    }

    debug!(
        symbol = series.symbol(),
        rules = rules.len(),
        signals = signals.len(),
        "signal generation complete"
    );

    Ok(signals)
}

/// `enabled_rules` with repeats removed, first occurrence wins.  A rule may
/// emit at most one signal per bar.
fn distinct_rules(enabled: &[RuleKind]) -> Vec<RuleKind> {
    let mut rules: Vec<RuleKind> = Vec::with_capacity(enabled.len());
    for &rule in enabled {
        if !rules.contains(&rule) {
            rules.push(rule);
        }
    }
    rules
}
