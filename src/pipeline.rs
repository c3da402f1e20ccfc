// =============================================================================
// Pipeline — staged run over one bar history
// =============================================================================
//
// Stages, each depending on the one before:
//   1. Ingest      (BarSeries, validated on construction)
//   2. Indicators  (compute the full IndicatorSet)
//   3. Signals     (evaluate the enabled rule set per bar)
//   4. Statistics  (per-direction / per-rule counts)
//   5. Profile     (risk, volatility and gap summary)
//
// Calling a stage before its input exists fails with `NotReady`.  Re-running
// the indicator stage throws away any signals derived from the previous run,
// since those are no longer aligned with what the indicators say.
// =============================================================================

use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::{self, MarketProfile};
use crate::error::{EngineError, Result};
use crate::indicators::{self, IndicatorSet};
use crate::market_data::BarSeries;
use crate::rule_config::RuleConfig;
use crate::signals::{self, Signal};
use crate::stats::{self, StatsReport};

/// Everything a run produces, ready for a renderer or a report writer.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub symbol: String,
    pub bars: usize,
    pub indicators: IndicatorSet,
    pub signals: Vec<Signal>,
    pub stats: StatsReport,
    pub profile: MarketProfile,
}

// =============================================================================
// Pipeline
// =============================================================================

pub struct Pipeline {
    series: BarSeries,
    config: RuleConfig,
    indicators: Option<IndicatorSet>,
    signals: Option<Vec<Signal>>,
}

impl Pipeline {
    /// Fails with [`EngineError::InvalidConfig`] when `config` is out of range.
    pub fn new(series: BarSeries, config: RuleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            series,
            config,
            indicators: None,
            signals: None,
        })
    }

    pub fn series(&self) -> &BarSeries {
        &self.series
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn indicators(&self) -> Option<&IndicatorSet> {
        self.indicators.as_ref()
    }

    pub fn signals(&self) -> Option<&[Signal]> {
        self.signals.as_deref()
    }

    // ── 2. Indicators ───────────────────────────────────────────────────
    pub fn compute_indicators(&mut self) -> &IndicatorSet {
        self.signals = None;
        let set = indicators::compute(&self.series, &self.config);
        self.indicators.insert(set)
    }

    // ── 3. Signals ──────────────────────────────────────────────────────
    pub fn generate_signals(&mut self) -> Result<&[Signal]> {
        let set = self.indicators.as_ref().ok_or_else(|| {
            EngineError::NotReady(format!(
                "signal generation for {} requested before indicators were computed",
                self.series.symbol()
            ))
        })?;
        let generated = signals::generate(&self.series, set, &self.config)?;
        Ok(self.signals.insert(generated).as_slice())
    }

    // ── 4. Statistics ───────────────────────────────────────────────────
    pub fn summarize(&self) -> Result<StatsReport> {
        let signals = self.signals.as_ref().ok_or_else(|| {
            EngineError::NotReady(format!(
                "statistics for {} requested before signals were generated",
                self.series.symbol()
            ))
        })?;
        Ok(stats::summarize(signals))
    }

    // ── 5. Profile ──────────────────────────────────────────────────────
    pub fn profile(&self) -> Result<MarketProfile> {
        let set = self.indicators.as_ref().ok_or_else(|| {
            EngineError::NotReady(format!(
                "market profile for {} requested before indicators were computed",
                self.series.symbol()
            ))
        })?;
        Ok(analysis::profile(&self.series, set, &self.config))
    }

    /// Run every stage in order and collect the results.
    pub fn run(mut self) -> Result<PipelineReport> {
        let symbol = self.series.symbol().to_string();
        debug!(symbol = %symbol, bars = self.series.len(), "pipeline starting");

        self.compute_indicators();
        self.generate_signals()?;
        let stats = self.summarize()?;
        let profile = self.profile()?;

        info!(
            symbol = %symbol,
            bars = self.series.len(),
            signals = stats.total_signals,
            buy = stats.buy_signals,
            sell = stats.sell_signals,
            "pipeline complete"
        );

        let bars = self.series.len();
        let (indicators, signals) = match (self.indicators, self.signals) {
            (Some(i), Some(s)) => (i, s),
            _ => {
                return Err(EngineError::NotReady(
                    "pipeline stages did not produce output".to_string(),
                ))
            }
        };

        Ok(PipelineReport {
            symbol,
            bars,
            indicators,
            signals,
            stats,
            profile,
        })
    }
}
