// =============================================================================
// Rule Configuration — thresholds, windows and the enabled rule set
// =============================================================================
//
// Every tunable parameter of the indicator engine and the rule library lives
// here.  All fields carry `#[serde(default)]` so that a partial JSON file
// (or `{}`) loads with the stock values.
//
// Persistence uses an atomic tmp + rename pattern.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;
use crate::signals::RuleKind;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_initial_capital() -> f64 {
    100_000.0
}

fn default_position_size() -> f64 {
    0.1
}

fn default_stop_loss_multiplier() -> f64 {
    2.0
}

fn default_take_profit_multiplier() -> f64 {
    4.0
}

fn default_volume_threshold() -> f64 {
    1.5
}

fn default_volatility_threshold() -> f64 {
    1.2
}

fn default_zscore_threshold() -> f64 {
    2.0
}

fn default_lookback() -> usize {
    5
}

fn default_gap_threshold() -> f64 {
    1.0
}

fn default_reversal_threshold() -> f64 {
    0.5
}

fn default_fade_gap_threshold() -> f64 {
    1.0
}

fn default_extreme_move_threshold() -> f64 {
    1.0
}

fn default_low_volatility_ratio() -> f64 {
    1.0
}

fn default_atr_window() -> usize {
    14
}

fn default_atr_baseline_window() -> usize {
    20
}

fn default_ema_fast() -> usize {
    20
}

fn default_ema_slow() -> usize {
    50
}

fn default_rsi_window() -> usize {
    14
}

fn default_volume_window() -> usize {
    20
}

fn default_enabled_rules() -> Vec<RuleKind> {
    RuleKind::ALL.to_vec()
}

// =============================================================================
// RuleConfig
// =============================================================================

/// Tunable thresholds and window sizes for one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    // --- Risk & sizing ------------------------------------------------------

    /// Account size used for the position-sizing summary.
    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    /// Fraction of capital committed per trade (0.1 = 10 %).
    #[serde(default = "default_position_size")]
    pub position_size: f64,

    /// ATR multiplier for the stop-loss distance.
    #[serde(default = "default_stop_loss_multiplier")]
    pub stop_loss_multiplier: f64,

    /// ATR multiplier for the take-profit distance.
    #[serde(default = "default_take_profit_multiplier")]
    pub take_profit_multiplier: f64,

    // --- Rule thresholds ----------------------------------------------------

    /// Minimum volume / volume-MA ratio for mean reversion.
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: f64,

    /// Minimum ATR / ATR-MA ratio for mean reversion.
    #[serde(default = "default_volatility_threshold")]
    pub volatility_threshold: f64,

    /// Absolute z-score a close must exceed to count as stretched.
    #[serde(default = "default_zscore_threshold")]
    pub zscore_threshold: f64,

    /// Window for the rolling mean / std / z-score of close.
    #[serde(default = "default_lookback")]
    pub lookback: usize,

    /// Gap % (absolute) that qualifies a morning / evening reversal.
    #[serde(default = "default_gap_threshold")]
    pub gap_threshold: f64,

    /// Intraday move % (absolute) that confirms a reversal.
    #[serde(default = "default_reversal_threshold")]
    pub reversal_threshold: f64,

    /// Gap % (absolute) the gap fade bets against.
    #[serde(default = "default_fade_gap_threshold")]
    pub fade_gap_threshold: f64,

    /// First-hour move % (absolute) that counts as extreme.
    #[serde(default = "default_extreme_move_threshold")]
    pub extreme_move_threshold: f64,

    /// ATR ratio below which a bar counts as a low-volatility period.
    #[serde(default = "default_low_volatility_ratio")]
    pub low_volatility_ratio: f64,

    // --- Indicator windows --------------------------------------------------

    #[serde(default = "default_atr_window")]
    pub atr_window: usize,

    /// Window of the ATR moving average the ATR ratio divides by.
    #[serde(default = "default_atr_baseline_window")]
    pub atr_baseline_window: usize,

    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,

    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    #[serde(default = "default_volume_window")]
    pub volume_window: usize,

    // --- Rule set -----------------------------------------------------------

    /// Rules evaluated by the signal generator, in output order.
    #[serde(default = "default_enabled_rules")]
    pub enabled_rules: Vec<RuleKind>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            position_size: default_position_size(),
            stop_loss_multiplier: default_stop_loss_multiplier(),
            take_profit_multiplier: default_take_profit_multiplier(),
            volume_threshold: default_volume_threshold(),
            volatility_threshold: default_volatility_threshold(),
            zscore_threshold: default_zscore_threshold(),
            lookback: default_lookback(),
            gap_threshold: default_gap_threshold(),
            reversal_threshold: default_reversal_threshold(),
            fade_gap_threshold: default_fade_gap_threshold(),
            extreme_move_threshold: default_extreme_move_threshold(),
            low_volatility_ratio: default_low_volatility_ratio(),
            atr_window: default_atr_window(),
            atr_baseline_window: default_atr_baseline_window(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            rsi_window: default_rsi_window(),
            volume_window: default_volume_window(),
            enabled_rules: default_enabled_rules(),
        }
    }
}

impl RuleConfig {
    /// Stock thresholds with only the given rules enabled.
    pub fn with_rules(rules: &[RuleKind]) -> Self {
        Self {
            enabled_rules: rules.to_vec(),
            ..Self::default()
        }
    }

    /// Check that every threshold is positive and finite and every window is
    /// at least one bar.
    pub fn validate(&self) -> std::result::Result<(), EngineError> {
        let thresholds = [
            ("initial_capital", self.initial_capital),
            ("position_size", self.position_size),
            ("stop_loss_multiplier", self.stop_loss_multiplier),
            ("take_profit_multiplier", self.take_profit_multiplier),
            ("volume_threshold", self.volume_threshold),
            ("volatility_threshold", self.volatility_threshold),
            ("zscore_threshold", self.zscore_threshold),
            ("gap_threshold", self.gap_threshold),
            ("reversal_threshold", self.reversal_threshold),
            ("fade_gap_threshold", self.fade_gap_threshold),
            ("extreme_move_threshold", self.extreme_move_threshold),
            ("low_volatility_ratio", self.low_volatility_ratio),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let windows = [
            ("lookback", self.lookback),
            ("atr_window", self.atr_window),
            ("atr_baseline_window", self.atr_baseline_window),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("rsi_window", self.rsi_window),
            ("volume_window", self.volume_window),
        ];
        for (name, value) in windows {
            if value == 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be at least 1"
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rule config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse rule config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("rule config at {} is out of range", path.display()))?;

        info!(
            path = %path.display(),
            rules = ?config.enabled_rules,
            lookback = config.lookback,
            "rule config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise rule config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "rule config saved (atomic)");
        Ok(())
    }
}
