// =============================================================================
// Market Profile — risk, volatility and gap summary of one history
// =============================================================================
//
// Companion to the signal statistics: describes the tape the signals were
// generated on.
//
//   Risk:        average ATR, stop / target distances, position value and
//                the currency risked per trade at the last close
//   Volatility:  bars above / below the ATR-ratio thresholds, ratio range
//   Gaps:        average gap %, average morning / evening reversal %,
//                largest gap up / down
//
// Averages and extremes skip undefined values; a series with no defined
// values yields `None`.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSet;
use crate::market_data::BarSeries;
use crate::rule_config::RuleConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub average_atr: Option<f64>,
    pub stop_loss_distance: Option<f64>,
    pub take_profit_distance: Option<f64>,
    pub account_size: f64,
    pub position_value: f64,
    pub risk_per_trade: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityProfile {
    pub high_volatility_periods: usize,
    pub low_volatility_periods: usize,
    pub atr_ratio_min: Option<f64>,
    pub atr_ratio_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapProfile {
    pub average_gap_pct: Option<f64>,
    pub average_morning_reversal_pct: Option<f64>,
    pub average_evening_reversal_pct: Option<f64>,
    pub largest_gap_up_pct: Option<f64>,
    pub largest_gap_down_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketProfile {
    pub risk: RiskProfile,
    pub volatility: VolatilityProfile,
    pub gaps: GapProfile,
}

/// Summarise `series` and its indicators under `config`.
pub fn profile(series: &BarSeries, indicators: &IndicatorSet, config: &RuleConfig) -> MarketProfile {
    let average_atr = mean(&indicators.atr);
    let position_value = config.initial_capital * config.position_size;
    let last_close = series.last_close();

    let risk = RiskProfile {
        average_atr,
        stop_loss_distance: average_atr.map(|a| a * config.stop_loss_multiplier),
        take_profit_distance: average_atr.map(|a| a * config.take_profit_multiplier),
        account_size: config.initial_capital,
        position_value,
        risk_per_trade: average_atr
            .map(|a| a * config.stop_loss_multiplier * (position_value / last_close)),
    };

    let ratios: Vec<f64> = indicators.atr_ratio.iter().flatten().copied().collect();
    let volatility = VolatilityProfile {
        high_volatility_periods: ratios
            .iter()
            .filter(|&&r| r > config.volatility_threshold)
            .count(),
        low_volatility_periods: ratios
            .iter()
            .filter(|&&r| r < config.low_volatility_ratio)
            .count(),
        atr_ratio_min: ratios.iter().copied().reduce(f64::min),
        atr_ratio_max: ratios.iter().copied().reduce(f64::max),
    };

    let gaps = GapProfile {
        average_gap_pct: mean(&indicators.gap_pct),
        average_morning_reversal_pct: mean(&indicators.morning_reversal_pct),
        average_evening_reversal_pct: mean(&indicators.evening_reversal_pct),
        largest_gap_up_pct: indicators.gap_pct.iter().flatten().copied().reduce(f64::max),
        largest_gap_down_pct: indicators.gap_pct.iter().flatten().copied().reduce(f64::min),
    };

    MarketProfile {
        risk,
        volatility,
        gaps,
    }
}

/// Mean of the defined values, `None` when there are none.
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
