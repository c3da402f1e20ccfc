// =============================================================================
// Rule Library — six direction-symmetric predicates
// =============================================================================
//
// Each rule looks at exactly one bar (plus the indicators already aligned to
// it) and returns at most one signal.  Rules never see each other's output,
// so several of them may fire on the same bar.
//
//   Rule               Long when                                   Risk band
//   -----------------  ------------------------------------------  -----------
//   Mean_Reversion     EMA fast > slow, z < -zt, vol > vt, ATRr > at  close ± ATR
//   Morning_Reversal   gap% < -gt, open→high % > rt                  open ± ATR
//   Evening_Reversal   gap% < -gt, open→close % > rt                 close ± ATR
//   First_Hour_Fade    first-hour move down (fade it)                none
//   Gap_Fade           gap% < -ft (buy the open)                      none
//   Extreme_Move_Fade  |first-hour move| ≥ et, against the move       none
//
// Short mirrors flip every comparison and put the stop above the entry.
// A rule whose inputs include an undefined value does not fire.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::{ema, IndicatorSet};
use crate::market_data::Bar;
use crate::rule_config::RuleConfig;
use crate::signals::Signal;
use crate::types::Direction;

/// Identifier of a rule in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "Mean_Reversion")]
    MeanReversion,
    #[serde(rename = "Morning_Reversal")]
    MorningReversal,
    #[serde(rename = "Evening_Reversal")]
    EveningReversal,
    #[serde(rename = "First_Hour_Fade")]
    FirstHourFade,
    #[serde(rename = "Gap_Fade")]
    GapFade,
    #[serde(rename = "Extreme_Move_Fade")]
    ExtremeMoveFade,
}

impl RuleKind {
    /// Every rule, in table order.
    pub const ALL: [RuleKind; 6] = [
        Self::MeanReversion,
        Self::MorningReversal,
        Self::EveningReversal,
        Self::FirstHourFade,
        Self::GapFade,
        Self::ExtremeMoveFade,
    ];

    /// The trend / volatility dashboard rule set.
    pub const DASHBOARD: &'static [RuleKind] =
        &[Self::MeanReversion, Self::MorningReversal, Self::EveningReversal];

    /// The intraday fade rule set.
    pub const FADE: &'static [RuleKind] =
        &[Self::FirstHourFade, Self::GapFade, Self::ExtremeMoveFade];

    /// Human-readable label attached to every signal.
    pub fn label(self) -> &'static str {
        match self {
            Self::MeanReversion => "Mean_Reversion",
            Self::MorningReversal => "Morning_Reversal",
            Self::EveningReversal => "Evening_Reversal",
            Self::FirstHourFade => "First_Hour_Fade",
            Self::GapFade => "Gap_Fade",
            Self::ExtremeMoveFade => "Extreme_Move_Fade",
        }
    }

    /// Whether signals of this rule carry stop-loss / take-profit levels.
    pub fn has_risk_band(self) -> bool {
        matches!(
            self,
            Self::MeanReversion | Self::MorningReversal | Self::EveningReversal
        )
    }

    /// Evaluate this rule on bar `ctx.index`.
    pub fn evaluate(self, ctx: &BarContext<'_>) -> Option<Signal> {
        match self {
            Self::MeanReversion => mean_reversion(ctx),
            Self::MorningReversal => morning_reversal(ctx),
            Self::EveningReversal => evening_reversal(ctx),
            Self::FirstHourFade => first_hour_fade(ctx),
            Self::GapFade => gap_fade(ctx),
            Self::ExtremeMoveFade => extreme_move_fade(ctx),
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Per-bar context
// =============================================================================

/// Everything a rule may read for one bar.
pub struct BarContext<'a> {
    pub index: usize,
    pub bar: &'a Bar,
    pub indicators: &'a IndicatorSet,
    pub config: &'a RuleConfig,
}

impl<'a> BarContext<'a> {
    pub fn new(
        index: usize,
        bar: &'a Bar,
        indicators: &'a IndicatorSet,
        config: &'a RuleConfig,
    ) -> Self {
        Self {
            index,
            bar,
            indicators,
            config,
        }
    }

    /// Value of an indicator series at this bar.
    fn at(&self, series: &[Option<f64>]) -> Option<f64> {
        series.get(self.index).copied().flatten()
    }

    fn signal(&self, rule: RuleKind, direction: Direction, price: f64, reason: String) -> Signal {
        Signal {
            index: self.index,
            date: self.bar.date,
            direction,
            price,
            rule,
            reason,
            stop_loss: None,
            take_profit: None,
        }
    }

    /// Signal with an ATR risk band anchored at `anchor`.
    fn banded_signal(
        &self,
        rule: RuleKind,
        direction: Direction,
        anchor: f64,
        atr: f64,
        reason: String,
    ) -> Signal {
        let sign = direction.sign();
        Signal {
            stop_loss: Some(anchor - sign * atr * self.config.stop_loss_multiplier),
            take_profit: Some(anchor + sign * atr * self.config.take_profit_multiplier),
            ..self.signal(rule, direction, anchor, reason)
        }
    }
}

// =============================================================================
// Rule predicates
// =============================================================================

fn mean_reversion(ctx: &BarContext<'_>) -> Option<Signal> {
    let ind = ctx.indicators;
    let cfg = ctx.config;

    let uptrend = ema::trend(ctx.at(&ind.ema_fast), ctx.at(&ind.ema_slow))?;
    let z = ctx.at(&ind.z_score)?;
    let volume_ratio = ctx.at(&ind.volume_ratio)?;
    let atr_ratio = ctx.at(&ind.atr_ratio)?;
    let atr = ctx.at(&ind.atr)?;

    if volume_ratio <= cfg.volume_threshold || atr_ratio <= cfg.volatility_threshold {
        return None;
    }

    let direction = if uptrend && z < -cfg.zscore_threshold {
        Direction::Buy
    } else if !uptrend && z > cfg.zscore_threshold {
        Direction::Sell
    } else {
        return None;
    };

    let reason = format!(
        "{} trend with z-score {z:.2}, volume ratio {volume_ratio:.2}, ATR ratio {atr_ratio:.2}",
        if uptrend { "up" } else { "down" },
    );
    Some(ctx.banded_signal(RuleKind::MeanReversion, direction, ctx.bar.close, atr, reason))
}

/// Shared shape of the morning / evening reversal: a gap beyond the threshold
/// followed by an intraday move back against it.
fn gap_reversal(
    ctx: &BarContext<'_>,
    rule: RuleKind,
    reversal: Option<f64>,
    anchor: f64,
) -> Option<Signal> {
    let cfg = ctx.config;
    let gap_pct = ctx.at(&ctx.indicators.gap_pct)?;
    let reversal = reversal?;
    let atr = ctx.at(&ctx.indicators.atr)?;

    let direction = if gap_pct < -cfg.gap_threshold && reversal > cfg.reversal_threshold {
        Direction::Buy
    } else if gap_pct > cfg.gap_threshold && reversal < -cfg.reversal_threshold {
        Direction::Sell
    } else {
        return None;
    };

    let reason = format!("gap {gap_pct:.2}% reversed by {reversal:.2}% intraday");
    Some(ctx.banded_signal(rule, direction, anchor, atr, reason))
}

fn morning_reversal(ctx: &BarContext<'_>) -> Option<Signal> {
    let reversal = ctx.at(&ctx.indicators.morning_reversal_pct);
    gap_reversal(ctx, RuleKind::MorningReversal, reversal, ctx.bar.open)
}

fn evening_reversal(ctx: &BarContext<'_>) -> Option<Signal> {
    let reversal = ctx.at(&ctx.indicators.evening_reversal_pct);
    gap_reversal(ctx, RuleKind::EveningReversal, reversal, ctx.bar.close)
}

/// Fade rules start at the second bar of the history.
fn fade_eligible(ctx: &BarContext<'_>) -> bool {
    ctx.index >= 1
}

fn first_hour_fade(ctx: &BarContext<'_>) -> Option<Signal> {
    if !fade_eligible(ctx) {
        return None;
    }
    let moved = ctx.indicators.first_hour_move(ctx.index)?;
    let (direction, reason) = if moved > 0.0 {
        (Direction::Sell, "First hour up move fade")
    } else {
        (Direction::Buy, "First hour down move fade")
    };
    Some(ctx.signal(RuleKind::FirstHourFade, direction, ctx.bar.close, reason.to_string()))
}

fn gap_fade(ctx: &BarContext<'_>) -> Option<Signal> {
    if !fade_eligible(ctx) {
        return None;
    }
    let gap_pct = ctx.at(&ctx.indicators.gap_pct)?;
    let threshold = ctx.config.fade_gap_threshold;
    let (direction, reason) = if gap_pct > threshold {
        (Direction::Sell, "Gap up fade")
    } else if gap_pct < -threshold {
        (Direction::Buy, "Gap down fade")
    } else {
        return None;
    };
    Some(ctx.signal(RuleKind::GapFade, direction, ctx.bar.open, reason.to_string()))
}

fn extreme_move_fade(ctx: &BarContext<'_>) -> Option<Signal> {
    if !fade_eligible(ctx) {
        return None;
    }
    let moved = ctx.indicators.first_hour_move(ctx.index)?;
    if moved.abs() < ctx.config.extreme_move_threshold {
        return None;
    }
    let (direction, reason) = if moved > 0.0 {
        (Direction::Sell, "Extreme up move fade")
    } else {
        (Direction::Buy, "Extreme down move fade")
    };
    Some(ctx.signal(RuleKind::ExtremeMoveFade, direction, ctx.bar.close, reason.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), open, high, low, close, 1.0)
    }

    /// Two-bar indicator set where bar 1 carries the given values.
    fn indicators_at_1(f: impl FnOnce(&mut IndicatorSet)) -> IndicatorSet {
        let mut set = IndicatorSet {
            true_range: vec![None; 2],
            atr: vec![None, Some(2.0)],
            atr_upper: vec![None; 2],
            atr_lower: vec![None; 2],
            atr_ratio: vec![None, Some(1.5)],
            ema_fast: vec![Some(100.0), Some(105.0)],
            ema_slow: vec![Some(100.0), Some(101.0)],
            rsi: vec![None; 2],
            volume_ma: vec![None; 2],
            volume_ratio: vec![None, Some(2.0)],
            rolling_mean: vec![None; 2],
            rolling_std: vec![None; 2],
            z_score: vec![None, Some(-2.5)],
            overnight_gap: vec![None; 2],
            gap_pct: vec![None, Some(0.0)],
            morning_reversal_pct: vec![Some(0.0), Some(0.0)],
            evening_reversal_pct: vec![Some(0.0), Some(0.0)],
        };
        f(&mut set);
        set
    }

    fn eval(rule: RuleKind, b: &Bar, set: &IndicatorSet) -> Option<Signal> {
        let cfg = RuleConfig::default();
        rule.evaluate(&BarContext::new(1, b, set, &cfg))
    }

    #[test]
    fn mean_reversion_buy_risk_band_is_exact() {
        let b = bar(99.0, 100.5, 97.0, 98.0);
        let set = indicators_at_1(|_| {});
        let s = eval(RuleKind::MeanReversion, &b, &set).unwrap();
        assert_eq!(s.direction, Direction::Buy);
        assert_eq!(s.price, 98.0);
        assert_eq!(s.stop_loss, Some(98.0 - 2.0 * 2.0));
        assert_eq!(s.take_profit, Some(98.0 + 2.0 * 4.0));
        assert_eq!(s.rule.label(), "Mean_Reversion");
    }

    #[test]
    fn mean_reversion_sell_mirrors_band() {
        let b = bar(101.0, 103.0, 100.0, 102.0);
        let set = indicators_at_1(|s| {
            s.ema_fast[1] = Some(99.0);
            s.z_score[1] = Some(2.5);
        });
        let s = eval(RuleKind::MeanReversion, &b, &set).unwrap();
        assert_eq!(s.direction, Direction::Sell);
        assert_eq!(s.stop_loss, Some(102.0 + 4.0));
        assert_eq!(s.take_profit, Some(102.0 - 8.0));
    }

    #[test]
    fn mean_reversion_needs_every_condition() {
        let b = bar(99.0, 100.5, 97.0, 98.0);
        let weak_volume = indicators_at_1(|s| s.volume_ratio[1] = Some(1.5));
        assert!(eval(RuleKind::MeanReversion, &b, &weak_volume).is_none());
        let calm = indicators_at_1(|s| s.atr_ratio[1] = Some(1.1));
        assert!(eval(RuleKind::MeanReversion, &b, &calm).is_none());
        let mild = indicators_at_1(|s| s.z_score[1] = Some(-1.9));
        assert!(eval(RuleKind::MeanReversion, &b, &mild).is_none());
        // Oversold but in a downtrend: no long, and not overbought for a short.
        let downtrend = indicators_at_1(|s| s.ema_fast[1] = Some(99.0));
        assert!(eval(RuleKind::MeanReversion, &b, &downtrend).is_none());
    }

    #[test]
    fn undefined_input_suppresses_rule() {
        let b = bar(99.0, 100.5, 97.0, 98.0);
        let cold = indicators_at_1(|s| s.atr_ratio[1] = None);
        assert!(eval(RuleKind::MeanReversion, &b, &cold).is_none());
        let no_atr = indicators_at_1(|s| {
            s.atr[1] = None;
            s.gap_pct[1] = Some(-2.0);
            s.morning_reversal_pct[1] = Some(1.0);
        });
        assert!(eval(RuleKind::MorningReversal, &b, &no_atr).is_none());
    }

    #[test]
    fn morning_reversal_anchors_on_open() {
        let b = bar(95.0, 96.0, 94.5, 95.2);
        let set = indicators_at_1(|s| {
            s.gap_pct[1] = Some(-5.0);
            s.morning_reversal_pct[1] = Some(1.05);
        });
        let s = eval(RuleKind::MorningReversal, &b, &set).unwrap();
        assert_eq!(s.direction, Direction::Buy);
        assert_eq!(s.price, 95.0);
        assert_eq!(s.stop_loss, Some(95.0 - 4.0));
        assert_eq!(s.take_profit, Some(95.0 + 8.0));
    }

    #[test]
    fn evening_reversal_sell_after_gap_up() {
        let b = bar(105.0, 105.5, 103.0, 104.0);
        let set = indicators_at_1(|s| {
            s.gap_pct[1] = Some(3.0);
            s.evening_reversal_pct[1] = Some(-0.95);
        });
        let s = eval(RuleKind::EveningReversal, &b, &set).unwrap();
        assert_eq!(s.direction, Direction::Sell);
        assert_eq!(s.price, 104.0);
        assert_eq!(s.stop_loss, Some(108.0));
        assert_eq!(s.take_profit, Some(96.0));
    }

    #[test]
    fn evening_reversal_buy_after_gap_down() {
        let b = bar(95.0, 96.5, 94.5, 96.0);
        let set = indicators_at_1(|s| {
            s.gap_pct[1] = Some(-2.0);
            s.evening_reversal_pct[1] = Some(1.05);
        });
        let s = eval(RuleKind::EveningReversal, &b, &set).unwrap();
        assert_eq!(s.direction, Direction::Buy);
        assert_eq!(s.price, 96.0);
        assert_eq!(s.stop_loss, Some(92.0));
        assert_eq!(s.take_profit, Some(104.0));
    }

    #[test]
    fn first_hour_fade_bets_against_the_move() {
        let b = bar(100.0, 101.0, 99.0, 100.5);
        let up = indicators_at_1(|s| s.morning_reversal_pct[1] = Some(1.0));
        let s = eval(RuleKind::FirstHourFade, &b, &up).unwrap();
        assert_eq!(s.direction, Direction::Sell);
        assert_eq!(s.price, 100.5);
        assert!(s.stop_loss.is_none() && s.take_profit.is_none());

        let flat = indicators_at_1(|s| s.morning_reversal_pct[1] = Some(0.0));
        assert_eq!(eval(RuleKind::FirstHourFade, &b, &flat).unwrap().direction, Direction::Buy);
    }

    #[test]
    fn fade_rules_skip_first_bar() {
        let b = bar(100.0, 103.0, 99.0, 100.5);
        let set = indicators_at_1(|s| s.morning_reversal_pct[0] = Some(3.0));
        let cfg = RuleConfig::default();
        let ctx = BarContext::new(0, &b, &set, &cfg);
        assert!(RuleKind::FirstHourFade.evaluate(&ctx).is_none());
        assert!(RuleKind::ExtremeMoveFade.evaluate(&ctx).is_none());
    }

    #[test]
    fn gap_fade_trades_the_open() {
        let b = bar(98.0, 99.0, 97.0, 98.5);
        let down = indicators_at_1(|s| s.gap_pct[1] = Some(-1.5));
        let s = eval(RuleKind::GapFade, &b, &down).unwrap();
        assert_eq!((s.direction, s.price), (Direction::Buy, 98.0));

        let b_up = bar(102.0, 103.0, 101.0, 101.5);
        let up = indicators_at_1(|s| s.gap_pct[1] = Some(2.0));
        let s = eval(RuleKind::GapFade, &b_up, &up).unwrap();
        assert_eq!((s.direction, s.price), (Direction::Sell, 102.0));
        assert_eq!(s.reason, "Gap up fade");
        assert!(s.stop_loss.is_none() && s.take_profit.is_none());

        let small = indicators_at_1(|s| s.gap_pct[1] = Some(0.8));
        assert!(eval(RuleKind::GapFade, &b, &small).is_none());
    }

    #[test]
    fn extreme_move_threshold_is_inclusive() {
        let b = bar(100.0, 101.0, 99.0, 100.5);
        let at_threshold = indicators_at_1(|s| s.morning_reversal_pct[1] = Some(1.0));
        let s = eval(RuleKind::ExtremeMoveFade, &b, &at_threshold).unwrap();
        assert_eq!(s.direction, Direction::Sell);

        let below = indicators_at_1(|s| s.morning_reversal_pct[1] = Some(0.99));
        assert!(eval(RuleKind::ExtremeMoveFade, &b, &below).is_none());
    }

    #[test]
    fn labels_and_serde_names() {
        assert_eq!(RuleKind::ExtremeMoveFade.to_string(), "Extreme_Move_Fade");
        for rule in RuleKind::ALL {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.label()));
            assert_eq!(serde_json::from_str::<RuleKind>(&json).unwrap(), rule);
        }
        assert!(RuleKind::EveningReversal.has_risk_band());
        assert!(!RuleKind::GapFade.has_risk_band());
        assert_eq!(RuleKind::DASHBOARD.len() + RuleKind::FADE.len(), RuleKind::ALL.len());
    }
}
