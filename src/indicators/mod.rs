// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators used by the rule
// library.  Every series is aligned 1:1 with the bar sequence and uses `None`
// for "not yet available" (warm-up windows, zero denominators), never zero.
//
// `compute` is the single entry point: it derives the whole `IndicatorSet`
// from a validated `BarSeries` in one pass per indicator.  There is no
// incremental update; a changed series means a fresh `compute`.
// =============================================================================

pub mod atr;
pub mod ema;
pub mod gap;
pub mod rolling;
pub mod rsi;
pub mod volume;
pub mod zscore;

use serde::Serialize;
use tracing::debug;

use crate::market_data::BarSeries;
use crate::rule_config::RuleConfig;

/// Every derived series for one bar history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub true_range: Vec<Option<f64>>,
    pub atr: Vec<Option<f64>>,
    pub atr_upper: Vec<Option<f64>>,
    pub atr_lower: Vec<Option<f64>>,
    pub atr_ratio: Vec<Option<f64>>,
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub volume_ma: Vec<Option<f64>>,
    pub volume_ratio: Vec<Option<f64>>,
    pub rolling_mean: Vec<Option<f64>>,
    pub rolling_std: Vec<Option<f64>>,
    pub z_score: Vec<Option<f64>>,
    pub overnight_gap: Vec<Option<f64>>,
    pub gap_pct: Vec<Option<f64>>,
    pub morning_reversal_pct: Vec<Option<f64>>,
    pub evening_reversal_pct: Vec<Option<f64>>,
}

impl IndicatorSet {
    /// Series names in presentation order.
    pub const NAMES: [&'static str; 17] = [
        "true_range",
        "atr",
        "atr_upper",
        "atr_lower",
        "atr_ratio",
        "ema_fast",
        "ema_slow",
        "rsi",
        "volume_ma",
        "volume_ratio",
        "rolling_mean",
        "rolling_std",
        "z_score",
        "overnight_gap",
        "gap_pct",
        "morning_reversal_pct",
        "evening_reversal_pct",
    ];

    /// Number of bars the set was computed for (0 for an empty set).
    pub fn len(&self) -> usize {
        self.ema_fast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a series by name.
    pub fn series(&self, name: &str) -> Option<&[Option<f64>]> {
        let s = match name {
            "true_range" => &self.true_range,
            "atr" => &self.atr,
            "atr_upper" => &self.atr_upper,
            "atr_lower" => &self.atr_lower,
            "atr_ratio" => &self.atr_ratio,
            "ema_fast" => &self.ema_fast,
            "ema_slow" => &self.ema_slow,
            "rsi" => &self.rsi,
            "volume_ma" => &self.volume_ma,
            "volume_ratio" => &self.volume_ratio,
            "rolling_mean" => &self.rolling_mean,
            "rolling_std" => &self.rolling_std,
            "z_score" => &self.z_score,
            "overnight_gap" => &self.overnight_gap,
            "gap_pct" => &self.gap_pct,
            "morning_reversal_pct" => &self.morning_reversal_pct,
            "evening_reversal_pct" => &self.evening_reversal_pct,
            _ => return None,
        };
        Some(s.as_slice())
    }

    /// All series as `(name, values)` pairs in presentation order.
    pub fn columns(&self) -> Vec<(&'static str, &[Option<f64>])> {
        Self::NAMES
            .iter()
            .filter_map(|&name| self.series(name).map(|s| (name, s)))
            .collect()
    }

    /// First-hour move % for bar `i`.  On daily bars this is the open-to-high
    /// push, i.e. the morning reversal.
    pub fn first_hour_move(&self, i: usize) -> Option<f64> {
        self.morning_reversal_pct.get(i).copied().flatten()
    }
}

/// Derive every indicator for `series` under `config`.
pub fn compute(series: &BarSeries, config: &RuleConfig) -> IndicatorSet {
    let bars = series.bars();
    let closes = series.closes();
    let volumes = series.volumes();

    let tr = atr::true_range(bars);
    let atr_values = atr::calculate_atr(&tr, config.atr_window);
    let atr_ratio = atr::calculate_atr_ratio(&atr_values, config.atr_baseline_window);
    let (atr_upper, atr_lower) =
        atr::calculate_atr_bands(&closes, &atr_values, config.stop_loss_multiplier);

    let (volume_ma, volume_ratio) = volume::calculate_volume_ratio(&volumes, config.volume_window);
    let z = zscore::calculate_zscore(&closes, config.lookback);
    let gaps = gap::calculate_gaps(bars);

    let set = IndicatorSet {
        true_range: tr.into_iter().map(rolling::finite).collect(),
        atr: atr_values,
        atr_upper,
        atr_lower,
        atr_ratio,
        ema_fast: ema::calculate_ema(&closes, config.ema_fast),
        ema_slow: ema::calculate_ema(&closes, config.ema_slow),
        rsi: rsi::calculate_rsi(&closes, config.rsi_window),
        volume_ma,
        volume_ratio,
        rolling_mean: z.mean,
        rolling_std: z.std,
        z_score: z.z_score,
        overnight_gap: gaps.gap,
        gap_pct: gaps.gap_pct,
        morning_reversal_pct: bars.iter().map(gap::morning_reversal_pct).collect(),
        evening_reversal_pct: bars.iter().map(gap::evening_reversal_pct).collect(),
    };

    debug!(
        symbol = series.symbol(),
        bars = set.len(),
        atr_defined = set.atr.iter().flatten().count(),
        z_defined = set.z_score.iter().flatten().count(),
        "indicators computed"
    );

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Bar;
    use chrono::NaiveDate;

    fn wavy_series(n: usize) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.45).sin() * 4.0 + i as f64 * 0.05;
                let open = base - 0.3;
                let close = base + 0.2 * (i as f64).cos();
                let high = open.max(close) + 1.0 + (i % 3) as f64 * 0.2;
                let low = open.min(close) - 0.8;
                let volume = 1_000_000.0 + (i % 7) as f64 * 50_000.0;
                Bar::new(start + chrono::Days::new(i as u64), open, high, low, close, volume)
            })
            .collect();
        BarSeries::new("QQQ", bars).unwrap()
    }

    #[test]
    fn every_series_matches_bar_count() {
        let series = wavy_series(80);
        let set = compute(&series, &RuleConfig::default());
        assert_eq!(set.len(), 80);
        for (name, values) in set.columns() {
            assert_eq!(values.len(), 80, "{name} misaligned");
        }
        assert_eq!(set.columns().len(), IndicatorSet::NAMES.len());
    }

    #[test]
    fn warm_up_boundaries_with_default_windows() {
        let series = wavy_series(80);
        let set = compute(&series, &RuleConfig::default());

        let first_defined = |s: &[Option<f64>]| s.iter().position(Option::is_some);
        assert_eq!(first_defined(&set.atr), Some(13));
        assert_eq!(first_defined(&set.atr_ratio), Some(13 + 19));
        assert_eq!(first_defined(&set.rsi), Some(14));
        assert_eq!(first_defined(&set.volume_ratio), Some(19));
        assert_eq!(first_defined(&set.z_score), Some(4));
        assert_eq!(first_defined(&set.gap_pct), Some(1));
        assert_eq!(first_defined(&set.ema_fast), Some(0));
        assert_eq!(first_defined(&set.morning_reversal_pct), Some(0));

        // Defined everywhere after warm-up on non-degenerate data.
        assert!(set.atr_ratio[32..].iter().all(Option::is_some));
        assert!(set.rsi[14..].iter().all(Option::is_some));
    }

    #[test]
    fn ema_starts_at_first_close() {
        let series = wavy_series(10);
        let set = compute(&series, &RuleConfig::default());
        assert_eq!(set.ema_fast[0], Some(series.bars()[0].close));
        assert_eq!(set.ema_slow[0], Some(series.bars()[0].close));
    }

    #[test]
    fn short_history_is_not_an_error() {
        let series = wavy_series(3);
        let set = compute(&series, &RuleConfig::default());
        assert!(set.atr.iter().all(Option::is_none));
        assert!(set.rsi.iter().all(Option::is_none));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn series_lookup_by_name() {
        let set = compute(&wavy_series(5), &RuleConfig::default());
        assert!(set.series("gap_pct").is_some());
        assert!(set.series("macd").is_none());
        assert_eq!(set.first_hour_move(0), set.morning_reversal_pct[0]);
        assert_eq!(set.first_hour_move(99), None);
    }

    #[test]
    fn serialises_undefined_as_null() {
        let set = compute(&wavy_series(2), &RuleConfig::default());
        let json = serde_json::to_value(&set).unwrap();
        assert!(json["gap_pct"][0].is_null());
        assert!(json["gap_pct"][1].is_number());
    }
}
