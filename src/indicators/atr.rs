// =============================================================================
// Average True Range (ATR) — simple moving average of True Range
// =============================================================================
//
// True Range (TR) for each bar:
//   TR_0 = H - L                                  (no previous close)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR_t is the plain SMA of the trailing `period` TR values, so the first
// `period - 1` bars have no ATR.
//
// ATR ratio compares the current ATR with its own `baseline` moving average:
//   ATR_ratio_t = ATR_t / SMA(ATR, baseline)_t
// and is therefore cold for the first `period + baseline - 2` bars.
// =============================================================================

use crate::indicators::rolling::{finite, ratio, sma, sma_opt};
use crate::market_data::Bar;

/// Per-bar True Range, aligned with `bars`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                Some(prev_close) => {
                    let hc = (bar.high - prev_close).abs();
                    let lc = (bar.low - prev_close).abs();
                    hl.max(hc).max(lc)
                }
                None => hl,
            }
        })
        .collect()
}

/// ATR series aligned with the true-range input.
pub fn calculate_atr(tr: &[f64], period: usize) -> Vec<Option<f64>> {
    sma(tr, period)
}

/// ATR divided by its own `baseline`-bar moving average.
///
/// `None` while either window is cold or when the baseline average is zero.
pub fn calculate_atr_ratio(atr: &[Option<f64>], baseline: usize) -> Vec<Option<f64>> {
    let baseline_ma = sma_opt(atr, baseline);
    atr.iter()
        .zip(&baseline_ma)
        .map(|(&a, &b)| ratio(a, b))
        .collect()
}

/// Volatility bands `close ± ATR * multiplier`, returned as `(upper, lower)`.
pub fn calculate_atr_bands(
    closes: &[f64],
    atr: &[Option<f64>],
    multiplier: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    closes
        .iter()
        .zip(atr)
        .map(|(&close, &a)| match a {
            Some(a) => (finite(close + a * multiplier), finite(close - a * multiplier)),
            None => (None, None),
        })
        .unzip()
}
