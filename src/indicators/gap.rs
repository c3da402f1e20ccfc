// =============================================================================
// Overnight Gap & Intraday Reversal
// =============================================================================
//
//   gap_t          = open_t - close_{t-1}
//   gap_pct_t      = gap_t / close_{t-1} * 100
//   morning_rev_t  = (high_t - open_t) / open_t * 100
//   evening_rev_t  = (close_t - open_t) / open_t * 100
//
// The gap needs the previous close, so bar 0 has none.  Both reversal
// measures only look at the bar itself and are defined from bar 0.
//
// With daily bars the morning reversal doubles as the "first-hour move": the
// push from the open to the session high.
// =============================================================================

use crate::indicators::rolling::finite;
use crate::market_data::Bar;

/// Overnight gap series, aligned with the bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapSeries {
    pub gap: Vec<Option<f64>>,
    pub gap_pct: Vec<Option<f64>>,
}

/// Compute the overnight gap and gap percentage for every bar.
pub fn calculate_gaps(bars: &[Bar]) -> GapSeries {
    let mut gap = vec![None; bars.len()];
    let mut gap_pct = vec![None; bars.len()];
    for (i, pair) in bars.windows(2).enumerate() {
        let prev_close = pair[0].close;
        let g = pair[1].open - prev_close;
        gap[i + 1] = finite(g);
        if prev_close != 0.0 {
            gap_pct[i + 1] = finite(g / prev_close * 100.0);
        }
    }
    GapSeries { gap, gap_pct }
}

/// Percentage move from the open to the high.
pub fn morning_reversal_pct(bar: &Bar) -> Option<f64> {
    pct_from_open(bar, bar.high)
}

/// Percentage move from the open to the close.
pub fn evening_reversal_pct(bar: &Bar) -> Option<f64> {
    pct_from_open(bar, bar.close)
}

fn pct_from_open(bar: &Bar, price: f64) -> Option<f64> {
    if bar.open == 0.0 {
        return None;
    }
    finite((price - bar.open) / bar.open * 100.0)
}
