// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (span + 1)
//   EMA_0      = close_0
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// Seeding with the first close (rather than an SMA) means the series is
// defined from the very first bar.
// =============================================================================

/// Compute the EMA series for the given `closes` and `span`.
///
/// The output is aligned 1:1 with `closes` and every slot is defined, except
/// that `span == 0` yields all `None` and a non-finite intermediate value
/// leaves that slot and every later slot undefined.
pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if span == 0 || closes.is_empty() {
        return result;
    }

    let multiplier = 2.0 / (span + 1) as f64;

    let mut prev_ema = closes[0];
    for (i, &close) in closes.iter().enumerate() {
        let ema = if i == 0 {
            close
        } else {
            close * multiplier + prev_ema * (1.0 - multiplier)
        };
        if !ema.is_finite() {
            // A broken seed poisons every later value.
            break;
        }
        result[i] = Some(ema);
        prev_ema = ema;
    }

    result
}

/// `Some(true)` when the fast EMA is above the slow one, `Some(false)` when
/// below, `None` when either is undefined or they are equal.
pub fn trend(fast: Option<f64>, slow: Option<f64>) -> Option<bool> {
    let (f, s) = (fast?, slow?);
    if f > s {
        Some(true)
    } else if f < s {
        Some(false)
    } else {
        None
    }
}
