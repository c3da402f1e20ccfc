// =============================================================================
// Rolling-window helpers
// =============================================================================
//
// Every trailing window includes the current bar.  A window is "warm" once it
// holds `period` values; until then the output slot is `None`.  Windows over
// optional inputs stay cold while any value inside them is `None`.
// =============================================================================

/// Simple moving average aligned 1:1 with `values`.
///
/// The first `period - 1` slots are `None`.  `period == 0` yields all `None`.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        out[i] = finite(window.iter().sum::<f64>() / period as f64);
    }
    out
}

/// Simple moving average over an optional series.
///
/// A slot is defined only when all `period` values in its window are defined.
pub fn sma_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let sum: Option<f64> = window.iter().copied().sum();
        out[i] = sum.and_then(|s| finite(s / period as f64));
    }
    out
}

/// Sample (n - 1) standard deviation over a trailing window.
///
/// `None` for the first `period - 1` slots and everywhere when `period < 2`.
/// A window whose values are all equal yields exactly `0.0`; the rounding in
/// a summed mean would otherwise leave a residue around 1e-14.
pub fn sample_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period < 2 {
        return out;
    }
    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().all(|&x| x == window[0]) {
            out[i] = Some(0.0);
            continue;
        }
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        out[i] = finite(variance.sqrt());
    }
    out
}

/// `numerator / denominator` when both are defined and the denominator is
/// non-zero.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => finite(n / d),
        _ => None,
    }
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value)
    } else {
        None
    }
}
