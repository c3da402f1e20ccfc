// =============================================================================
// Volume Ratio
// =============================================================================
//
//   volume_ma_t    = SMA(volume, period)_t
//   volume_ratio_t = volume_t / volume_ma_t
//
// A zero moving average (no trading across the whole window) leaves the ratio
// undefined rather than infinite.

use crate::indicators::rolling::{ratio, sma};

/// Returns `(volume_ma, volume_ratio)`, both aligned with `volumes`.
pub fn calculate_volume_ratio(volumes: &[f64], period: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let ma = sma(volumes, period);
    let ratios = volumes
        .iter()
        .zip(&ma)
        .map(|(&v, &m)| ratio(Some(v), m))
        .collect();
    (ma, ratios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_ratio_basic() {
        let (ma, ratio) = calculate_volume_ratio(&[100.0, 100.0, 400.0], 3);
        assert_eq!(ma, vec![None, None, Some(200.0)]);
        assert_eq!(ratio, vec![None, None, Some(2.0)]);
    }

    #[test]
    fn zero_volume_window_is_undefined() {
        let (_, ratio) = calculate_volume_ratio(&[0.0; 4], 2);
        assert!(ratio.iter().all(Option::is_none));
    }
}
