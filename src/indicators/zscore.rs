// =============================================================================
// Rolling Z-Score
// =============================================================================
//
// Over the trailing `lookback` closes (current bar included):
//   mean = SMA(close, lookback)
//   std  = sample standard deviation (n - 1) of the same window
//   z    = (close - mean) / std
//
// z is undefined while the window is cold and whenever std is zero (a flat
// window has no dispersion to measure against).

use crate::indicators::rolling::{ratio, sample_std, sma};

/// Rolling mean, standard deviation and z-score of the close, each aligned
/// 1:1 with the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZScoreSeries {
    pub mean: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
    pub z_score: Vec<Option<f64>>,
}

/// Calculate the rolling z-score of `closes` over `lookback` bars.
pub fn calculate_zscore(closes: &[f64], lookback: usize) -> ZScoreSeries {
    let mean = sma(closes, lookback);
    let std = sample_std(closes, lookback);

    let z_score = closes
        .iter()
        .zip(mean.iter().zip(&std))
        .map(|(&close, (&m, &s))| ratio(m.map(|m| close - m), s))
        .collect();

    ZScoreSeries { mean, std, z_score }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zscore_basic() {
        // Window [1, 2, 3, 4, 10]: mean 4, sample var (9+4+1+0+36)/4 = 12.5.
        let closes = [1.0, 2.0, 3.0, 4.0, 10.0];
        let z = calculate_zscore(&closes, 5);
        assert!(z.z_score[..4].iter().all(Option::is_none));
        let expected = 6.0 / 12.5_f64.sqrt();
        assert!((z.z_score[4].unwrap() - expected).abs() < 1e-10);
        assert_eq!(z.mean[4], Some(4.0));
    }

    #[test]
    fn zscore_flat_window_is_undefined() {
        let closes = vec![100.0; 10];
        let z = calculate_zscore(&closes, 5);
        assert_eq!(z.std[9], Some(0.0));
        assert!(z.z_score.iter().all(Option::is_none));
    }

    #[test]
    fn zscore_flat_inexact_price_is_undefined() {
        // 100.1 has no exact binary form, so a summed mean drifts off it.
        for lookback in [10, 20] {
            let z = calculate_zscore(&vec![100.1; 40], lookback);
            assert_eq!(z.std[39], Some(0.0));
            assert!(z.z_score.iter().all(Option::is_none), "lookback {lookback}");
        }
    }

    #[test]
    fn zscore_insufficient_data() {
        let z = calculate_zscore(&[1.0, 2.0, 3.0], 5);
        assert_eq!(z.z_score, vec![None; 3]);
        assert_eq!(z.mean.len(), 3);
    }
}
