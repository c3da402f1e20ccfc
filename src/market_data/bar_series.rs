use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the OHLC consistency rules for a single bar.
    fn check(&self, index: usize) -> Result<()> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(self.reject(index, format!("{name} must be positive and finite, got {value}")));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(self.reject(index, format!("volume must be non-negative, got {}", self.volume)));
        }
        if self.high < self.low {
            return Err(self.reject(index, format!("high {} below low {}", self.high, self.low)));
        }
        if self.high < self.open.max(self.close) {
            return Err(self.reject(index, format!("high {} below open/close", self.high)));
        }
        if self.low > self.open.min(self.close) {
            return Err(self.reject(index, format!("low {} above open/close", self.low)));
        }
        Ok(())
    }

    fn reject(&self, index: usize, detail: String) -> EngineError {
        EngineError::InvalidInput(format!("bar {index} ({}): {detail}", self.date))
    }
}

// ---------------------------------------------------------------------------
// BarSeries -- validated, date-ordered daily history for one symbol
// ---------------------------------------------------------------------------

/// An immutable, validated daily bar history for a single symbol.
///
/// Construction is the only place input is checked; every downstream stage
/// may assume the series is non-empty, strictly increasing by date and
/// OHLC-consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate `bars` and wrap them into a series.
    ///
    /// Fails with [`EngineError::InvalidInput`] when the sequence is empty,
    /// a date does not strictly follow the previous one, or any bar breaks
    /// the OHLC rules.  No partial series is ever returned.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "bar series for {symbol} is empty"
            )));
        }

        for (i, bar) in bars.iter().enumerate() {
            bar.check(i)?;
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(bar.reject(
                    i,
                    format!("date not after previous bar ({})", bars[i - 1].date),
                ));
            }
        }

        debug!(
            symbol = %symbol,
            bars = bars.len(),
            first = %bars[0].date,
            last = %bars[bars.len() - 1].date,
            "bar series ingested"
        );

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Close price of the most recent bar.
    pub fn last_close(&self) -> f64 {
        // Non-empty by construction.
        self.bars[self.bars.len() - 1].close
    }
}
