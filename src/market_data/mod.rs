pub mod bar_series;

// Re-export for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar_series::{Bar, BarSeries};
