//! Price source adapters.

mod synthetic;
mod yahoo;

pub use synthetic::{SyntheticSource, SyntheticTrend};
pub use yahoo::YahooChartSource;
