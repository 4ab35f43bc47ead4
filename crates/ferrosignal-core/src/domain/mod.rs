//! # Domain Models
//!
//! Canonical domain types for ferrosignal.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PriceBar`] | OHLCV bar with timestamp |
//! | [`BarSeries`] | Time-ordered bars for a symbol/interval |
//! | [`RawBar`] | Provider row with possibly missing fields |
//! | [`Symbol`] | Validated ticker |
//! | [`Interval`] | Bar period (1m .. 1wk) |
//! | [`LookbackPeriod`] | History window (60d, 6mo, 1y, max) |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! All types validate their invariants at construction time.

mod bar;
mod interval;
mod period;
mod symbol;
mod timestamp;

pub use bar::{BarSeries, PriceBar, RawBar, RawDropStats};
pub use interval::Interval;
pub use period::LookbackPeriod;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
