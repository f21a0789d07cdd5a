//! Single-symbol equity snapshot: recent daily bars, opening gaps, volatility
//! swings, EMA/RSI, and headlines around each swing.
//!
//! The analytical core is a chain of pure transforms over one normalized
//! [`series::Series`]:
//!
//! - [`series`]: sort, de-duplicate and sanitize provider bars
//! - [`gaps`]: open versus previous close
//! - [`swings`]: close-to-close percentage change and threshold swings
//! - [`indicators`]: EMA and RSI
//! - [`correlation`]: news windows for each swing
//!
//! [`pipeline::SnapshotPipeline`] wires these to the providers in `market_feeds`.

pub mod companies;
pub mod config;
pub mod correlation;
pub mod errors;
pub mod gaps;
pub mod indicators;
pub mod pipeline;
pub mod providers;
pub mod report;
pub mod series;
pub mod swings;
