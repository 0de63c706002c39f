//! Application services
//!
//! Each service encapsulates a specific domain of functionality.

pub mod chart;

pub use chart::{ChartService, ImportOutcome};
