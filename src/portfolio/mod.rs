//! Portfolio aggregation and derived metrics.
//!
//! Everything here is a pure function of data already loaded from storage.
//! "Today" is always an argument, never read from the system clock.

mod cashflow;
mod change_points;
mod metrics;
mod models;
pub mod normalize;
mod summary;
mod valuation;

pub use cashflow::*;
pub use change_points::*;
pub use metrics::*;
pub use models::*;
pub use summary::*;
pub use valuation::*;
