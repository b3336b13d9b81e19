//! Trial scoring and outcome aggregation.

pub mod aggregator;
pub mod scorer;

pub use aggregator::*;
pub use scorer::*;
