pub mod stats_aggregator;
pub mod stats_rollup;

pub use stats_aggregator::{RolloverOutcome, StatsAggregator};
