//! Tally DNS Domain Layer
pub mod config;
pub mod errors;
pub mod query_event;
pub mod stats_report;
pub mod stats_unit;

pub use config::StatsConfig;
pub use errors::DomainError;
pub use query_event::{FilterResult, QueryEvent};
pub use stats_report::{StatsReport, TimeUnits};
pub use stats_unit::{UnitCounters, UnitId};
