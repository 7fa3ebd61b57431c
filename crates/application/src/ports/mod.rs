mod client_filter;
mod unit_clock;
mod unit_store;

pub use client_filter::{count_all_clients, ClientFilter};
pub use unit_clock::{wall_clock_hours, UnitIdSource};
pub use unit_store::UnitStore;

// Re-export for convenience
pub use tally_dns_domain::{UnitCounters, UnitId};
