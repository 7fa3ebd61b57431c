use std::sync::Arc;
use tally_dns_domain::UnitId;

/// Produces the id of the unit the wall clock currently falls into.
/// Injectable so tests can advance time explicitly.
pub type UnitIdSource = Arc<dyn Fn() -> UnitId + Send + Sync>;

const SECONDS_PER_UNIT: i64 = 3600;

/// Default source: whole hours since the Unix epoch.
pub fn wall_clock_hours() -> UnitIdSource {
    Arc::new(|| (chrono::Utc::now().timestamp() / SECONDS_PER_UNIT) as UnitId)
}
