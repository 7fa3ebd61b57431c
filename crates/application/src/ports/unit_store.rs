use async_trait::async_trait;
use tally_dns_domain::{DomainError, UnitCounters, UnitId};

/// Persistence contract for per-unit aggregate records.
///
/// A single writer (the aggregator's flush path) may run concurrently with
/// any number of readers; implementations are not required to support
/// concurrent writers.
#[async_trait]
pub trait UnitStore: Send + Sync {
    async fn load(&self, id: UnitId) -> Result<Option<UnitCounters>, DomainError>;

    /// Loads `from..=to` ordered by id. Missing ids are simply absent.
    async fn load_range(
        &self,
        from: UnitId,
        to: UnitId,
    ) -> Result<Vec<(UnitId, UnitCounters)>, DomainError>;

    /// Upserts the record for `id`.
    async fn store(&self, id: UnitId, counters: &UnitCounters) -> Result<(), DomainError>;

    /// Deletes every record with an id below `cutoff`, returning how many
    /// were removed.
    async fn delete_before(&self, cutoff: UnitId) -> Result<u64, DomainError>;

    async fn close(&self);
}
