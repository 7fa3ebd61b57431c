use crate::ports::{ClientFilter, UnitIdSource, UnitStore};
use crate::services::stats_rollup::{self, UNITS_PER_DAY};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tally_dns_domain::{DomainError, QueryEvent, StatsReport, UnitCounters, UnitId};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

const SECONDS_PER_UNIT: u64 = 3600;

/// What a rollover pass did; the maintenance job logs these fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolloverOutcome {
    pub sealed: bool,
    pub flushed: usize,
    /// Sealed units still waiting for a successful store write.
    pub pending: usize,
}

struct AggregatorState {
    current_id: UnitId,
    current: UnitCounters,
    /// Sealed units whose store write has not succeeded yet. Normally empty;
    /// entries are retried on every flush pass so no counted query is lost
    /// to a transient store failure.
    deferred: Vec<(UnitId, UnitCounters)>,
    closed: bool,
}

/// Folds query events into the current in-memory unit, rolls units over as
/// the clock advances and evicts units that fell out of retention.
///
/// All mutable state sits behind one mutex. The hot path (`update` without a
/// rollover) does in-memory arithmetic only; store I/O happens on the rare
/// seal and on maintenance ticks.
pub struct StatsAggregator {
    store: Arc<dyn UnitStore>,
    unit_id: UnitIdSource,
    should_count: ClientFilter,
    retention_units: u32,
    state: Mutex<AggregatorState>,
}

impl StatsAggregator {
    /// Opens the aggregator over `store`. If a previous run already flushed
    /// counters for the current unit, they are loaded back so a restart
    /// inside the same hour keeps counting where it left off. Store failures
    /// here are fatal: no partially working engine is handed out.
    pub async fn new(
        store: Arc<dyn UnitStore>,
        retention: Duration,
        unit_id: UnitIdSource,
        should_count: ClientFilter,
    ) -> Result<Self, DomainError> {
        let retention_units = retention_to_units(retention);
        let current_id = (unit_id)();
        let current = store.load(current_id).await?.unwrap_or_default();

        Ok(Self {
            store,
            unit_id,
            should_count,
            retention_units,
            state: Mutex::new(AggregatorState {
                current_id,
                current,
                deferred: Vec::new(),
                closed: false,
            }),
        })
    }

    pub fn retention_units(&self) -> u32 {
        self.retention_units
    }

    /// Counts one resolved query. Never fails: store trouble during a
    /// rollover is logged and retried on the next flush pass.
    pub async fn update(&self, event: &QueryEvent) {
        if !(self.should_count)(&[event.client.as_str()]) {
            return;
        }

        let mut state = self.state.lock().await;
        if state.closed {
            warn!(domain = %event.domain, "Update after close ignored");
            return;
        }

        let id = (self.unit_id)();
        if seal_if_changed(&mut state, id) {
            self.flush_deferred(&mut state).await;
        }
        state.current.record(event.result, event.elapsed);
    }

    /// Seals the current unit if the clock moved on and retries any deferred
    /// writes. Repeated calls at the same unit id do nothing extra.
    pub async fn rollover(&self) -> RolloverOutcome {
        let mut state = self.state.lock().await;
        if state.closed {
            return RolloverOutcome::default();
        }

        let id = (self.unit_id)();
        let sealed = seal_if_changed(&mut state, id);
        let flushed = self.flush_deferred(&mut state).await;

        RolloverOutcome {
            sealed,
            flushed,
            pending: state.deferred.len(),
        }
    }

    /// Deletes stored units older than the retention window.
    pub async fn evict(&self) -> Result<u64, DomainError> {
        let cutoff = {
            let mut state = self.state.lock().await;
            let id = (self.unit_id)();
            let cutoff = id.saturating_sub(self.retention_units - 1);
            state.deferred.retain(|(unit_id, _)| *unit_id >= cutoff);
            cutoff
        };

        self.store.delete_before(cutoff).await
    }

    /// Clones the `count` most recent units, oldest first, with the
    /// in-memory current unit as the newest entry. Missing units are not
    /// synthesized: a short result means the data does not exist yet.
    ///
    /// The lock is held only to snapshot in-memory state; the store range
    /// load runs without it so slow I/O never blocks writers.
    pub async fn load_units(&self, count: u32) -> (Vec<UnitCounters>, UnitId) {
        let (current_id, current, deferred, id) = {
            let state = self.state.lock().await;
            (
                state.current_id,
                state.current.clone(),
                state.deferred.clone(),
                (self.unit_id)(),
            )
        };

        if count == 0 {
            return (Vec::new(), id);
        }
        let from = id.saturating_sub(count - 1);

        let mut units: BTreeMap<UnitId, UnitCounters> = match self.store.load_range(from, id).await
        {
            Ok(rows) => rows.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, "Failed to load stored units, serving in-memory data only");
                BTreeMap::new()
            }
        };

        // In-memory state wins over whatever an earlier flush left behind.
        for (unit_id, counters) in deferred {
            if (from..=id).contains(&unit_id) {
                units.insert(unit_id, counters);
            }
        }
        if (from..=id).contains(&current_id) {
            units.insert(current_id, current);
        }

        (units.into_values().collect(), id)
    }

    /// Builds the dashboard report for the last `limit_hours` hours. Windows
    /// longer than a day are reported per day, shorter ones per hour. Always
    /// returns a well-formed report; with no data yet it is simply empty.
    pub async fn report(&self, limit_hours: u32) -> StatsReport {
        if limit_hours == 0 {
            return StatsReport::default();
        }

        let (units, current_id) = self.load_units(limit_hours).await;
        if units.is_empty() {
            return StatsReport::default();
        }

        if units.len() > UNITS_PER_DAY {
            stats_rollup::daily_report(&units, current_id)
        } else {
            stats_rollup::hourly_report(&units)
        }
    }

    /// Final flush: seals nothing but writes the current unit and anything
    /// still deferred, then releases the store. Later `update` calls become
    /// no-ops. The maintenance job calls this exactly once while closing.
    pub async fn shutdown(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Ok(());
        }
        state.closed = true;

        let current_id = state.current_id;
        let current = std::mem::take(&mut state.current);
        state.deferred.push((current_id, current));

        let mut result = Ok(());
        for (id, counters) in std::mem::take(&mut state.deferred) {
            if let Err(e) = self.store.store(id, &counters).await {
                error!(error = %e, unit_id = id, "Failed to flush unit during shutdown");
                result = Err(e);
            }
        }

        self.store.close().await;
        result
    }

    async fn flush_deferred(&self, state: &mut AggregatorState) -> usize {
        let mut flushed = 0;
        let mut remaining = Vec::new();

        for (id, counters) in std::mem::take(&mut state.deferred) {
            match self.store.store(id, &counters).await {
                Ok(()) => flushed += 1,
                Err(e) => {
                    error!(error = %e, unit_id = id, "Failed to flush sealed unit, will retry");
                    remaining.push((id, counters));
                }
            }
        }

        state.deferred = remaining;
        flushed
    }
}

/// Moves the current unit onto the deferred list when `id` differs from the
/// unit being filled. Empty units are sealed too, keeping the stored hour
/// series contiguous while the engine runs.
fn seal_if_changed(state: &mut AggregatorState, id: UnitId) -> bool {
    if id == state.current_id {
        return false;
    }

    let sealed = std::mem::take(&mut state.current);
    let sealed_id = std::mem::replace(&mut state.current_id, id);
    debug!(unit_id = sealed_id, next_id = id, "Unit sealed for flush");
    state.deferred.push((sealed_id, sealed));
    true
}

fn retention_to_units(retention: Duration) -> u32 {
    retention.as_secs().div_ceil(SECONDS_PER_UNIT).max(1) as u32
}
