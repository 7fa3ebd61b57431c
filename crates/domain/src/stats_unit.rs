use crate::query_event::FilterResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier of one aggregation unit (one hour by default). Monotonically
/// non-decreasing across the process lifetime; supplied by the injected
/// unit-id source.
pub type UnitId = u32;

/// Aggregate counters for one time unit.
///
/// Invariant: `total >= by_result[1..].sum()`. The `NotFiltered` slot is
/// never incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCounters {
    pub total: u64,
    pub by_result: [u64; FilterResult::COUNT],
    pub elapsed_sum_micros: u64,
}

impl UnitCounters {
    pub fn record(&mut self, result: FilterResult, elapsed: Duration) {
        self.total += 1;
        if result != FilterResult::NotFiltered {
            self.by_result[result.index()] += 1;
        }
        self.elapsed_sum_micros += elapsed.as_micros() as u64;
    }

    pub fn result_count(&self, result: FilterResult) -> u64 {
        self.by_result[result.index()]
    }
}
