use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tally_dns_application::ports::UnitStore;
use tally_dns_domain::{DomainError, UnitCounters, UnitId};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockUnitStore {
    units: Arc<RwLock<BTreeMap<UnitId, UnitCounters>>>,
    fail_writes: Arc<RwLock<bool>>,
    fail_reads: Arc<RwLock<bool>>,
    range_loads: Arc<AtomicUsize>,
}

impl MockUnitStore {
    pub fn new() -> Self {
        Self {
            units: Arc::new(RwLock::new(BTreeMap::new())),
            fail_writes: Arc::new(RwLock::new(false)),
            fail_reads: Arc::new(RwLock::new(false)),
            range_loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn with_units(units: Vec<(UnitId, UnitCounters)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.units.write().await;
            for (id, counters) in units {
                map.insert(id, counters);
            }
        }
        store
    }

    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    pub async fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().await = fail;
    }

    pub async fn stored(&self, id: UnitId) -> Option<UnitCounters> {
        self.units.read().await.get(&id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.units.read().await.len()
    }

    pub fn range_loads(&self) -> usize {
        self.range_loads.load(Ordering::SeqCst)
    }
}

impl Default for MockUnitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitStore for MockUnitStore {
    async fn load(&self, id: UnitId) -> Result<Option<UnitCounters>, DomainError> {
        if *self.fail_reads.read().await {
            return Err(DomainError::DatabaseError("mock read failure".to_string()));
        }
        Ok(self.units.read().await.get(&id).cloned())
    }

    async fn load_range(
        &self,
        from: UnitId,
        to: UnitId,
    ) -> Result<Vec<(UnitId, UnitCounters)>, DomainError> {
        self.range_loads.fetch_add(1, Ordering::SeqCst);
        if *self.fail_reads.read().await {
            return Err(DomainError::DatabaseError("mock read failure".to_string()));
        }
        Ok(self
            .units
            .read()
            .await
            .range(from..=to)
            .map(|(id, counters)| (*id, counters.clone()))
            .collect())
    }

    async fn store(&self, id: UnitId, counters: &UnitCounters) -> Result<(), DomainError> {
        if *self.fail_writes.read().await {
            return Err(DomainError::DatabaseError("mock write failure".to_string()));
        }
        self.units.write().await.insert(id, counters.clone());
        Ok(())
    }

    async fn delete_before(&self, cutoff: UnitId) -> Result<u64, DomainError> {
        if *self.fail_writes.read().await {
            return Err(DomainError::DatabaseError("mock write failure".to_string()));
        }
        let mut map = self.units.write().await;
        let before = map.len();
        map.retain(|id, _| *id >= cutoff);
        Ok((before - map.len()) as u64)
    }

    async fn close(&self) {}
}
