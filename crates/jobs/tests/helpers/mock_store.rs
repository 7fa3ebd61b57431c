use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tally_dns_application::ports::UnitStore;
use tally_dns_domain::{DomainError, UnitCounters, UnitId};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockUnitStore {
    units: Arc<RwLock<BTreeMap<UnitId, UnitCounters>>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl MockUnitStore {
    pub fn new() -> Self {
        Self {
            units: Arc::new(RwLock::new(BTreeMap::new())),
            fail_writes: Arc::new(RwLock::new(false)),
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

    pub async fn stored(&self, id: UnitId) -> Option<UnitCounters> {
        self.units.read().await.get(&id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.units.read().await.len()
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
        Ok(self.units.read().await.get(&id).cloned())
    }

    async fn load_range(
        &self,
        from: UnitId,
        to: UnitId,
    ) -> Result<Vec<(UnitId, UnitCounters)>, DomainError> {
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
        let mut map = self.units.write().await;
        let before = map.len();
        map.retain(|id, _| *id >= cutoff);
        Ok((before - map.len()) as u64)
    }

    async fn close(&self) {}
}
