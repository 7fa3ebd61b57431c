use crate::services::StatsAggregator;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tally_dns_domain::StatsReport;
use tokio::sync::Mutex;

const CACHE_TTL: Duration = Duration::from_secs(10);

struct CachedReport {
    computed_at: Instant,
    limit_hours: u32,
    data: StatsReport,
}

/// Read entry point for the dashboard. Reports are cheap but not free, and
/// dashboards poll aggressively, so recent results are served from a short
/// TTL cache keyed by the requested window.
pub struct GetStatsUseCase {
    aggregator: Arc<StatsAggregator>,
    cache: RwLock<Option<CachedReport>>,
    refresh_lock: Mutex<()>,
}

impl GetStatsUseCase {
    pub fn new(aggregator: Arc<StatsAggregator>) -> Self {
        Self {
            aggregator,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn execute(&self, limit_hours: u32) -> StatsReport {
        {
            let guard = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *guard {
                if cached.limit_hours == limit_hours && cached.computed_at.elapsed() < CACHE_TTL {
                    return cached.data.clone();
                }
            }
        }

        let _lock = self.refresh_lock.lock().await;

        {
            let guard = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *guard {
                if cached.limit_hours == limit_hours && cached.computed_at.elapsed() < CACHE_TTL {
                    return cached.data.clone();
                }
            }
        }

        let data = self.aggregator.report(limit_hours).await;

        {
            let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
            *guard = Some(CachedReport {
                computed_at: Instant::now(),
                limit_hours,
                data: data.clone(),
            });
        }

        data
    }
}
