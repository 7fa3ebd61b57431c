use std::sync::Arc;
use std::time::Duration;
use tally_dns_application::services::StatsAggregator;
use tally_dns_domain::DomainError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const DEFAULT_TICK_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobState {
    Created,
    Started,
    Stopped,
}

/// Background job that periodically rolls the current stats unit over and
/// evicts units past retention. Also owns the engine's shutdown: closing the
/// job flushes whatever is still in memory.
pub struct StatsMaintenanceJob {
    aggregator: Arc<StatsAggregator>,
    tick_interval_secs: u64,
    shutdown: CancellationToken,
    state: Mutex<(JobState, Option<JoinHandle<()>>)>,
}

impl StatsMaintenanceJob {
    pub fn new(aggregator: Arc<StatsAggregator>) -> Self {
        Self {
            aggregator,
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
            state: Mutex::new((JobState::Created, None)),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.tick_interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Launches the periodic rollover/eviction task. Starting twice is a
    /// usage error, as is starting a job that was already closed.
    pub async fn start(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.0 != JobState::Created {
            return Err(DomainError::AlreadyStarted);
        }

        info!(
            interval_secs = self.tick_interval_secs,
            "Starting stats maintenance job"
        );

        let aggregator = Arc::clone(&self.aggregator);
        let shutdown = self.shutdown.clone();
        let interval_secs = self.tick_interval_secs;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("StatsMaintenanceJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let outcome = aggregator.rollover().await;
                        if outcome.pending > 0 {
                            error!(
                                pending = outcome.pending,
                                "Sealed stats units could not be flushed"
                            );
                        } else if outcome.sealed {
                            info!(flushed = outcome.flushed, "Stats unit rolled over");
                        }

                        match aggregator.evict().await {
                            Ok(deleted) if deleted > 0 => {
                                info!(deleted, "Expired stats units evicted");
                            }
                            Ok(_) => {}
                            Err(e) => {
                                error!(error = %e, "Stats eviction failed");
                            }
                        }
                    }
                }
            }
        });

        *state = (JobState::Started, Some(handle));
        Ok(())
    }

    /// Stops the periodic task and runs the final flush. Waits for an
    /// in-flight tick instead of aborting it, so a rollover in progress
    /// completes before the store is released. Closing before `start` is a
    /// usage error; closing twice is a no-op.
    pub async fn close(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        match state.0 {
            JobState::Created => return Err(DomainError::NotStarted),
            JobState::Stopped => return Ok(()),
            JobState::Started => {}
        }
        state.0 = JobState::Stopped;

        self.shutdown.cancel();
        if let Some(handle) = state.1.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Stats maintenance task failed");
            }
        }

        let result = self.aggregator.shutdown().await;
        info!("Stats maintenance job stopped");
        result
    }
}
