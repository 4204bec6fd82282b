//! Background jobs
//!
//! Periodic jobs run on tokio intervals. At most `max_workers` job runs
//! execute at once, and a job whose previous run is still going skips
//! its tick instead of piling up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use pmg_core::config::TasksConfig;

use crate::db::{DbError, SavedSearchRepo, SearchQuery, SearchRepo};
use crate::models::{ContentType, SearchTerm};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Db(#[from] DbError),
}

/// A periodic job
#[async_trait]
pub trait Job: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Time between runs; the first run happens one interval after start.
    fn interval(&self) -> Duration;

    async fn run(&self) -> Result<(), TaskError>;
}

pub struct Scheduler {
    jobs: Vec<Arc<dyn Job>>,
    permits: Arc<Semaphore>,
}

impl Scheduler {
    pub fn new(max_workers: usize) -> Self {
        Self {
            jobs: Vec::new(),
            permits: Arc::new(Semaphore::new(max_workers.max(1))),
        }
    }

    pub fn with_job(mut self, job: impl Job) -> Self {
        self.jobs.push(Arc::new(job));
        self
    }

    /// Spawn one driver task per job.
    pub fn start(self) -> SchedulerHandle {
        let handles = self
            .jobs
            .into_iter()
            .map(|job| {
                tracing::info!(job = job.name(), interval = ?job.interval(), "Scheduling job");
                tokio::spawn(drive(job, Arc::clone(&self.permits)))
            })
            .collect();

        SchedulerHandle { handles }
    }
}

/// Keeps the job drivers alive; dropping it does not stop them.
pub struct SchedulerHandle {
    handles: Vec<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn job_count(&self) -> usize {
        self.handles.len()
    }

    pub fn shutdown(self) {
        for handle in self.handles {
            handle.abort();
        }
    }
}

async fn drive(job: Arc<dyn Job>, permits: Arc<Semaphore>) {
    let running = Arc::new(AtomicBool::new(false));
    let mut ticker = tokio::time::interval(job.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        if running.load(Ordering::Acquire) {
            tracing::warn!(job = job.name(), "Previous run still in progress, skipping");
            continue;
        }

        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            return;
        };
        running.store(true, Ordering::Release);

        let job = Arc::clone(&job);
        let running = Arc::clone(&running);
        tokio::spawn(async move {
            let _permit = permit;
            tracing::debug!(job = job.name(), "Job started");
            if let Err(e) = job.run().await {
                tracing::error!(job = job.name(), error = %e, "Job failed");
            }
            running.store(false, Ordering::Release);
        });
    }
}

/// Start the built-in jobs, or nothing when periodic tasks are disabled.
///
/// Returns without touching the database; jobs first run one interval
/// after start.
pub fn start_periodic_tasks(pool: PgPool, config: &TasksConfig) -> Option<SchedulerHandle> {
    if !config.run_periodic_tasks {
        tracing::debug!("Periodic tasks disabled");
        return None;
    }

    let alerts = SavedSearchAlerts::new(pool, Duration::from_secs(config.saved_search_interval_secs));
    Some(Scheduler::new(config.max_workers).with_job(alerts).start())
}

/// Checks every saved search for content newer than its last alert.
pub struct SavedSearchAlerts {
    pool: PgPool,
    interval: Duration,
}

impl SavedSearchAlerts {
    pub fn new(pool: PgPool, interval: Duration) -> Self {
        Self { pool, interval }
    }
}

#[async_trait]
impl Job for SavedSearchAlerts {
    fn name(&self) -> &'static str {
        "saved_search_alerts"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> Result<(), TaskError> {
        let saved = SavedSearchRepo::new(&self.pool).list_all().await?;
        let now = Utc::now();
        let mut alerted = 0;

        for search in &saved {
            let Ok(term) = SearchTerm::new(&search.search) else {
                tracing::warn!(saved_search = search.id, "Skipping saved search with empty phrase");
                continue;
            };
            let content_type = match search.content_type.as_deref().filter(|t| !t.is_empty()) {
                Some(t) => match t.parse::<ContentType>() {
                    Ok(t) => Some(t),
                    Err(e) => {
                        tracing::warn!(saved_search = search.id, error = %e, "Skipping saved search");
                        continue;
                    }
                },
                None => None,
            };

            let mut query = SearchQuery::new(term);
            query.content_type = content_type;
            query.committee_id = search.committee_id;
            // Content dated in the future is counted once its date has passed
            query.newer_than = Some(search.last_alerted_at);
            query.not_after = Some(now);
            query.limit = 1;

            let hits = SearchRepo::new(&self.pool).search(&query).await?;
            if hits.total > 0 {
                tracing::info!(
                    saved_search = search.id,
                    user_id = search.user_id,
                    new_results = hits.total,
                    "Saved search has new results"
                );
                SavedSearchRepo::new(&self.pool).mark_alerted(search.id, now).await?;
                alerted += 1;
            }
        }

        tracing::info!(checked = saved.len(), alerted, "Saved search sweep complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counting {
        interval: Duration,
        work: Duration,
        runs: Arc<AtomicUsize>,
        active: Arc<AtomicUsize>,
        max_active: Arc<AtomicUsize>,
    }

    impl Counting {
        fn new(interval: u64, work: u64) -> Self {
            Self {
                interval: Duration::from_secs(interval),
                work: Duration::from_secs(work),
                runs: Arc::new(AtomicUsize::new(0)),
                active: Arc::new(AtomicUsize::new(0)),
                max_active: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn sharing(&self, interval: u64, work: u64) -> Self {
            Self {
                interval: Duration::from_secs(interval),
                work: Duration::from_secs(work),
                runs: Arc::clone(&self.runs),
                active: Arc::clone(&self.active),
                max_active: Arc::clone(&self.max_active),
            }
        }
    }

    #[async_trait]
    impl Job for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn interval(&self) -> Duration {
            self.interval
        }

        async fn run(&self) -> Result<(), TaskError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.work).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn disabled_tasks_start_nothing() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/pmg_test")
            .unwrap();
        assert!(start_periodic_tasks(pool, &TasksConfig::default()).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_interval() {
        let job = Counting::new(60, 0);
        let runs = Arc::clone(&job.runs);

        let handle = Scheduler::new(2).with_job(job).start();
        assert_eq!(handle.job_count(), 1);

        tokio::time::sleep(Duration::from_secs(185)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_runs_skip_overlapping_ticks() {
        let job = Counting::new(10, 25);
        let runs = Arc::clone(&job.runs);

        let handle = Scheduler::new(2).with_job(job).start();

        // Starts at 10s, 40s and 70s
        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        handle.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn worker_limit_bounds_concurrency() {
        let first = Counting::new(10, 15);
        let second = first.sharing(10, 15);
        let max_active = Arc::clone(&first.max_active);
        let runs = Arc::clone(&first.runs);

        let handle = Scheduler::new(1).with_job(first).with_job(second).start();

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(runs.load(Ordering::SeqCst) >= 2);
        assert_eq!(max_active.load(Ordering::SeqCst), 1);

        handle.shutdown();
    }
}
