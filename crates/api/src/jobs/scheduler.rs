//! Background job scheduler for recurring maintenance work.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy)]
pub enum JobFrequency {
    /// Run every N seconds.
    Seconds(u64),
    /// Run every N minutes.
    Minutes(u64),
}

impl JobFrequency {
    /// Duration between two executions.
    pub fn duration(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Minutes(mins) => Duration::from_secs(*mins * 60),
        }
    }
}

/// Trait for implementing background jobs.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// The name of this job (used for logging).
    fn name(&self) -> &'static str;

    /// The frequency at which this job should run.
    fn frequency(&self) -> JobFrequency;

    /// Execute the job. Returns Ok(()) on success, Err with message on failure.
    async fn execute(&self) -> Result<(), String>;
}

/// Runs registered jobs on their intervals until shut down.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Register a job with the scheduler.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawn one task per registered job.
    pub fn start(&mut self) {
        info!("Starting job scheduler with {} jobs", self.jobs.len());

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_rx.clone();

            let handle = tokio::spawn(async move {
                let name = job.name();
                let frequency = job.frequency();
                let mut interval = tokio::time::interval(frequency.duration());

                // The first tick fires immediately; skip it so a restart does
                // not double-run every job.
                interval.tick().await;

                info!(job = name, frequency = ?frequency, "Job scheduled");

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let start = std::time::Instant::now();
                            info!(job = name, "Job starting");

                            match job.execute().await {
                                Ok(()) => {
                                    info!(
                                        job = name,
                                        elapsed_ms = start.elapsed().as_millis(),
                                        "Job completed"
                                    );
                                }
                                Err(e) => {
                                    error!(
                                        job = name,
                                        elapsed_ms = start.elapsed().as_millis(),
                                        error = %e,
                                        "Job failed"
                                    );
                                }
                            }
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Signal every job to stop after its current run. Returns immediately.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all job tasks to finish, up to the timeout.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        info!("Waiting for jobs to complete (timeout: {:?})", timeout);

        let shutdown_future = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(timeout, shutdown_future).await {
            Ok(()) => info!("All jobs completed gracefully"),
            Err(_) => warn!("Job shutdown timed out after {:?}", timeout),
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        run_count: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Job for CountingJob {
        fn name(&self) -> &'static str {
            "counting_job"
        }

        fn frequency(&self) -> JobFrequency {
            JobFrequency::Seconds(1)
        }

        async fn execute(&self) -> Result<(), String> {
            self.run_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_job_frequency_duration() {
        assert_eq!(
            JobFrequency::Seconds(30).duration(),
            Duration::from_secs(30)
        );
        assert_eq!(
            JobFrequency::Minutes(5).duration(),
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_scheduler_register() {
        let mut scheduler = JobScheduler::new();
        scheduler.register(CountingJob {
            run_count: Arc::new(AtomicUsize::new(0)),
        });
        assert_eq!(scheduler.jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_first_tick_is_skipped() {
        let mut scheduler = JobScheduler::new();
        let run_count = Arc::new(AtomicUsize::new(0));
        scheduler.register(CountingJob {
            run_count: Arc::clone(&run_count),
        });
        scheduler.start();

        // Well before the first interval elapses nothing must have run.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(run_count.load(Ordering::SeqCst), 0);

        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(2)).await;
    }

    #[tokio::test]
    async fn test_job_executes_on_interval() {
        let mut scheduler = JobScheduler::new();
        let run_count = Arc::new(AtomicUsize::new(0));
        scheduler.register(CountingJob {
            run_count: Arc::clone(&run_count),
        });
        scheduler.start();

        tokio::time::sleep(Duration::from_millis(1500)).await;

        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(2)).await;

        assert!(run_count.load(Ordering::SeqCst) >= 1);
    }
}
