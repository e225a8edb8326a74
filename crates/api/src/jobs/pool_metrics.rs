//! Background job that samples database pool gauges.

use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};

/// Publishes connection pool usage once a minute.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        persistence::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_job_identity() {
        let pool = PgPool::connect_lazy("postgres://localhost/unused").expect("lazy pool");
        let job = PoolMetricsJob::new(pool);
        assert_eq!(job.name(), "pool_metrics");
        assert!(matches!(job.frequency(), JobFrequency::Minutes(1)));
    }
}
