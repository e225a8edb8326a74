//! Database metrics collection.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// Queries slower than this are logged at warn.
const SLOW_QUERY_THRESHOLD: Duration = Duration::from_millis(250);

/// Samples connection pool state into Prometheus gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_total").set(size as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
}

/// Times one database operation for the query duration histogram.
///
/// ```ignore
/// let timer = QueryTimer::new("find_shift_by_id");
/// let result = sqlx::query_as::<_, ShiftEntity>(query).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration, warning on slow queries.
    pub fn record(self) {
        let elapsed = self.start.elapsed();
        histogram!(
            "database_query_duration_seconds",
            "query" => self.query_name
        )
        .record(elapsed.as_secs_f64());

        if elapsed >= SLOW_QUERY_THRESHOLD {
            tracing::warn!(
                query = self.query_name,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow database query"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_records_name() {
        let timer = QueryTimer::new("list_upcoming_shifts");
        assert_eq!(timer.query_name, "list_upcoming_shifts");
    }

    #[test]
    fn test_fresh_timer_is_not_slow() {
        let timer = QueryTimer::new("probe");
        assert!(timer.start.elapsed() < SLOW_QUERY_THRESHOLD);
    }
}
