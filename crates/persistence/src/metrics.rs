//! Database and import metrics.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! host process installs a recorder.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record connection pool usage.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
}

/// Record the outcome of one import batch.
pub fn record_import_batch(external_source: &str, inserted: usize, failed: usize) {
    let outcome = if failed == 0 { "success" } else { "failure" };
    counter!(
        "job_import_batches_total",
        "source" => external_source.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    counter!(
        "job_import_rows_total",
        "source" => external_source.to_string(),
        "outcome" => "inserted"
    )
    .increment(inserted as u64);
    counter!(
        "job_import_rows_total",
        "source" => external_source.to_string(),
        "outcome" => "failed"
    )
    .increment(failed as u64);
}

/// Times a database operation.
///
/// ```ignore
/// let timer = QueryTimer::new("list_synced_jobs");
/// let result = sqlx::query_as::<_, SyncedJobEntity>(...).fetch_all(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}
