//! Background job scheduler and job implementations.

mod pool_metrics;
mod reminders;
mod scheduler;

pub use pool_metrics::PoolMetricsJob;
pub use reminders::ReminderDispatchJob;
pub use scheduler::JobScheduler;
