//! Configuration error types.

use std::time::Duration;

use thiserror::Error;

use crate::duration::GoDuration;

/// Errors raised while assembling a [`PostgresConfig`](crate::PostgresConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Revision fuzzing bucket is not strictly smaller than the GC window
    #[error(
        "revision fuzzing timedelta ({}) must be less than GC window ({})",
        GoDuration::from(.fuzzing),
        GoDuration::from(.gc_window)
    )]
    InvalidConfiguration {
        fuzzing: Duration,
        gc_window: Duration,
    },
}
