//! Postgres datastore configuration.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::duration::go_duration_serde;
use crate::tracing_logger::TracingLogger;
use crate::units::Base2Bytes;

/// Default capacity of the watch buffer, in entries.
pub const DEFAULT_WATCH_BUFFER_LENGTH: u16 = 128;

/// Default maximum age of a revision that is still considered valid.
pub const DEFAULT_GC_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Default estimated query size above which a query is split.
pub const DEFAULT_SPLIT_AT_ESTIMATED_QUERY_SIZE: Base2Bytes = Base2Bytes::mib(8);

/// Validated configuration handed to the Postgres datastore driver.
///
/// Produced by [`generate_config`](crate::generate_config). Fields are only
/// readable once built; options mutate them during assembly and cannot be
/// applied to a finished value:
///
/// ```compile_fail
/// use std::time::Duration;
/// use pg_datastore_config::{generate_config, options};
///
/// let mut config = generate_config(Vec::new()).unwrap();
/// options::gc_window(Duration::ZERO).apply(&mut config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostgresConfig {
    /// Idle connections older than this are closed (None = no maximum)
    #[serde(serialize_with = "go_duration_serde::option::serialize")]
    pub(crate) conn_max_idle_time: Option<Duration>,
    /// Connections older than this are closed (None = no maximum)
    #[serde(serialize_with = "go_duration_serde::option::serialize")]
    pub(crate) conn_max_lifetime: Option<Duration>,
    /// Health check interval (None = health check disabled)
    #[serde(serialize_with = "go_duration_serde::option::serialize")]
    pub(crate) health_check_period: Option<Duration>,
    /// Pool size ceiling (None = no maximum)
    pub(crate) max_open_conns: Option<i32>,
    /// Pool size floor (None = zero)
    pub(crate) min_open_conns: Option<i32>,
    /// Watch buffer capacity in entries
    pub(crate) watch_buffer_length: u16,
    /// Bucket width advertised revisions are rounded to
    #[serde(serialize_with = "go_duration_serde::serialize")]
    pub(crate) revision_fuzzing_timedelta: Duration,
    /// Maximum age of a revision still considered valid
    #[serde(serialize_with = "go_duration_serde::serialize")]
    pub(crate) gc_window: Duration,
    /// Query size threshold for splitting
    pub(crate) split_at_estimated_query_size: Base2Bytes,
    /// Prometheus instrumentation of the driver's clients
    pub(crate) enable_prometheus_stats: bool,
    /// Trace-level driver logging, installed by `enable_tracing`
    #[serde(rename = "enable_tracing", serialize_with = "serialize_present")]
    pub(crate) logger: Option<TracingLogger>,
}

fn serialize_present<S>(logger: &Option<TracingLogger>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_bool(logger.is_some())
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            conn_max_idle_time: None,
            conn_max_lifetime: None,
            health_check_period: None,
            max_open_conns: None,
            min_open_conns: None,
            watch_buffer_length: DEFAULT_WATCH_BUFFER_LENGTH,
            revision_fuzzing_timedelta: Duration::ZERO,
            gc_window: DEFAULT_GC_WINDOW,
            split_at_estimated_query_size: DEFAULT_SPLIT_AT_ESTIMATED_QUERY_SIZE,
            enable_prometheus_stats: false,
            logger: None,
        }
    }
}

impl PostgresConfig {
    pub fn conn_max_idle_time(&self) -> Option<Duration> {
        self.conn_max_idle_time
    }

    pub fn conn_max_lifetime(&self) -> Option<Duration> {
        self.conn_max_lifetime
    }

    pub fn health_check_period(&self) -> Option<Duration> {
        self.health_check_period
    }

    pub fn max_open_conns(&self) -> Option<i32> {
        self.max_open_conns
    }

    pub fn min_open_conns(&self) -> Option<i32> {
        self.min_open_conns
    }

    pub fn watch_buffer_length(&self) -> u16 {
        self.watch_buffer_length
    }

    pub fn revision_fuzzing_timedelta(&self) -> Duration {
        self.revision_fuzzing_timedelta
    }

    pub fn gc_window(&self) -> Duration {
        self.gc_window
    }

    pub fn split_at_estimated_query_size(&self) -> Base2Bytes {
        self.split_at_estimated_query_size
    }

    pub fn enable_prometheus_stats(&self) -> bool {
        self.enable_prometheus_stats
    }

    /// Logger for the driver's query log, present when tracing is enabled.
    pub fn logger(&self) -> Option<&TracingLogger> {
        self.logger.as_ref()
    }

    pub fn tracing_enabled(&self) -> bool {
        self.logger.is_some()
    }
}
