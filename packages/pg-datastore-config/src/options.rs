//! Options that configure how the Postgres datastore's clients interact with
//! the running database.
//!
//! Each constructor captures one value and returns a [`DatastoreOption`]
//! that overwrites exactly one field of a [`PostgresConfig`] when applied.
//! Options never validate; [`generate_config`](crate::generate_config) checks
//! the assembled configuration once at the end.

use std::fmt;
use std::time::Duration;

use crate::config::PostgresConfig;
use crate::tracing_logger::TracingLogger;
use crate::units::Base2Bytes;

/// A single-field change to a [`PostgresConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatastoreOption {
    SplitAtEstimatedQuerySize(Base2Bytes),
    ConnMaxIdleTime(Duration),
    ConnMaxLifetime(Duration),
    HealthCheckPeriod(Duration),
    MaxOpenConns(i32),
    MinOpenConns(i32),
    WatchBufferLength(u16),
    RevisionFuzzingTimedelta(Duration),
    GcWindow(Duration),
    EnablePrometheusStats,
    EnableTracing,
}

/// Identifies the [`PostgresConfig`] field an option writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigField {
    SplitAtEstimatedQuerySize,
    ConnMaxIdleTime,
    ConnMaxLifetime,
    HealthCheckPeriod,
    MaxOpenConns,
    MinOpenConns,
    WatchBufferLength,
    RevisionFuzzingTimedelta,
    GcWindow,
    EnablePrometheusStats,
    Logger,
}

impl ConfigField {
    /// Field name as it appears in settings files, `PG_DATASTORE_*`
    /// variables (upper-cased) and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::SplitAtEstimatedQuerySize => "split_at_estimated_query_size",
            ConfigField::ConnMaxIdleTime => "conn_max_idle_time",
            ConfigField::ConnMaxLifetime => "conn_max_lifetime",
            ConfigField::HealthCheckPeriod => "health_check_period",
            ConfigField::MaxOpenConns => "max_open_conns",
            ConfigField::MinOpenConns => "min_open_conns",
            ConfigField::WatchBufferLength => "watch_buffer_length",
            ConfigField::RevisionFuzzingTimedelta => "revision_fuzzing_timedelta",
            ConfigField::GcWindow => "gc_window",
            ConfigField::EnablePrometheusStats => "enable_prometheus_stats",
            ConfigField::Logger => "enable_tracing",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DatastoreOption {
    /// Writes this option's value into `config`. Only the builder applies
    /// options, so a built configuration cannot be changed afterwards.
    pub(crate) fn apply(&self, config: &mut PostgresConfig) {
        match *self {
            DatastoreOption::SplitAtEstimatedQuerySize(size) => {
                config.split_at_estimated_query_size = size
            }
            DatastoreOption::ConnMaxIdleTime(idle) => config.conn_max_idle_time = Some(idle),
            DatastoreOption::ConnMaxLifetime(lifetime) => {
                config.conn_max_lifetime = Some(lifetime)
            }
            DatastoreOption::HealthCheckPeriod(period) => {
                config.health_check_period = Some(period)
            }
            DatastoreOption::MaxOpenConns(conns) => config.max_open_conns = Some(conns),
            DatastoreOption::MinOpenConns(conns) => config.min_open_conns = Some(conns),
            DatastoreOption::WatchBufferLength(len) => config.watch_buffer_length = len,
            DatastoreOption::RevisionFuzzingTimedelta(delta) => {
                config.revision_fuzzing_timedelta = delta
            }
            DatastoreOption::GcWindow(window) => config.gc_window = window,
            DatastoreOption::EnablePrometheusStats => config.enable_prometheus_stats = true,
            DatastoreOption::EnableTracing => config.logger = Some(TracingLogger),
        }
    }

    /// The field this option overwrites.
    pub fn field(&self) -> ConfigField {
        match self {
            DatastoreOption::SplitAtEstimatedQuerySize(_) => ConfigField::SplitAtEstimatedQuerySize,
            DatastoreOption::ConnMaxIdleTime(_) => ConfigField::ConnMaxIdleTime,
            DatastoreOption::ConnMaxLifetime(_) => ConfigField::ConnMaxLifetime,
            DatastoreOption::HealthCheckPeriod(_) => ConfigField::HealthCheckPeriod,
            DatastoreOption::MaxOpenConns(_) => ConfigField::MaxOpenConns,
            DatastoreOption::MinOpenConns(_) => ConfigField::MinOpenConns,
            DatastoreOption::WatchBufferLength(_) => ConfigField::WatchBufferLength,
            DatastoreOption::RevisionFuzzingTimedelta(_) => ConfigField::RevisionFuzzingTimedelta,
            DatastoreOption::GcWindow(_) => ConfigField::GcWindow,
            DatastoreOption::EnablePrometheusStats => ConfigField::EnablePrometheusStats,
            DatastoreOption::EnableTracing => ConfigField::Logger,
        }
    }
}

/// Estimated query size at which a query is split into two (or more) queries.
///
/// Defaults to [`DEFAULT_SPLIT_AT_ESTIMATED_QUERY_SIZE`](crate::DEFAULT_SPLIT_AT_ESTIMATED_QUERY_SIZE).
pub fn split_at_estimated_query_size(size: Base2Bytes) -> DatastoreOption {
    DatastoreOption::SplitAtEstimatedQuerySize(size)
}

/// Duration after which an idle connection is closed by the health check.
///
/// Defaults to having no maximum.
pub fn conn_max_idle_time(idle: Duration) -> DatastoreOption {
    DatastoreOption::ConnMaxIdleTime(idle)
}

/// Duration since creation after which a connection is closed.
///
/// Defaults to having no maximum.
pub fn conn_max_lifetime(lifetime: Duration) -> DatastoreOption {
    DatastoreOption::ConnMaxLifetime(lifetime)
}

/// Interval at which idle pooled connections are health checked to keep them
/// alive.
///
/// Defaults to unset, which leaves the health check disabled.
pub fn health_check_period(period: Duration) -> DatastoreOption {
    DatastoreOption::HealthCheckPeriod(period)
}

/// Maximum size of the connection pool.
///
/// Defaults to having no maximum.
pub fn max_open_conns(conns: i32) -> DatastoreOption {
    DatastoreOption::MaxOpenConns(conns)
}

/// Minimum size of the connection pool. The health check opens connections
/// up to this amount if the pool has dropped below it.
///
/// Defaults to zero.
pub fn min_open_conns(conns: i32) -> DatastoreOption {
    DatastoreOption::MinOpenConns(conns)
}

/// Number of entries the watch buffer holds while awaiting read by the client.
///
/// Defaults to 128.
pub fn watch_buffer_length(len: u16) -> DatastoreOption {
    DatastoreOption::WatchBufferLength(len)
}

/// Time bucket size to which advertised revisions are rounded.
///
/// Defaults to zero; deployments conventionally set 5 seconds. The value is
/// not range checked, but [`Duration`] is unsigned so negative deltas cannot
/// be expressed.
pub fn revision_fuzzing_timedelta(delta: Duration) -> DatastoreOption {
    DatastoreOption::RevisionFuzzingTimedelta(delta)
}

/// Maximum age of a passed revision that is still considered valid.
///
/// Defaults to 24 hours. As with [`revision_fuzzing_timedelta`], the window
/// is unsigned; a zero window rejects every fuzzing delta.
pub fn gc_window(window: Duration) -> DatastoreOption {
    DatastoreOption::GcWindow(window)
}

/// Enables Prometheus metrics for the Postgres clients used by the datastore.
///
/// Defaults to disabled.
pub fn enable_prometheus_stats() -> DatastoreOption {
    DatastoreOption::EnablePrometheusStats
}

/// Enables trace-level logging for the Postgres clients used by the
/// datastore by installing a [`TracingLogger`].
///
/// Defaults to no logger.
pub fn enable_tracing() -> DatastoreOption {
    DatastoreOption::EnableTracing
}
