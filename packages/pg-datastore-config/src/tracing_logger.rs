//! Trace-level sink for the driver's query log.

use std::fmt;

use serde_json::{Map, Value};
use tracing::Level;

/// Target under which forwarded driver records are emitted.
pub const DRIVER_LOG_TARGET: &str = "pg_datastore::driver";

/// Severity the Postgres client attached to a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DriverLogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    None,
}

impl fmt::Display for DriverLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriverLogLevel::Trace => "trace",
            DriverLogLevel::Debug => "debug",
            DriverLogLevel::Info => "info",
            DriverLogLevel::Warn => "warn",
            DriverLogLevel::Error => "error",
            DriverLogLevel::None => "none",
        };
        f.write_str(s)
    }
}

/// Logger installed by [`enable_tracing`](crate::options::enable_tracing).
///
/// Every record the driver hands over is re-emitted as a `tracing` event at
/// TRACE level regardless of the driver's own severity, which is kept as
/// the `driver_level` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn log(&self, level: DriverLogLevel, message: &str, data: &Map<String, Value>) {
        if !tracing::enabled!(target: DRIVER_LOG_TARGET, Level::TRACE) {
            return;
        }
        let data = serde_json::to_string(data).unwrap_or_default();
        tracing::trace!(
            target: DRIVER_LOG_TARGET,
            driver_level = %level,
            data = %data,
            "{}",
            message
        );
    }
}
