//! Settings file and environment layer.
//!
//! Operators describe the datastore options in a TOML file whose keys match
//! the [`PostgresConfig`](crate::PostgresConfig) field names, and may
//! override any of them with `PG_DATASTORE_<FIELD>` environment variables.
//! The layer only produces [`DatastoreOption`]s; defaults and validation
//! stay with [`generate_config`](crate::generate_config).

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::duration::humantime_serde;
use crate::options::{self, DatastoreOption};
use crate::units::Base2Bytes;

/// Prefix of the environment variables read by
/// [`DatastoreSettings::apply_env_overrides`].
pub const ENV_PREFIX: &str = "PG_DATASTORE_";

/// Settings loading errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML or has unknown keys
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value could not be parsed for its field
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Partially specified datastore options, as read from a file or the
/// environment. Absent fields produce no option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatastoreSettings {
    #[serde(default, with = "humantime_serde::option")]
    pub conn_max_idle_time: Option<Duration>,
    #[serde(default, with = "humantime_serde::option")]
    pub conn_max_lifetime: Option<Duration>,
    #[serde(default, with = "humantime_serde::option")]
    pub health_check_period: Option<Duration>,
    pub max_open_conns: Option<i32>,
    pub min_open_conns: Option<i32>,
    pub watch_buffer_length: Option<u16>,
    #[serde(default, with = "humantime_serde::option")]
    pub revision_fuzzing_timedelta: Option<Duration>,
    #[serde(default, with = "humantime_serde::option")]
    pub gc_window: Option<Duration>,
    pub split_at_estimated_query_size: Option<Base2Bytes>,
    pub enable_prometheus_stats: Option<bool>,
    pub enable_tracing: Option<bool>,
}

impl DatastoreSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Applies `PG_DATASTORE_*` environment variable overrides.
    /// Example: `PG_DATASTORE_GC_WINDOW=1h` overrides `gc_window`.
    pub fn apply_env_overrides(&mut self) -> Result<(), SettingsError> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name such as
    /// `PG_DATASTORE_MAX_OPEN_CONNS` to its value.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = read_override(&lookup, "conn_max_idle_time", humantime::parse_duration)? {
            self.conn_max_idle_time = Some(v);
        }
        if let Some(v) = read_override(&lookup, "conn_max_lifetime", humantime::parse_duration)? {
            self.conn_max_lifetime = Some(v);
        }
        if let Some(v) = read_override(&lookup, "health_check_period", humantime::parse_duration)? {
            self.health_check_period = Some(v);
        }
        if let Some(v) = read_override(&lookup, "max_open_conns", str::parse::<i32>)? {
            self.max_open_conns = Some(v);
        }
        if let Some(v) = read_override(&lookup, "min_open_conns", str::parse::<i32>)? {
            self.min_open_conns = Some(v);
        }
        if let Some(v) = read_override(&lookup, "watch_buffer_length", str::parse::<u16>)? {
            self.watch_buffer_length = Some(v);
        }
        if let Some(v) = read_override(
            &lookup,
            "revision_fuzzing_timedelta",
            humantime::parse_duration,
        )? {
            self.revision_fuzzing_timedelta = Some(v);
        }
        if let Some(v) = read_override(&lookup, "gc_window", humantime::parse_duration)? {
            self.gc_window = Some(v);
        }
        if let Some(v) = read_override(
            &lookup,
            "split_at_estimated_query_size",
            Base2Bytes::from_str,
        )? {
            self.split_at_estimated_query_size = Some(v);
        }
        if let Some(v) = read_override(&lookup, "enable_prometheus_stats", str::parse::<bool>)? {
            self.enable_prometheus_stats = Some(v);
        }
        if let Some(v) = read_override(&lookup, "enable_tracing", str::parse::<bool>)? {
            self.enable_tracing = Some(v);
        }
        Ok(())
    }

    /// Converts the present fields into options, in field order.
    ///
    /// Flags set to `false` produce nothing: the defaults already leave
    /// metrics and tracing off.
    pub fn to_options(&self) -> Vec<DatastoreOption> {
        let mut opts = Vec::new();
        if let Some(size) = self.split_at_estimated_query_size {
            opts.push(options::split_at_estimated_query_size(size));
        }
        if let Some(idle) = self.conn_max_idle_time {
            opts.push(options::conn_max_idle_time(idle));
        }
        if let Some(lifetime) = self.conn_max_lifetime {
            opts.push(options::conn_max_lifetime(lifetime));
        }
        if let Some(period) = self.health_check_period {
            opts.push(options::health_check_period(period));
        }
        if let Some(conns) = self.max_open_conns {
            opts.push(options::max_open_conns(conns));
        }
        if let Some(conns) = self.min_open_conns {
            opts.push(options::min_open_conns(conns));
        }
        if let Some(len) = self.watch_buffer_length {
            opts.push(options::watch_buffer_length(len));
        }
        if let Some(delta) = self.revision_fuzzing_timedelta {
            opts.push(options::revision_fuzzing_timedelta(delta));
        }
        if let Some(window) = self.gc_window {
            opts.push(options::gc_window(window));
        }
        if self.enable_prometheus_stats == Some(true) {
            opts.push(options::enable_prometheus_stats());
        }
        if self.enable_tracing == Some(true) {
            opts.push(options::enable_tracing());
        }
        opts
    }
}

/// Environment variable name for a settings field.
pub fn env_key(field: &str) -> String {
    format!("{}{}", ENV_PREFIX, field.to_ascii_uppercase())
}

fn read_override<T, E, L, P>(lookup: &L, field: &str, parse: P) -> Result<Option<T>, SettingsError>
where
    L: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, E>,
    E: Display,
{
    let key = env_key(field);
    let Some(value) = lookup(&key) else {
        return Ok(None);
    };

    let parsed = parse(value.trim()).map_err(|e| SettingsError::InvalidValue {
        key: key.clone(),
        value: value.clone(),
        reason: e.to_string(),
    })?;
    tracing::debug!("Overriding {} from {}={}", field, key, value);
    Ok(Some(parsed))
}
