//! Command-line flags and their mapping onto datastore options.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use pg_datastore_config::duration::GoDuration;
use pg_datastore_config::options::DatastoreOption;
use pg_datastore_config::units::ByteSizeError;
use pg_datastore_config::{Base2Bytes, DatastoreSettings, PostgresConfig, SettingsError};

/// Output format for the effective configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Validates a Postgres datastore configuration before the driver starts.
///
/// Values are layered: settings file, then `PG_DATASTORE_*` environment
/// variables, then the flags below. The last value for a field wins.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ignore PG_DATASTORE_* environment variables
    #[arg(long)]
    pub no_env: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Estimated query size at which queries are split (e.g. 4MiB)
    #[arg(long, value_parser = parse_byte_size)]
    pub split_at_estimated_query_size: Option<Base2Bytes>,

    /// Close idle connections after this long (e.g. 30s)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub conn_max_idle_time: Option<Duration>,

    /// Close connections this long after creation
    #[arg(long, value_parser = humantime::parse_duration)]
    pub conn_max_lifetime: Option<Duration>,

    /// Health check interval for idle pooled connections
    #[arg(long, value_parser = humantime::parse_duration)]
    pub health_check_period: Option<Duration>,

    /// Maximum connection pool size
    #[arg(long, allow_negative_numbers = true)]
    pub max_open_conns: Option<i32>,

    /// Minimum connection pool size
    #[arg(long, allow_negative_numbers = true)]
    pub min_open_conns: Option<i32>,

    /// Watch buffer capacity in entries
    #[arg(long)]
    pub watch_buffer_length: Option<u16>,

    /// Bucket size advertised revisions are rounded to (e.g. 5s)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub revision_fuzzing_timedelta: Option<Duration>,

    /// Maximum age of a revision still considered valid (e.g. 24h)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub gc_window: Option<Duration>,

    /// Enable Prometheus metrics for the datastore's clients
    #[arg(long)]
    pub enable_prometheus_stats: bool,

    /// Enable trace-level logging for the datastore's clients
    #[arg(long)]
    pub enable_tracing: bool,
}

fn parse_byte_size(s: &str) -> Result<Base2Bytes, ByteSizeError> {
    s.parse()
}

impl Args {
    /// Reads the settings file (if any) and applies environment overrides.
    pub fn load_settings(&self) -> Result<DatastoreSettings, SettingsError> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::debug!("Loading datastore settings from {}", path.display());
                DatastoreSettings::from_file(path)?
            }
            None => DatastoreSettings::new(),
        };
        if !self.no_env {
            settings.apply_env_overrides()?;
        }
        Ok(settings)
    }

    /// Options from `settings` followed by the options given as flags.
    pub fn options(&self, settings: &DatastoreSettings) -> Vec<DatastoreOption> {
        let mut opts = settings.to_options();
        opts.extend(self.flag_settings().to_options());
        opts
    }

    /// The flags as a settings overlay; switches left off stay absent.
    fn flag_settings(&self) -> DatastoreSettings {
        DatastoreSettings {
            conn_max_idle_time: self.conn_max_idle_time,
            conn_max_lifetime: self.conn_max_lifetime,
            health_check_period: self.health_check_period,
            max_open_conns: self.max_open_conns,
            min_open_conns: self.min_open_conns,
            watch_buffer_length: self.watch_buffer_length,
            revision_fuzzing_timedelta: self.revision_fuzzing_timedelta,
            gc_window: self.gc_window,
            split_at_estimated_query_size: self.split_at_estimated_query_size,
            enable_prometheus_stats: self.enable_prometheus_stats.then_some(true),
            enable_tracing: self.enable_tracing.then_some(true),
        }
    }
}

fn or_unset<T>(value: Option<T>, render: impl FnOnce(T) -> String, unset: &str) -> String {
    value.map(render).unwrap_or_else(|| unset.to_string())
}

fn duration(d: Duration) -> String {
    GoDuration(d).to_string()
}

/// Human-readable listing of the effective configuration.
pub fn render_text(config: &PostgresConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Postgres datastore configuration:");
    let _ = writeln!(
        out,
        "  Conn max idle time: {}",
        or_unset(config.conn_max_idle_time(), duration, "no maximum")
    );
    let _ = writeln!(
        out,
        "  Conn max lifetime: {}",
        or_unset(config.conn_max_lifetime(), duration, "no maximum")
    );
    let _ = writeln!(
        out,
        "  Health check period: {}",
        or_unset(config.health_check_period(), duration, "disabled")
    );
    let _ = writeln!(
        out,
        "  Max open conns: {}",
        or_unset(config.max_open_conns(), |n| n.to_string(), "no maximum")
    );
    let _ = writeln!(
        out,
        "  Min open conns: {}",
        or_unset(config.min_open_conns(), |n| n.to_string(), "0")
    );
    let _ = writeln!(out, "  Watch buffer length: {}", config.watch_buffer_length());
    let _ = writeln!(
        out,
        "  Revision fuzzing timedelta: {}",
        duration(config.revision_fuzzing_timedelta())
    );
    let _ = writeln!(out, "  GC window: {}", duration(config.gc_window()));
    let _ = writeln!(
        out,
        "  Split at estimated query size: {}",
        config.split_at_estimated_query_size()
    );
    let _ = writeln!(
        out,
        "  Prometheus stats: {}",
        config.enable_prometheus_stats()
    );
    let _ = writeln!(out, "  Tracing: {}", config.tracing_enabled());
    out
}
