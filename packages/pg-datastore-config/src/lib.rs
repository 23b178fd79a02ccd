//! Configuration for the Postgres datastore driver.
//!
//! A driver is configured from an ordered list of [`DatastoreOption`]s.
//! [`generate_config`] starts from the documented defaults, applies every
//! option in order (last write wins per field) and validates the result
//! once before handing back an immutable [`PostgresConfig`].

pub mod builder;
pub mod config;
pub mod duration;
pub mod error;
pub mod options;
pub mod settings;
pub mod tracing_logger;
pub mod units;

pub use builder::{generate_config, ConfigBuilder};
pub use config::{
    PostgresConfig, DEFAULT_GC_WINDOW, DEFAULT_SPLIT_AT_ESTIMATED_QUERY_SIZE,
    DEFAULT_WATCH_BUFFER_LENGTH,
};
pub use error::ConfigError;
pub use options::{ConfigField, DatastoreOption};
pub use settings::{DatastoreSettings, SettingsError};
pub use tracing_logger::{DriverLogLevel, TracingLogger};
pub use units::Base2Bytes;
