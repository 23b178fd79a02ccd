//! Configuration assembly and validation.

use crate::config::PostgresConfig;
use crate::error::ConfigError;
use crate::options::DatastoreOption;

/// Builds a [`PostgresConfig`] from defaults plus `options`, applied in order.
///
/// Later options overwrite earlier ones on the same field. The assembled
/// configuration is validated once: the revision fuzzing timedelta must be
/// strictly less than the GC window.
pub fn generate_config<I>(options: I) -> Result<PostgresConfig, ConfigError>
where
    I: IntoIterator<Item = DatastoreOption>,
{
    let mut computed = PostgresConfig::default();
    for option in options {
        option.apply(&mut computed);
    }

    validate(&computed)?;
    Ok(computed)
}

fn validate(config: &PostgresConfig) -> Result<(), ConfigError> {
    if config.revision_fuzzing_timedelta >= config.gc_window {
        return Err(ConfigError::InvalidConfiguration {
            fuzzing: config.revision_fuzzing_timedelta,
            gc_window: config.gc_window,
        });
    }
    Ok(())
}

/// Chained form of [`generate_config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    options: Vec<DatastoreOption>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option; it overrides any earlier option on the same field.
    pub fn with(mut self, option: DatastoreOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn extend<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = DatastoreOption>,
    {
        self.options.extend(options);
        self
    }

    pub fn options(&self) -> &[DatastoreOption] {
        &self.options
    }

    pub fn build(self) -> Result<PostgresConfig, ConfigError> {
        generate_config(self.options)
    }
}
