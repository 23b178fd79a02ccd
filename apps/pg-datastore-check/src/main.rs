//! Validates Postgres datastore driver configuration.
//!
//! Layers a settings file, environment overrides and command-line flags into
//! datastore options, assembles them and prints the effective configuration.
//! Exits non-zero when the configuration is rejected.

mod cli;

use anyhow::Context;
use clap::Parser;
use pg_datastore_config::generate_config;
use tracing_subscriber::EnvFilter;

use cli::{Args, OutputFormat};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = args
        .load_settings()
        .context("failed to load datastore settings")?;
    let opts = args.options(&settings);
    tracing::debug!("Assembling datastore config from {} options", opts.len());

    let config = match generate_config(opts) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Datastore configuration rejected: {}", e);
            return Err(e).context("invalid datastore configuration");
        }
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", cli::render_text(&config)),
    }

    Ok(())
}
