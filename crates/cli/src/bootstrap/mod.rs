use dns_relay_domain::{CliOverrides, Config};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)?;
    Ok(config)
}

/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_logging(config: &Config) {
    let directive = config.logging.filter_directive();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(level = %directive, "Logging initialized");
}
