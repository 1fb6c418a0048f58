use std::time::Duration;

use phonelock_sdk::ClientConfig;
use phonelock_sync::SyncConfig;

use crate::cli::Cli;
use crate::error::CliError;

/// Settings resolved once at startup and never changed afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub sync: SyncConfig,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let base_url = cli.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::InvalidArgument(format!(
                "base url must start with http:// or https:// (got '{base_url}')"
            )));
        }
        if cli.poll_interval_ms == 0 {
            return Err(CliError::InvalidArgument(
                "poll interval must be greater than zero".into(),
            ));
        }
        if cli.timeout_ms == 0 {
            return Err(CliError::InvalidArgument(
                "fetch timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            client: ClientConfig::new(base_url)
                .with_timeout(Duration::from_millis(cli.timeout_ms)),
            sync: SyncConfig {
                poll_interval: Duration::from_millis(cli.poll_interval_ms),
            },
        })
    }
}
