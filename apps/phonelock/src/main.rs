use std::io::{self, Write};

use clap::Parser;
use phonelock_cli::cli::{Cli, Command};
use phonelock_cli::commands;
use phonelock_cli::config::AppConfig;
use phonelock_cli::telemetry::logging;
use tracing::info;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let _ = io::stdout().flush();
        eprintln!("❌ {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    logging::init(&cli.logging.to_config())?;
    let config = AppConfig::from_cli(&cli)?;
    info!(
        base_url = %config.client.base_url(),
        poll_interval_ms = config.sync.poll_interval.as_millis() as u64,
        timeout_ms = config.client.timeout().as_millis() as u64,
        "phonelock starting"
    );

    let command = cli.command.unwrap_or(Command::Watch);
    let stdout = io::stdout();
    let stdin = io::stdin();
    let mut out = stdout.lock();
    let mut input = stdin.lock();
    commands::run(command, &config, &mut out, &mut input).await?;
    Ok(())
}
