use std::future::Future;
use std::io::{BufRead, Write};
use std::sync::Arc;

use phonelock_sdk::SessionClient;
use phonelock_sync::{ConnectionState, SessionSynchronizer, SyncError, SyncState};
use tracing::debug;

use crate::cli::{Command, StartArgs, StopArgs};
use crate::config::AppConfig;
use crate::error::CliError;
use crate::render;

pub fn synchronizer(config: &AppConfig) -> SessionSynchronizer {
    let client = SessionClient::new(config.client.clone());
    SessionSynchronizer::new(Arc::new(client), config.sync)
}

/// Runs one subcommand. `watch` stops on Ctrl-C.
pub async fn run(
    command: Command,
    config: &AppConfig,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<(), CliError> {
    let sync = synchronizer(config);
    match command {
        Command::Status => status(&sync, out).await,
        Command::Start(args) => start(&sync, &args, out).await,
        Command::Stop(args) => stop(&sync, &args, out, input).await,
        Command::Watch => {
            watch(&sync, out, async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
        }
        Command::Info => {
            write!(out, "{}", render::info(config))?;
            Ok(())
        }
    }
}

/// Waits for the first poll to resolve, success or not.
async fn first_state(sync: &SessionSynchronizer) -> Result<SyncState, CliError> {
    let mut rx = sync.subscribe();
    let _activation = sync.activate()?;
    let state = rx
        .wait_for(|state| state.connection != ConnectionState::Connecting)
        .await
        .map_err(|_| CliError::StateClosed)?
        .clone();
    Ok(state)
}

pub async fn status(sync: &SessionSynchronizer, out: &mut dyn Write) -> Result<(), CliError> {
    let state = first_state(sync).await?;
    write!(out, "{}", render::card(&state))?;
    match (state.connection, state.error) {
        (ConnectionState::Error, Some(message)) => Err(CliError::Unreachable(message)),
        _ => Ok(()),
    }
}

pub async fn start(
    sync: &SessionSynchronizer,
    args: &StartArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let minutes = args.minutes();
    if minutes == 0 {
        return Err(SyncError::InvalidDuration.into());
    }
    let _activation = sync.activate()?;
    writeln!(out, "Starting {minutes} min session…")?;
    let result = sync.start(minutes).await;
    write!(out, "{}", render::card(&sync.snapshot()))?;
    result.map_err(CliError::from)
}

pub async fn stop(
    sync: &SessionSynchronizer,
    args: &StopArgs,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<(), CliError> {
    if !args.yes && !confirm_stop(out, input)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    let _activation = sync.activate()?;
    let result = sync.stop().await;
    write!(out, "{}", render::card(&sync.snapshot()))?;
    result.map_err(CliError::from)
}

fn confirm_stop(out: &mut dyn Write, input: &mut dyn BufRead) -> Result<bool, CliError> {
    write!(
        out,
        "End session early? This will unlock the device before the timer runs out. [y/N] "
    )?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Redraws the card on every visible change until `shutdown` resolves.
pub async fn watch<F>(
    sync: &SessionSynchronizer,
    out: &mut dyn Write,
    shutdown: F,
) -> Result<(), CliError>
where
    F: Future<Output = ()>,
{
    let mut rx = sync.subscribe();
    let mut activation = sync.activate()?;
    tokio::pin!(shutdown);

    let mut last = render::card(&rx.borrow_and_update());
    writeln!(out, "{last}")?;
    out.flush()?;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    return Err(CliError::StateClosed);
                }
                let card = render::card(&rx.borrow_and_update());
                if card != last {
                    writeln!(out, "{card}")?;
                    out.flush()?;
                    last = card;
                }
            }
        }
    }

    activation.deactivate();
    debug!(target = "phonelock.cli", "watch stopped");
    Ok(())
}
