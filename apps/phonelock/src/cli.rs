use clap::{Args, Parser, Subcommand};
use phonelock_sdk::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use phonelock_sync::DEFAULT_POLL_INTERVAL;
use std::path::PathBuf;

use crate::render::Preset;
use crate::telemetry::logging::{LogConfig, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "phonelock",
    about = "🔒 Start, stop and watch PhoneLock sessions on the Raspberry Pi",
    author,
    version
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "PHONELOCK_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Base URL of the Pi HTTP server"
    )]
    pub base_url: String,

    #[arg(
        long,
        global = true,
        env = "PHONELOCK_POLL_INTERVAL_MS",
        default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64,
        help = "How often to poll /session/status while watching"
    )]
    pub poll_interval_ms: u64,

    #[arg(
        long,
        global = true,
        env = "PHONELOCK_FETCH_TIMEOUT_MS",
        default_value_t = DEFAULT_TIMEOUT.as_millis() as u64,
        help = "Per-request timeout"
    )]
    pub timeout_ms: u64,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    #[arg(
        long = "log-level",
        global = true,
        value_enum,
        env = "PHONELOCK_LOG_LEVEL",
        default_value_t = LogLevel::Warn,
        help = "Minimum log level (error, warn, info, debug, trace)"
    )]
    pub level: LogLevel,

    #[arg(
        long = "log-file",
        global = true,
        value_name = "PATH",
        env = "PHONELOCK_LOG_FILE",
        help = "Write logs to the specified file instead of stderr"
    )]
    pub file: Option<PathBuf>,
}

impl LoggingArgs {
    pub fn to_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            file: self.file.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the current lock state once
    Status,
    /// Lock the phone for a number of minutes
    Start(StartArgs),
    /// Unlock the phone before the timer runs out
    Stop(StopArgs),
    /// Keep polling and redraw the lock state until Ctrl-C (default)
    Watch,
    /// Show the effective configuration and the device API
    Info,
}

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    #[arg(
        long,
        short = 'm',
        conflicts_with = "preset",
        value_parser = clap::value_parser!(u32).range(0..=999),
        help = "Custom duration in minutes"
    )]
    pub minutes: Option<u32>,

    #[arg(long, short = 'p', value_enum, help = "Preset duration in minutes")]
    pub preset: Option<Preset>,
}

impl StartArgs {
    /// Custom minutes win, then the preset, then the 25 minute default.
    pub fn minutes(&self) -> u32 {
        self.minutes
            .or_else(|| self.preset.map(Preset::minutes))
            .unwrap_or_else(|| Preset::Short.minutes())
    }
}

#[derive(Args, Debug, Clone)]
pub struct StopArgs {
    #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
    pub yes: bool,
}
