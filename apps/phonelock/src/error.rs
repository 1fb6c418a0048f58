use phonelock_sync::SyncError;
use std::io;
use thiserror::Error;

use crate::telemetry::logging::InitError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Sync(#[from] SyncError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("logging initialization failed: {0}")]
    Logging(#[from] InitError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("device unreachable: {0}")]
    Unreachable(String),
    #[error("session state channel closed")]
    StateClosed,
}
