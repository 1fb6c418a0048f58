//! Client-side view of the PhoneLock device session.
//!
//! [`SessionSynchronizer`] polls the device on a fixed interval while it is
//! active, publishes the result as a [`SyncState`] snapshot, and runs the
//! start/stop actions with an immediate re-poll so callers see the new state
//! without waiting for the next tick.

mod state;
mod synchronizer;

#[cfg(test)]
mod testing;

use std::time::Duration;

use phonelock_sdk::ClientError;
use thiserror::Error;

pub use state::{ConnectionState, SyncState};
pub use synchronizer::{Activation, PollOutcome, SessionSynchronizer};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("session synchronizer is already active")]
    AlreadyActive,
    #[error("session polling needs a running Tokio runtime")]
    NoRuntime,
    #[error("Please choose or enter a duration greater than 0 minutes.")]
    InvalidDuration,
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type SyncResult<T> = Result<T, SyncError>;
