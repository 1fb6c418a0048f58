use phonelock_sdk::SessionStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No poll has resolved yet.
    #[default]
    Connecting,
    Connected,
    Error,
}

/// Snapshot of everything the presentation layer renders.
///
/// `status` keeps the last successful poll even while `connection` is
/// [`ConnectionState::Error`]; once a status has been seen it is never
/// cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub status: Option<SessionStatus>,
    pub connection: ConnectionState,
    pub error: Option<String>,
    pub is_starting: bool,
    pub is_stopping: bool,
}

impl SyncState {
    /// An unknown status counts as unlocked.
    pub fn is_locked(&self) -> bool {
        self.status.map(|status| status.locked).unwrap_or(false)
    }

    pub fn is_busy(&self) -> bool {
        self.is_starting || self.is_stopping
    }
}
