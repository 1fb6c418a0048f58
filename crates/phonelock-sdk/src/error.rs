use thiserror::Error;

/// Failure of a single device request.
///
/// The `Display` text is the message surfaced to the user; callers that need
/// to branch on the failure use [`ClientError::kind`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Request timed out — is the Pi reachable?")]
    Timeout,
    #[error("Network error — check the configured base URL ({0})")]
    Network(String),
    #[error("Server returned {code} {reason}")]
    HttpStatus { code: u16, reason: String },
    #[error("Invalid response from server ({0})")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    Network,
    HttpStatus,
    Parse,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Timeout => ErrorKind::Timeout,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::HttpStatus { .. } => ErrorKind::HttpStatus,
            ClientError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
