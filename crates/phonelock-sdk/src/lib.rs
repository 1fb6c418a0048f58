//! Asynchronous client for the PhoneLock device API.
//!
//! The device (a Raspberry Pi running a small HTTP server) exposes three
//! endpoints under a configured base URL:
//!
//! - `POST /session/start` with `{"minutes": n}` locks the phone and starts a countdown
//! - `GET /session/status` returns `{"locked": bool, "remainingSeconds": n}`
//! - `POST /session/stop` unlocks immediately
//!
//! Every call is bounded by a fixed timeout and failures are folded into a
//! [`ClientError`] whose `Display` output is meant to be shown to the user
//! as-is. No call is retried.

mod client;
mod config;
mod error;
mod status;

pub use client::{SessionApi, SessionClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, ErrorKind};
pub use status::SessionStatus;
