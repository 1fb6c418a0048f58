//! Scripted stand-in for the device API.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use phonelock_sdk::{ClientError, SessionApi, SessionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Start(u32),
    Status,
    Stop,
}

struct Reply<T> {
    delay: Duration,
    result: Result<T, ClientError>,
}

/// Replies are consumed in call order; an empty script answers with an
/// unlocked status or a plain success.
#[derive(Default)]
pub(crate) struct ScriptedApi {
    statuses: Mutex<VecDeque<Reply<SessionStatus>>>,
    starts: Mutex<VecDeque<Reply<()>>>,
    stops: Mutex<VecDeque<Reply<()>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    pub(crate) fn push_status(&self, result: Result<SessionStatus, ClientError>) {
        self.push_status_after(Duration::ZERO, result);
    }

    pub(crate) fn push_status_after(
        &self,
        delay: Duration,
        result: Result<SessionStatus, ClientError>,
    ) {
        self.statuses
            .lock()
            .unwrap()
            .push_back(Reply { delay, result });
    }

    pub(crate) fn push_start(&self, result: Result<(), ClientError>) {
        self.push_start_after(Duration::ZERO, result);
    }

    pub(crate) fn push_start_after(&self, delay: Duration, result: Result<(), ClientError>) {
        self.starts.lock().unwrap().push_back(Reply { delay, result });
    }

    pub(crate) fn push_stop(&self, result: Result<(), ClientError>) {
        self.stops.lock().unwrap().push_back(Reply {
            delay: Duration::ZERO,
            result,
        });
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn answer<T>(reply: Option<Reply<T>>, fallback: T) -> Result<T, ClientError> {
    match reply {
        Some(Reply { delay, result }) => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
        None => Ok(fallback),
    }
}

#[async_trait]
impl SessionApi for ScriptedApi {
    async fn start_session(&self, minutes: u32) -> Result<(), ClientError> {
        self.record(Call::Start(minutes));
        let reply = self.starts.lock().unwrap().pop_front();
        answer(reply, ()).await
    }

    async fn get_session_status(&self) -> Result<SessionStatus, ClientError> {
        self.record(Call::Status);
        let reply = self.statuses.lock().unwrap().pop_front();
        answer(reply, SessionStatus::default()).await
    }

    async fn stop_session(&self) -> Result<(), ClientError> {
        self.record(Call::Stop);
        let reply = self.stops.lock().unwrap().pop_front();
        answer(reply, ()).await
    }
}
