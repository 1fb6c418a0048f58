use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use phonelock_sdk::{ClientError, SessionApi};
use tokio::sync::{watch, Mutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{ConnectionState, SyncConfig, SyncError, SyncResult, SyncState};

const INACTIVE: u64 = 0;

/// What happened to the result of one status poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    /// A newer poll had already been applied.
    Superseded,
    /// The synchronizer was deactivated while the request was in flight.
    Discarded,
    /// The synchronizer was not active, so no request was made.
    Inactive,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Start(u32),
    Stop,
}

impl Action {
    fn mark(self, state: &mut SyncState, busy: bool) {
        match self {
            Action::Start(_) => state.is_starting = busy,
            Action::Stop => state.is_stopping = busy,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Action::Start(_) => "start",
            Action::Stop => "stop",
        }
    }
}

/// Owns the polled view of the device session.
///
/// Cloning is cheap; clones share the same state, timer and action queue.
#[derive(Clone)]
pub struct SessionSynchronizer {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn SessionApi>,
    config: SyncConfig,
    state: watch::Sender<SyncState>,
    next_seq: AtomicU64,
    /// Only touched while the state channel is locked for writing.
    applied_seq: AtomicU64,
    next_epoch: AtomicU64,
    /// Epoch of the live activation, or `INACTIVE`.
    active_epoch: AtomicU64,
    actions: Mutex<()>,
}

impl SessionSynchronizer {
    pub fn new(api: Arc<dyn SessionApi>, config: SyncConfig) -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                config,
                state,
                next_seq: AtomicU64::new(0),
                applied_seq: AtomicU64::new(0),
                next_epoch: AtomicU64::new(0),
                active_epoch: AtomicU64::new(INACTIVE),
                actions: Mutex::new(()),
            }),
        }
    }

    pub fn snapshot(&self) -> SyncState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.inner.state.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.inner.active_epoch.load(Ordering::SeqCst) != INACTIVE
    }

    /// Starts polling: one poll right away, then one per interval until the
    /// returned [`Activation`] is deactivated or dropped.
    ///
    /// Fails with [`SyncError::NoRuntime`] outside a Tokio runtime, leaving
    /// the synchronizer inactive.
    pub fn activate(&self) -> SyncResult<Activation> {
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        let epoch = self.inner.next_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner
            .active_epoch
            .compare_exchange(INACTIVE, epoch, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SyncError::AlreadyActive)?;

        let period = self.inner.config.poll_interval;
        let sync = self.clone();
        let timer = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Ticks never wait on a slow poll; each poll runs on its own.
                let sync = sync.clone();
                tokio::spawn(async move {
                    sync.poll_now().await;
                });
            }
        });

        info!(
            target = "phonelock.sync",
            epoch,
            interval_ms = period.as_millis() as u64,
            "session polling activated"
        );
        Ok(Activation {
            inner: Arc::clone(&self.inner),
            epoch,
            timer: Some(timer),
        })
    }

    /// Polls the device once, outside the interval.
    pub async fn poll_now(&self) -> PollOutcome {
        let epoch = self.inner.active_epoch.load(Ordering::SeqCst);
        if epoch == INACTIVE {
            return PollOutcome::Inactive;
        }
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.inner.api.get_session_status().await;

        let mut outcome = PollOutcome::Applied;
        let mut previous = ConnectionState::Connecting;
        self.inner.state.send_if_modified(|state| {
            if self.inner.active_epoch.load(Ordering::SeqCst) != epoch {
                outcome = PollOutcome::Discarded;
                return false;
            }
            if seq <= self.inner.applied_seq.load(Ordering::SeqCst) {
                outcome = PollOutcome::Superseded;
                return false;
            }
            self.inner.applied_seq.store(seq, Ordering::SeqCst);
            previous = state.connection;
            match &result {
                Ok(status) => {
                    state.status = Some(*status);
                    state.connection = ConnectionState::Connected;
                    state.error = None;
                }
                Err(err) => {
                    state.connection = ConnectionState::Error;
                    state.error = Some(err.to_string());
                }
            }
            true
        });

        match (&result, outcome) {
            (Ok(status), PollOutcome::Applied) => {
                if previous != ConnectionState::Connected {
                    info!(target = "phonelock.sync", seq, "device reachable");
                }
                debug!(
                    target = "phonelock.sync",
                    seq,
                    locked = status.locked,
                    remaining_seconds = status.remaining_seconds,
                    "status applied"
                );
            }
            (Err(err), PollOutcome::Applied) => {
                if previous != ConnectionState::Error {
                    warn!(target = "phonelock.sync", seq, error = %err, "status poll failed");
                } else {
                    debug!(target = "phonelock.sync", seq, error = %err, "status poll failed");
                }
            }
            (_, outcome) => {
                debug!(target = "phonelock.sync", seq, ?outcome, "status poll dropped");
            }
        }
        outcome
    }

    /// Locks the device for `minutes`, then re-polls.
    ///
    /// A failed request is both returned and recorded as the current error;
    /// it does not change the connection state.
    pub async fn start(&self, minutes: u32) -> SyncResult<()> {
        if minutes == 0 {
            return Err(SyncError::InvalidDuration);
        }
        self.run_action(Action::Start(minutes)).await
    }

    /// Unlocks the device, then re-polls. Safe to call when already unlocked.
    pub async fn stop(&self) -> SyncResult<()> {
        self.run_action(Action::Stop).await
    }

    async fn run_action(&self, action: Action) -> SyncResult<()> {
        // One action at a time; a second caller waits its turn.
        let _turn = self.inner.actions.lock().await;
        let _busy = BusyFlag::raise(&self.inner.state, action);

        let result = match action {
            Action::Start(minutes) => self.inner.api.start_session(minutes).await,
            Action::Stop => self.inner.api.stop_session().await,
        };
        self.poll_now().await;

        match result {
            Ok(()) => {
                info!(target = "phonelock.sync", action = action.name(), "session action completed");
                Ok(())
            }
            Err(err) => {
                warn!(
                    target = "phonelock.sync",
                    action = action.name(),
                    error = %err,
                    "session action failed"
                );
                self.record_error(&err);
                Err(err.into())
            }
        }
    }

    fn record_error(&self, err: &ClientError) {
        let message = err.to_string();
        self.inner.state.send_modify(|state| state.error = Some(message));
    }
}

/// Sets a busy flag and clears the error; lowers the flag on drop, including
/// when the action future is cancelled.
struct BusyFlag<'a> {
    state: &'a watch::Sender<SyncState>,
    action: Action,
}

impl<'a> BusyFlag<'a> {
    fn raise(state: &'a watch::Sender<SyncState>, action: Action) -> Self {
        state.send_modify(|state| {
            action.mark(state, true);
            state.error = None;
        });
        Self { state, action }
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        let action = self.action;
        self.state.send_modify(|state| action.mark(state, false));
    }
}

/// Handle for one activation of a [`SessionSynchronizer`].
///
/// Deactivating stops this activation's timer and makes every poll still in
/// flight drop its result. It is idempotent and never touches a later
/// activation of the same synchronizer.
pub struct Activation {
    inner: Arc<Inner>,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

impl Activation {
    /// Returns `true` if this call did the deactivation.
    pub fn deactivate(&mut self) -> bool {
        let Some(timer) = self.timer.take() else {
            return false;
        };
        timer.abort();
        let _ = self.inner.active_epoch.compare_exchange(
            self.epoch,
            INACTIVE,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        info!(target = "phonelock.sync", epoch = self.epoch, "session polling deactivated");
        true
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        self.deactivate();
    }
}
