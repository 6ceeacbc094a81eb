//! Request attempts and their cancellation handles.

use std::fmt;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Identity of one translation attempt within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(pub(crate) u64);

impl AttemptId {
    /// Numeric value of the id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptState {
    /// Spawned, not yet running
    Idle,
    /// Waiting for the service
    Pending,
    /// Result stored in the session
    Succeeded,
    /// Failure stored in the session, with its message
    Failed(String),
    /// Superseded before resolving; the session was not touched
    Cancelled,
}

impl AttemptState {
    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_) | Self::Cancelled)
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed(_) => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Cancellation token of the attempt currently in flight.
///
/// The controller stores at most one. Cancelling signals the request task,
/// which drops the network future.
#[derive(Debug)]
pub(crate) struct PendingRequestHandle {
    attempt: AttemptId,
    cancel: watch::Sender<bool>,
}

impl PendingRequestHandle {
    /// Create a handle and the receiver its request task listens on.
    pub(crate) fn new(attempt: AttemptId) -> (Self, watch::Receiver<bool>) {
        let (cancel, receiver) = watch::channel(false);
        (Self { attempt, cancel }, receiver)
    }

    pub(crate) fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Signal the request task to abandon the request.
    pub(crate) fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

/// Wait until the cancellation receiver reports true, or its sender is gone.
pub(crate) async fn cancelled(receiver: &mut watch::Receiver<bool>) {
    // A dropped sender means the handle was discarded without completing.
    let _ = receiver.wait_for(|cancelled| *cancelled).await;
}

/// Channel the request task reports its state on. Starts out `Idle`.
pub(crate) fn status_channel() -> (watch::Sender<AttemptState>, watch::Receiver<AttemptState>) {
    watch::channel(AttemptState::Idle)
}

/// A started translation attempt.
#[derive(Debug)]
pub struct Attempt {
    id: AttemptId,
    status: watch::Receiver<AttemptState>,
    task: JoinHandle<AttemptState>,
}

impl Attempt {
    pub(crate) fn new(
        id: AttemptId,
        status: watch::Receiver<AttemptState>,
        task: JoinHandle<AttemptState>,
    ) -> Self {
        Self { id, status, task }
    }

    /// Id of this attempt.
    pub fn id(&self) -> AttemptId {
        self.id
    }

    /// Current state, without waiting.
    pub fn state(&self) -> AttemptState {
        self.status.borrow().clone()
    }

    /// Wait for the terminal state of this attempt.
    pub async fn wait(self) -> AttemptState {
        match self.task.await {
            Ok(state) => state,
            Err(e) if e.is_cancelled() => AttemptState::Cancelled,
            Err(e) => AttemptState::Failed(format!("request task failed: {}", e)),
        }
    }
}
