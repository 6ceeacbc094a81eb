//! Translation request controller.
//!
//! Owns the session state and the single pending request slot. Every
//! operation locks the state, mutates it and returns; the lock is never held
//! across an await. A request runs on a spawned task that races the backend
//! against its cancellation handle. When it finishes it may only write to the
//! session if the stored handle still belongs to it, so a superseded request
//! that resolves late can never overwrite newer state.
//!
//! Operations that start requests must be called from within a Tokio runtime.

mod attempt;
mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::client::{TranslationBackend, TranslationRequest};
use crate::clipboard::Clipboard;
use crate::config::SessionConfig;
use crate::error::{SlangError, SlangResult};
use crate::levels::{LevelCatalog, SlangLevel, DEFAULT_LEVEL_ID};

pub use attempt::{Attempt, AttemptId, AttemptState};
pub use state::TranslationState;

use attempt::{cancelled, status_channel, PendingRequestHandle};

/// Notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The session state changed; take a new snapshot.
    StateChanged,
    /// A new translation is stored. Render it, then schedule the animation.
    TranslationReady {
        /// Result revision, bumped on every success
        revision: u64,
        /// Number of result lines
        lines: usize,
    },
    /// The copied indicator was switched on or off.
    CopiedChanged(bool),
}

/// Session options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Level selected at session start
    pub default_level: String,
    /// How long the copied indicator stays on
    pub copied_indicator: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            default_level: DEFAULT_LEVEL_ID.to_string(),
            copied_indicator: Duration::from_secs(2),
        }
    }
}

impl From<&SessionConfig> for ControllerOptions {
    fn from(config: &SessionConfig) -> Self {
        Self {
            default_level: config.default_level.clone(),
            copied_indicator: config.copied_indicator(),
        }
    }
}

struct Inner {
    state: TranslationState,
    pending: Option<PendingRequestHandle>,
    next_attempt: u64,
    revision: u64,
    copy_generation: u64,
    closed: bool,
}

/// Controller of one translation session.
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct TranslationController {
    inner: Arc<Mutex<Inner>>,
    backend: Arc<dyn TranslationBackend>,
    clipboard: Arc<dyn Clipboard>,
    catalog: Arc<LevelCatalog>,
    copied_indicator: Duration,
    events: mpsc::UnboundedSender<ControllerEvent>,
}

impl TranslationController {
    /// Create a controller and the receiver of its events.
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        clipboard: Arc<dyn Clipboard>,
        catalog: LevelCatalog,
        options: ControllerOptions,
    ) -> (Self, mpsc::UnboundedReceiver<ControllerEvent>) {
        if !catalog.contains(&options.default_level) {
            tracing::warn!(
                level = %options.default_level,
                "default slang level is not in the catalog"
            );
        }
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            inner: Arc::new(Mutex::new(Inner {
                state: TranslationState::with_level(options.default_level),
                pending: None,
                next_attempt: 0,
                revision: 0,
                copy_generation: 0,
                closed: false,
            })),
            backend,
            clipboard,
            catalog: Arc::new(catalog),
            copied_indicator: options.copied_indicator,
            events,
        };
        (controller, receiver)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }

    /// Snapshot of the session state.
    pub fn snapshot(&self) -> TranslationState {
        self.lock().state.clone()
    }

    /// Snapshot of the session state together with its result revision.
    pub fn snapshot_with_revision(&self) -> (TranslationState, u64) {
        let inner = self.lock();
        (inner.state.clone(), inner.revision)
    }

    /// The level catalog.
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// The selected level, if it is in the catalog.
    pub fn selected_level(&self) -> Option<SlangLevel> {
        let inner = self.lock();
        self.catalog.get(&inner.state.selected_level_id).cloned()
    }

    /// Id of the attempt currently in flight.
    pub fn pending_attempt(&self) -> Option<AttemptId> {
        self.lock().pending.as_ref().map(|h| h.attempt())
    }

    /// Revision of the stored translation (0 before the first success).
    pub fn revision(&self) -> u64 {
        self.lock().revision
    }

    /// Whether `end_session` has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Replace the input text. Pending requests are not affected.
    pub fn set_input_text(&self, text: impl Into<String>) {
        self.lock().state.input_text = text.into();
        self.emit(ControllerEvent::StateChanged);
    }

    /// Select a level and re-translate immediately when there is input.
    ///
    /// Unknown ids are rejected and leave the session unchanged.
    pub fn select_level(&self, level_id: &str) -> SlangResult<Option<Attempt>> {
        if !self.catalog.contains(level_id) {
            tracing::warn!(level = %level_id, "rejected unknown slang level");
            return Err(SlangError::InvalidLevelSelection(level_id.to_string()));
        }

        let has_input = {
            let mut inner = self.lock();
            if inner.closed {
                return Err(SlangError::SessionClosed);
            }
            inner.state.selected_level_id = level_id.to_string();
            inner.state.has_input()
        };
        tracing::debug!(level = %level_id, "slang level selected");
        self.emit(ControllerEvent::StateChanged);

        if has_input {
            self.translate(true)
        } else {
            Ok(None)
        }
    }

    /// Select the level after the current one, wrapping around.
    pub fn select_next_level(&self) -> SlangResult<Option<Attempt>> {
        let current = self.snapshot().selected_level_id;
        match self.catalog.next_after(&current) {
            Some(level) => {
                let id = level.id.clone();
                self.select_level(&id)
            }
            None => Err(SlangError::InvalidLevelSelection(current)),
        }
    }

    /// Select the level before the current one, wrapping around.
    pub fn select_previous_level(&self) -> SlangResult<Option<Attempt>> {
        let current = self.snapshot().selected_level_id;
        match self.catalog.previous_before(&current) {
            Some(level) => {
                let id = level.id.clone();
                self.select_level(&id)
            }
            None => Err(SlangError::InvalidLevelSelection(current)),
        }
    }

    /// Start a translation of the current input.
    ///
    /// Returns `Ok(None)` without touching the session when the input is blank,
    /// or when a request is already loading and `force` is false. Otherwise the
    /// pending request, if any, is cancelled before the new one starts.
    pub fn translate(&self, force: bool) -> SlangResult<Option<Attempt>> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(SlangError::SessionClosed);
        }
        if !inner.state.has_input() {
            tracing::debug!("translate skipped: empty input");
            return Ok(None);
        }
        if inner.state.loading && !force {
            tracing::debug!("translate skipped: request already in flight");
            return Ok(None);
        }

        if let Some(previous) = inner.pending.take() {
            tracing::info!(attempt = %previous.attempt(), "superseding pending translation");
            previous.cancel();
        }

        let level_id = inner.state.selected_level_id.clone();
        let level = match self.catalog.get(&level_id) {
            Some(level) => level.clone(),
            None => {
                let err = SlangError::InvalidLevelSelection(level_id);
                tracing::error!(error = %err, "selected level missing from catalog");
                inner.state.loading = false;
                inner.state.translated_text = None;
                inner.state.error = Some(err.to_string());
                drop(inner);
                self.emit(ControllerEvent::StateChanged);
                return Err(err);
            }
        };

        inner.next_attempt += 1;
        let id = AttemptId(inner.next_attempt);
        let (handle, cancel_rx) = PendingRequestHandle::new(id);
        inner.pending = Some(handle);
        inner.state.loading = true;
        inner.state.error = None;
        let request = TranslationRequest::new(inner.state.input_text.clone(), level.prompt);
        drop(inner);

        tracing::info!(attempt = %id, level = %level.id, "translation started");
        self.emit(ControllerEvent::StateChanged);

        let controller = self.clone();
        let (status, status_rx) = status_channel();
        let task = tokio::spawn(async move {
            status.send_replace(AttemptState::Pending);
            let outcome = controller.run_attempt(id, request, cancel_rx).await;
            status.send_replace(outcome.clone());
            outcome
        });
        Ok(Some(Attempt::new(id, status_rx, task)))
    }

    async fn run_attempt(
        &self,
        id: AttemptId,
        request: TranslationRequest,
        mut cancel_rx: tokio::sync::watch::Receiver<bool>,
    ) -> AttemptState {
        let result = tokio::select! {
            biased;
            _ = cancelled(&mut cancel_rx) => {
                tracing::debug!(attempt = %id, "translation cancelled");
                return AttemptState::Cancelled;
            }
            result = self.backend.translate(&request) => result,
        };
        self.finish_attempt(id, result)
    }

    fn finish_attempt(&self, id: AttemptId, result: SlangResult<String>) -> AttemptState {
        let mut inner = self.lock();
        let is_current = inner.pending.as_ref().map(|h| h.attempt()) == Some(id);
        if !is_current {
            tracing::debug!(attempt = %id, "ignoring completion of superseded translation");
            return AttemptState::Cancelled;
        }
        inner.pending = None;
        inner.state.loading = false;

        let mut ready = None;
        let outcome = match result {
            Ok(text) if !text.trim().is_empty() => {
                inner.revision += 1;
                ready = Some(ControllerEvent::TranslationReady {
                    revision: inner.revision,
                    lines: text.lines().count(),
                });
                inner.state.translated_text = Some(text);
                inner.state.error = None;
                inner.state.panel_open = false;
                tracing::info!(attempt = %id, "translation succeeded");
                AttemptState::Succeeded
            }
            Err(err) if err.is_cancellation() => {
                tracing::debug!(attempt = %id, "backend reported cancellation");
                AttemptState::Cancelled
            }
            Ok(_) => Self::record_failure(&mut inner.state, id, SlangError::EmptyResult),
            Err(err) => Self::record_failure(&mut inner.state, id, err),
        };
        drop(inner);

        self.emit(ControllerEvent::StateChanged);
        if let Some(event) = ready {
            self.emit(event);
        }
        outcome
    }

    fn record_failure(state: &mut TranslationState, id: AttemptId, err: SlangError) -> AttemptState {
        tracing::warn!(attempt = %id, error = %err, "translation failed");
        let message = err.to_string();
        state.translated_text = None;
        state.error = Some(message.clone());
        AttemptState::Failed(message)
    }

    /// Copy the translation to the clipboard.
    ///
    /// On success the copied indicator is on until the configured delay has
    /// passed without another copy. A clipboard failure replaces the result
    /// with the error, like any other failure.
    pub fn copy_result(&self) -> SlangResult<()> {
        let text = {
            let inner = self.lock();
            if inner.closed {
                return Err(SlangError::SessionClosed);
            }
            inner
                .state
                .translated_text
                .clone()
                .filter(|t| !t.trim().is_empty())
        }
        .ok_or(SlangError::NothingToCopy)?;

        if let Err(err) = self.clipboard.write_text(&text) {
            tracing::warn!(error = %err, "clipboard write failed");
            let mut inner = self.lock();
            inner.state.error = Some(err.to_string());
            inner.state.translated_text = None;
            drop(inner);
            self.emit(ControllerEvent::StateChanged);
            return Err(err);
        }

        let generation = {
            let mut inner = self.lock();
            inner.copy_generation += 1;
            inner.state.copied = true;
            inner.copy_generation
        };
        tracing::debug!("translation copied to clipboard");
        self.emit(ControllerEvent::CopiedChanged(true));

        let controller = self.clone();
        let delay = self.copied_indicator;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            controller.clear_copied(generation);
        });
        Ok(())
    }

    fn clear_copied(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.copy_generation != generation || !inner.state.copied {
            return;
        }
        inner.state.copied = false;
        drop(inner);
        self.emit(ControllerEvent::CopiedChanged(false));
    }

    /// Open the level picker panel.
    pub fn open_panel(&self) {
        self.set_panel(true);
    }

    /// Close the level picker panel.
    pub fn close_panel(&self) {
        self.set_panel(false);
    }

    /// Toggle the level picker panel.
    pub fn toggle_panel(&self) {
        let open = !self.lock().state.panel_open;
        self.set_panel(open);
    }

    fn set_panel(&self, open: bool) {
        self.lock().state.panel_open = open;
        self.emit(ControllerEvent::StateChanged);
    }

    /// End the session: cancel the pending request and refuse new ones.
    pub fn end_session(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        if let Some(pending) = inner.pending.take() {
            tracing::info!(attempt = %pending.attempt(), "cancelling translation at session end");
            pending.cancel();
        }
    }
}
