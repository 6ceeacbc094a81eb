//! Request lifecycle tests for the translation controller.
//!
//! The backend hands every call to the test over a channel, so each test
//! decides when (and in which order) requests resolve.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use slangify::client::{TranslationBackend, TranslationRequest};
use slangify::clipboard::Clipboard;
use slangify::controller::{
    AttemptState, ControllerEvent, ControllerOptions, TranslationController,
};
use slangify::error::{SlangError, SlangResult};
use slangify::levels::{LevelCatalog, SlangLevel};

/// A backend call waiting for its reply.
struct PendingCall {
    request: TranslationRequest,
    reply: oneshot::Sender<SlangResult<String>>,
}

impl PendingCall {
    fn respond(self, result: SlangResult<String>) {
        let _ = self.reply.send(result);
    }
}

struct ChannelBackend {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl ChannelBackend {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, receiver) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), receiver)
    }
}

#[async_trait]
impl TranslationBackend for ChannelBackend {
    async fn translate(&self, request: &TranslationRequest) -> SlangResult<String> {
        let (reply, response) = oneshot::channel();
        self.calls
            .send(PendingCall {
                request: request.clone(),
                reply,
            })
            .map_err(|_| SlangError::Cancelled)?;
        response.await.unwrap_or(Err(SlangError::Cancelled))
    }
}

#[derive(Default)]
struct MockClipboard {
    fail: bool,
    writes: Mutex<Vec<String>>,
}

impl MockClipboard {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl Clipboard for MockClipboard {
    fn write_text(&self, text: &str) -> SlangResult<()> {
        if self.fail {
            return Err(SlangError::ClipboardFailure("permission denied".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Harness {
    controller: TranslationController,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    calls: mpsc::UnboundedReceiver<PendingCall>,
    clipboard: Arc<MockClipboard>,
}

fn harness_with(catalog: LevelCatalog, clipboard: MockClipboard) -> Harness {
    let (backend, calls) = ChannelBackend::new();
    let clipboard = Arc::new(clipboard);
    let (controller, events) = TranslationController::new(
        backend,
        clipboard.clone(),
        catalog,
        ControllerOptions::default(),
    );
    Harness {
        controller,
        events,
        calls,
        clipboard,
    }
}

fn harness() -> Harness {
    harness_with(LevelCatalog::builtin(), MockClipboard::default())
}

fn prompt_of(id: &str) -> String {
    LevelCatalog::builtin()
        .get(id)
        .map(|level| level.prompt.clone())
        .unwrap()
}

/// Translate the current input and resolve the request with `reply`.
async fn translate_with(h: &mut Harness, reply: SlangResult<String>) -> AttemptState {
    let attempt = h.controller.translate(false).unwrap().expect("attempt started");
    h.calls.recv().await.unwrap().respond(reply);
    attempt.wait().await
}

#[tokio::test]
async fn test_successful_translation() {
    let mut h = harness();
    h.controller.set_input_text("hello world");

    let attempt = h.controller.translate(false).unwrap().expect("attempt started");
    assert!(h.controller.snapshot().loading);
    assert!(!attempt.state().is_terminal());

    let call = h.calls.recv().await.unwrap();
    assert_eq!(attempt.state(), AttemptState::Pending);
    assert_eq!(call.request.text, "hello world");
    assert_eq!(call.request.level, prompt_of("medium"));
    call.respond(Ok("hello world no cap".to_string()));

    assert_eq!(attempt.wait().await, AttemptState::Succeeded);
    let state = h.controller.snapshot();
    assert_eq!(state.translated_text.as_deref(), Some("hello world no cap"));
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(h.controller.revision(), 1);
}

#[tokio::test]
async fn test_rapid_retranslation_keeps_only_latest_result() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    let first = h.controller.translate(true).unwrap().unwrap();
    let first_call = h.calls.recv().await.unwrap();
    let second = h.controller.translate(true).unwrap().unwrap();
    let second_call = h.calls.recv().await.unwrap();
    assert_ne!(first.id(), second.id());

    // The superseded request resolves first, then the current one.
    first_call.respond(Ok("stale".to_string()));
    second_call.respond(Ok("fresh".to_string()));

    assert_eq!(first.wait().await, AttemptState::Cancelled);
    assert_eq!(second.wait().await, AttemptState::Succeeded);

    let state = h.controller.snapshot();
    assert_eq!(state.translated_text.as_deref(), Some("fresh"));
    assert!(!state.loading);
    assert_eq!(h.controller.revision(), 1);
}

#[tokio::test]
async fn test_superseded_request_resolving_last_is_ignored() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    let first = h.controller.translate(true).unwrap().unwrap();
    let first_call = h.calls.recv().await.unwrap();
    let second = h.controller.translate(true).unwrap().unwrap();
    let second_call = h.calls.recv().await.unwrap();

    second_call.respond(Ok("fresh".to_string()));
    assert_eq!(second.wait().await, AttemptState::Succeeded);

    first_call.respond(Err(SlangError::http_status(500)));
    assert_eq!(first.wait().await, AttemptState::Cancelled);

    let state = h.controller.snapshot();
    assert_eq!(state.translated_text.as_deref(), Some("fresh"));
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_empty_input_issues_no_request() {
    let mut h = harness();
    h.controller.set_input_text("   \n\t");

    assert!(h.controller.translate(false).unwrap().is_none());
    assert!(h.controller.translate(true).unwrap().is_none());

    let state = h.controller.snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(h.calls.try_recv().is_err());
}

#[tokio::test]
async fn test_translate_while_loading_without_force_is_noop() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    let attempt = h.controller.translate(false).unwrap().unwrap();
    let call = h.calls.recv().await.unwrap();
    assert!(h.controller.translate(false).unwrap().is_none());
    assert_eq!(h.controller.pending_attempt(), Some(attempt.id()));

    call.respond(Ok("yo".to_string()));
    assert_eq!(attempt.wait().await, AttemptState::Succeeded);
}

#[tokio::test]
async fn test_missing_result_is_an_error() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    let outcome = translate_with(&mut h, Err(SlangError::EmptyResult)).await;
    assert_eq!(
        outcome,
        AttemptState::Failed("No translation received".to_string())
    );
    let state = h.controller.snapshot();
    assert_eq!(state.error.as_deref(), Some("No translation received"));
    assert!(state.translated_text.is_none());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_blank_result_is_an_error() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    translate_with(&mut h, Ok("  ".to_string())).await;
    assert_eq!(
        h.controller.snapshot().error.as_deref(),
        Some("No translation received")
    );
}

#[tokio::test]
async fn test_http_failure_clears_previous_result() {
    let mut h = harness();
    h.controller.set_input_text("hello");
    translate_with(&mut h, Ok("first".to_string())).await;

    let outcome = translate_with(&mut h, Err(SlangError::http_status(500))).await;
    assert_eq!(
        outcome,
        AttemptState::Failed("Translation failed: 500".to_string())
    );
    let state = h.controller.snapshot();
    assert_eq!(state.error.as_deref(), Some("Translation failed: 500"));
    assert!(state.translated_text.is_none());
}

#[tokio::test]
async fn test_next_translation_clears_error() {
    let mut h = harness();
    h.controller.set_input_text("hello");
    translate_with(&mut h, Err(SlangError::http_status(502))).await;

    let attempt = h.controller.translate(false).unwrap().unwrap();
    assert!(h.controller.snapshot().error.is_none());
    h.calls.recv().await.unwrap().respond(Ok("ok".to_string()));
    assert_eq!(attempt.wait().await, AttemptState::Succeeded);
}

#[tokio::test]
async fn test_select_level_retranslates_and_supersedes() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    let first = h.controller.translate(false).unwrap().unwrap();
    let first_call = h.calls.recv().await.unwrap();

    let second = h
        .controller
        .select_level("crazy")
        .unwrap()
        .expect("input present, so a request starts");
    let second_call = h.calls.recv().await.unwrap();
    assert_eq!(second_call.request.level, prompt_of("crazy"));
    assert_eq!(h.controller.snapshot().selected_level_id, "crazy");

    first_call.respond(Ok("medium result".to_string()));
    second_call.respond(Ok("crazy result".to_string()));
    assert_eq!(first.wait().await, AttemptState::Cancelled);
    assert_eq!(second.wait().await, AttemptState::Succeeded);
    assert_eq!(
        h.controller.snapshot().translated_text.as_deref(),
        Some("crazy result")
    );
}

#[tokio::test]
async fn test_select_level_without_input_only_selects() {
    let mut h = harness();
    assert!(h.controller.select_level("mild").unwrap().is_none());
    assert_eq!(h.controller.snapshot().selected_level_id, "mild");
    assert_eq!(h.controller.selected_level().map(|level| level.label), Some("Mild".to_string()));
    assert!(h.calls.try_recv().is_err());
}

#[tokio::test]
async fn test_unknown_level_is_rejected() {
    let h = harness();
    let err = h.controller.select_level("spicy").unwrap_err();
    assert!(matches!(err, SlangError::InvalidLevelSelection(ref id) if id == "spicy"));
    assert_eq!(h.controller.snapshot().selected_level_id, "medium");
}

#[tokio::test]
async fn test_level_missing_from_catalog_surfaces_error() {
    let catalog = LevelCatalog::from_levels(vec![SlangLevel::new("only", "Only", "talk funny")]);
    let mut h = harness_with(catalog, MockClipboard::default());
    h.controller.set_input_text("hello");

    let err = h.controller.translate(false).unwrap_err();
    assert!(matches!(err, SlangError::InvalidLevelSelection(_)));
    let state = h.controller.snapshot();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Unknown slang level: medium"));
    assert!(h.calls.try_recv().is_err());
}

#[tokio::test]
async fn test_level_cycling_wraps() {
    let h = harness();
    h.controller.select_previous_level().unwrap();
    h.controller.select_previous_level().unwrap();
    assert_eq!(h.controller.snapshot().selected_level_id, "crazy");
    h.controller.select_next_level().unwrap();
    assert_eq!(h.controller.snapshot().selected_level_id, "mild");
}

#[tokio::test]
async fn test_success_closes_panel_and_emits_ready() {
    let mut h = harness();
    h.controller.set_input_text("hello");
    h.controller.open_panel();
    assert!(h.controller.snapshot().panel_open);

    translate_with(&mut h, Ok("a\nb\nc".to_string())).await;
    assert!(!h.controller.snapshot().panel_open);

    let mut ready = None;
    while let Ok(event) = h.events.try_recv() {
        if let ControllerEvent::TranslationReady { .. } = event {
            ready = Some(event);
        }
    }
    assert_eq!(
        ready,
        Some(ControllerEvent::TranslationReady {
            revision: 1,
            lines: 3
        })
    );
}

#[tokio::test]
async fn test_copy_without_result() {
    let h = harness();
    let err = h.controller.copy_result().unwrap_err();
    assert!(matches!(err, SlangError::NothingToCopy));
    assert!(!h.controller.snapshot().copied);
    assert!(h.clipboard.writes().is_empty());
}

#[tokio::test]
async fn test_clipboard_failure_replaces_result_with_error() {
    let mut h = harness_with(LevelCatalog::builtin(), MockClipboard::failing());
    h.controller.set_input_text("hello");
    translate_with(&mut h, Ok("sheesh".to_string())).await;

    let err = h.controller.copy_result().unwrap_err();
    assert!(matches!(err, SlangError::ClipboardFailure(_)));
    let state = h.controller.snapshot();
    assert!(!state.copied);
    assert_eq!(state.error.as_deref(), Some("Failed to copy: permission denied"));
    assert!(state.translated_text.is_none());

    // A new translation clears the error and stores a fresh result.
    translate_with(&mut h, Ok("sheesh again".to_string())).await;
    let state = h.controller.snapshot();
    assert!(state.error.is_none());
    assert_eq!(state.translated_text.as_deref(), Some("sheesh again"));
}

#[tokio::test(start_paused = true)]
async fn test_copied_indicator_resets_after_delay() {
    let mut h = harness();
    h.controller.set_input_text("hello");
    translate_with(&mut h, Ok("bet".to_string())).await;

    h.controller.copy_result().unwrap();
    assert_eq!(h.clipboard.writes(), vec!["bet".to_string()]);
    assert!(h.controller.snapshot().copied);

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert!(h.controller.snapshot().copied);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!h.controller.snapshot().copied);
}

#[tokio::test(start_paused = true)]
async fn test_copy_again_restarts_indicator() {
    let mut h = harness();
    h.controller.set_input_text("hello");
    translate_with(&mut h, Ok("bet".to_string())).await;

    h.controller.copy_result().unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    h.controller.copy_result().unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(h.controller.snapshot().copied);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!h.controller.snapshot().copied);
}

#[tokio::test(start_paused = true)]
async fn test_copied_indicator_survives_new_translation() {
    let mut h = harness();
    h.controller.set_input_text("hello");
    translate_with(&mut h, Ok("bet".to_string())).await;
    h.controller.copy_result().unwrap();

    translate_with(&mut h, Ok("bet again".to_string())).await;
    assert!(h.controller.snapshot().copied);

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(!h.controller.snapshot().copied);
}

#[tokio::test]
async fn test_end_session_cancels_pending_request() {
    let mut h = harness();
    h.controller.set_input_text("hello");

    let attempt = h.controller.translate(false).unwrap().unwrap();
    let call = h.calls.recv().await.unwrap();
    h.controller.end_session();
    call.respond(Ok("too late".to_string()));

    assert_eq!(attempt.wait().await, AttemptState::Cancelled);
    assert!(h.controller.snapshot().translated_text.is_none());
    assert!(h.controller.is_closed());
    assert!(matches!(
        h.controller.translate(true),
        Err(SlangError::SessionClosed)
    ));
}
