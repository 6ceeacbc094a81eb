//! Clipboard access.

use cli_clipboard::{ClipboardContext, ClipboardProvider};

use crate::error::{SlangError, SlangResult};

/// Host facility that can receive copied text.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> SlangResult<()>;
}

/// The operating system clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> SlangResult<()> {
        ClipboardContext::new()
            .and_then(|mut ctx| ctx.set_contents(text.to_string()))
            .map_err(|e| SlangError::ClipboardFailure(e.to_string()))
    }
}
