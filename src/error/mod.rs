//! Error types for the translation session.
//!
//! Every failure the controller can produce is a [`SlangError`]. Errors are
//! grouped into categories so callers can decide whether a failure is shown to
//! the user or swallowed (cancellation of a superseded request).

use thiserror::Error;

use crate::config::ConfigLoadError;

/// Result alias used throughout the crate.
pub type SlangResult<T> = Result<T, SlangError>;

/// Errors produced by the translation controller and its collaborators.
#[derive(Debug, Error)]
pub enum SlangError {
    /// The input was empty after trimming. Never surfaced to the user.
    #[error("Nothing to translate")]
    EmptyInput,

    /// A level id that is not part of the catalog was selected or stored.
    #[error("Unknown slang level: {0}")]
    InvalidLevelSelection(String),

    /// The request failed at the transport level or returned a non-2xx status.
    #[error("{0}")]
    TransportFailure(String),

    /// The API answered 2xx but without a usable `translatedText`.
    #[error("No translation received")]
    EmptyResult,

    /// The request was superseded before it resolved.
    #[error("Request was superseded")]
    Cancelled,

    /// The host clipboard rejected the write.
    #[error("Failed to copy: {0}")]
    ClipboardFailure(String),

    /// Copy was requested without a translation to copy.
    #[error("No translation to copy")]
    NothingToCopy,

    /// The session has ended; the controller no longer accepts requests.
    #[error("Session has ended")]
    SessionClosed,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad grouping of errors, used for logging and exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Not an error from the user's point of view.
    Silent,
    /// The caller asked for something that is not valid.
    Validation,
    /// The translation service could not produce a result.
    Transport,
    /// The clipboard facility failed.
    Clipboard,
    /// The process environment (config files, terminal) failed.
    Environment,
}

impl SlangError {
    /// Builds the transport failure for a non-2xx HTTP status.
    pub fn http_status(status: u16) -> Self {
        Self::TransportFailure(format!("Translation failed: {}", status))
    }

    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::Cancelled => ErrorCategory::Silent,
            Self::InvalidLevelSelection(_) | Self::NothingToCopy | Self::SessionClosed => {
                ErrorCategory::Validation
            }
            Self::TransportFailure(_) | Self::EmptyResult => ErrorCategory::Transport,
            Self::ClipboardFailure(_) => ErrorCategory::Clipboard,
            Self::Config(_) | Self::Io(_) => ErrorCategory::Environment,
        }
    }

    /// Returns true if this error should be written to the user-visible error field.
    pub fn is_surfaced(&self) -> bool {
        self.category() != ErrorCategory::Silent
    }

    /// Returns true if this error represents a superseded request.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
