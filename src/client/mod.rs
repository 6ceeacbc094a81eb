//! Translation service client.
//!
//! The controller talks to the service through [`TranslationBackend`], so the
//! HTTP implementation can be swapped for a scripted one in tests.

mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SlangResult;

pub use http::{HttpTranslationClient, TRANSLATE_PATH};

/// Body of a translation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to rewrite
    pub text: String,
    /// Prompt of the selected slang level (not its id)
    pub level: String,
}

impl TranslationRequest {
    /// Create a new request.
    pub fn new(text: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: level.into(),
        }
    }
}

/// Body of a successful translation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Rewritten text; may be missing even on 2xx
    #[serde(rename = "translatedText", default)]
    pub translated_text: Option<String>,
}

impl TranslationResponse {
    /// The translation, if present and not blank.
    pub fn into_text(self) -> Option<String> {
        self.translated_text.filter(|t| !t.trim().is_empty())
    }
}

/// A service that turns text into slang.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate the request. Missing or blank results are `SlangError::EmptyResult`.
    async fn translate(&self, request: &TranslationRequest) -> SlangResult<String>;
}
