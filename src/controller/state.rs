//! Session state read by the UI.

use serde::Serialize;

use crate::levels::DEFAULT_LEVEL_ID;

/// Snapshot of a translation session.
///
/// The controller owns the live value; callers only ever see clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationState {
    /// Text typed by the user
    pub input_text: String,
    /// Id of the selected slang level
    pub selected_level_id: String,
    /// Last successful translation
    pub translated_text: Option<String>,
    /// Whether a request is in flight
    pub loading: bool,
    /// User-visible error of the last failed operation
    pub error: Option<String>,
    /// Whether the result was just copied
    pub copied: bool,
    /// Whether the level picker panel is open
    pub panel_open: bool,
}

impl Default for TranslationState {
    fn default() -> Self {
        Self::with_level(DEFAULT_LEVEL_ID)
    }
}

impl TranslationState {
    /// Fresh state with `level_id` selected.
    pub fn with_level(level_id: impl Into<String>) -> Self {
        Self {
            input_text: String::new(),
            selected_level_id: level_id.into(),
            translated_text: None,
            loading: false,
            error: None,
            copied: false,
            panel_open: false,
        }
    }

    /// Whether the input has anything but whitespace.
    pub fn has_input(&self) -> bool {
        !self.input_text.trim().is_empty()
    }

    /// Lines of the translation, split on line breaks.
    pub fn result_lines(&self) -> Vec<&str> {
        self.translated_text
            .as_deref()
            .map(|text| text.lines().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = TranslationState::default();
        assert_eq!(state.input_text, "");
        assert_eq!(state.selected_level_id, "medium");
        assert!(state.translated_text.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(!state.copied);
    }

    #[test]
    fn test_has_input_trims() {
        let mut state = TranslationState::default();
        state.input_text = " \n\t".to_string();
        assert!(!state.has_input());
        state.input_text = " hi ".to_string();
        assert!(state.has_input());
    }

    #[test]
    fn test_result_lines() {
        let mut state = TranslationState::default();
        assert!(state.result_lines().is_empty());

        state.translated_text = Some("no cap\r\nits giving\nbussin".to_string());
        assert_eq!(state.result_lines(), vec!["no cap", "its giving", "bussin"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(TranslationState::default()).unwrap();
        assert_eq!(json["selectedLevelId"], "medium");
        assert_eq!(json["translatedText"], serde_json::Value::Null);
        assert_eq!(json["loading"], false);
    }
}
