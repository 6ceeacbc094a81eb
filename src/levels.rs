//! Slang level catalog.
//!
//! A level is a named preset whose `prompt` is sent to the translation
//! service as the `level` field. The catalog is an ordered, immutable list;
//! lookups by id return `None` instead of falling back to another level.

use serde::{Deserialize, Serialize};

/// Id of the level selected when a session starts.
pub const DEFAULT_LEVEL_ID: &str = "medium";

/// A single slang intensity preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlangLevel {
    /// Selection key
    pub id: String,
    /// Human-readable name
    pub label: String,
    /// Instruction sent to the translation service
    pub prompt: String,
}

impl SlangLevel {
    /// Create a new level.
    pub fn new(id: impl Into<String>, label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            prompt: prompt.into(),
        }
    }
}

const BUILTIN_LEVELS: &[(&str, &str, &str)] = &[
    (
        "mild",
        "Mild",
        "Rewrite the text with light, casual internet slang. Keep it readable and mostly unchanged.",
    ),
    (
        "medium",
        "Medium",
        "Rewrite the text with a moderate amount of internet slang and abbreviations like fr, ngl and tbh.",
    ),
    (
        "heavy",
        "Heavy",
        "Rewrite the text using heavy internet slang, abbreviations and Gen Z expressions throughout.",
    ),
    (
        "extreme",
        "Extreme",
        "Rewrite the text as extreme internet slang: stack abbreviations, meme phrases and emojis in every sentence.",
    ),
    (
        "crazy",
        "Crazy",
        "Rewrite the text as absolutely unhinged internet slang. Go over the top with memes, emojis and chaotic energy.",
    ),
];

/// Ordered set of slang levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    levels: Vec<SlangLevel>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// The five built-in levels, mild to crazy.
    pub fn builtin() -> Self {
        Self {
            levels: BUILTIN_LEVELS
                .iter()
                .map(|(id, label, prompt)| SlangLevel::new(*id, *label, *prompt))
                .collect(),
        }
    }

    /// Build a catalog from custom levels. Later duplicates of an id are dropped.
    pub fn from_levels(levels: Vec<SlangLevel>) -> Self {
        let mut unique: Vec<SlangLevel> = Vec::with_capacity(levels.len());
        for level in levels {
            if unique.iter().any(|l| l.id == level.id) {
                tracing::warn!(level = %level.id, "duplicate slang level id ignored");
                continue;
            }
            unique.push(level);
        }
        Self { levels: unique }
    }

    /// Look up a level by id.
    pub fn get(&self, id: &str) -> Option<&SlangLevel> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// Check whether an id is part of the catalog.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Position of a level in the catalog.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.levels.iter().position(|l| l.id == id)
    }

    /// Level following `id`, wrapping around. Unknown ids start at the first level.
    pub fn next_after(&self, id: &str) -> Option<&SlangLevel> {
        let next = match self.position(id) {
            Some(index) => (index + 1) % self.levels.len(),
            None => 0,
        };
        self.levels.get(next)
    }

    /// Level preceding `id`, wrapping around. Unknown ids start at the last level.
    pub fn previous_before(&self, id: &str) -> Option<&SlangLevel> {
        let len = self.levels.len();
        if len == 0 {
            return None;
        }
        let previous = match self.position(id) {
            Some(index) => (index + len - 1) % len,
            None => len - 1,
        };
        self.levels.get(previous)
    }

    /// All levels in order.
    pub fn levels(&self) -> &[SlangLevel] {
        &self.levels
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the catalog has no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let catalog = LevelCatalog::builtin();
        let ids: Vec<&str> = catalog.levels().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["mild", "medium", "heavy", "extreme", "crazy"]);
    }

    #[test]
    fn test_default_level_is_in_builtin() {
        assert!(LevelCatalog::builtin().contains(DEFAULT_LEVEL_ID));
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let catalog = LevelCatalog::builtin();
        assert!(catalog.get("spicy").is_none());
        assert!(catalog.get("").is_none());
    }

    #[test]
    fn test_prompts_differ_from_ids() {
        let catalog = LevelCatalog::builtin();
        for level in catalog.levels() {
            assert_ne!(level.prompt, level.id);
            assert!(!level.prompt.is_empty());
        }
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.next_after("crazy").unwrap().id, "mild");
        assert_eq!(catalog.next_after("mild").unwrap().id, "medium");
        assert_eq!(catalog.previous_before("mild").unwrap().id, "crazy");
        assert_eq!(catalog.previous_before("unknown").unwrap().id, "crazy");
    }

    #[test]
    fn test_from_levels_drops_duplicates() {
        let catalog = LevelCatalog::from_levels(vec![
            SlangLevel::new("a", "A", "first"),
            SlangLevel::new("a", "A2", "second"),
            SlangLevel::new("b", "B", "third"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().prompt, "first");
    }

    #[test]
    fn test_empty_catalog_navigation() {
        let catalog = LevelCatalog::from_levels(Vec::new());
        assert!(catalog.is_empty());
        assert!(catalog.next_after("mild").is_none());
        assert!(catalog.previous_before("mild").is_none());
    }
}
