use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const NOTES_PLACEHOLDER: &str = "No notes for this slide.";

/// Presenter notes keyed by zero-based slide index. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationTable {
    entries: BTreeMap<usize, String>,
}

impl AnnotationTable {
    pub fn new(entries: BTreeMap<usize, String>) -> Self {
        Self { entries }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    /// The note for `index`, or the placeholder when there is none.
    pub fn resolve(&self, index: usize) -> &str {
        self.get(index).unwrap_or(NOTES_PLACEHOLDER)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slides in `0..slide_count` without a note.
    pub fn missing(&self, slide_count: usize) -> Vec<usize> {
        (0..slide_count)
            .filter(|i| !self.entries.contains_key(i))
            .collect()
    }

    /// Note indices that point past the last slide.
    pub fn orphaned(&self, slide_count: usize) -> Vec<usize> {
        self.entries
            .keys()
            .copied()
            .filter(|&i| i >= slide_count)
            .collect()
    }
}

impl FromIterator<(usize, String)> for AnnotationTable {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
