//! The rendered surface the navigator drives.
//!
//! A [`Document`] holds the slide containers injected by the content source
//! plus the optional chrome elements (progress bar, counter, hint region)
//! and the presenter overlay. The painter in [`crate::render`] only reads
//! it; all visibility changes go through the navigator.

use serde::{Deserialize, Serialize};

use crate::parser::{self, Block};

pub const LOADING_MESSAGE: &str = "Loading slides\u{2026}";
pub const DIAGNOSTIC_TITLE: &str = "Error Loading Presentation";
const DIAGNOSTIC_HINT: &str =
    "Check that every fragment path is relative to the deck file and every URL is reachable.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Placeholder shown until the content source delivers; never navigable.
    Loading,
    Slide,
    /// Substituted for the whole deck when loading failed.
    Diagnostic,
}

#[derive(Debug, Clone)]
pub struct SlideContainer {
    pub kind: ContainerKind,
    pub blocks: Vec<Block>,
    pub source: String,
    pub active: bool,
}

impl SlideContainer {
    fn new(kind: ContainerKind, source: String) -> Self {
        Self {
            kind,
            blocks: parser::parse_blocks(&source),
            source,
            active: false,
        }
    }

    pub fn title(&self) -> Option<&str> {
        parser::title_of(&self.blocks)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    /// Filled proportion in `0.0..=1.0`.
    pub fraction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HintRegion {
    pub opacity: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub visible: bool,
    pub content: String,
}

/// Which optional chrome elements a deck renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chrome {
    pub progress: bool,
    pub counter: bool,
    pub hints: bool,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            progress: true,
            counter: true,
            hints: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    containers: Vec<SlideContainer>,
    pub progress: Option<ProgressBar>,
    pub counter: Option<Counter>,
    pub hints: Option<HintRegion>,
    pub overlay: Option<Overlay>,
}

impl Document {
    fn with_containers(containers: Vec<SlideContainer>, chrome: Chrome) -> Self {
        Self {
            containers,
            progress: chrome.progress.then_some(ProgressBar { fraction: 0.0 }),
            counter: chrome.counter.then(|| Counter {
                text: String::new(),
            }),
            hints: chrome.hints.then_some(HintRegion { opacity: 1.0 }),
            overlay: None,
        }
    }

    /// A document waiting for the content source: only the placeholder.
    pub fn loading(chrome: Chrome) -> Self {
        let mut placeholder =
            SlideContainer::new(ContainerKind::Loading, LOADING_MESSAGE.to_string());
        placeholder.active = true;
        Self::with_containers(vec![placeholder], chrome)
    }

    /// A document whose slides are present from the start.
    pub fn from_markdown(content: &str, chrome: Chrome) -> Self {
        let mut doc = Self::with_containers(Vec::new(), chrome);
        doc.inject(content);
        doc
    }

    /// Replace every container (placeholder included) with the slides split
    /// out of `content`.
    pub fn inject(&mut self, content: &str) {
        self.containers = parser::splitter::split(content)
            .into_iter()
            .map(|raw| SlideContainer::new(ContainerKind::Slide, raw))
            .collect();
    }

    /// Replace every container with a single, already active, diagnostic slide.
    pub fn inject_diagnostic(&mut self, message: &str) {
        let source = format!("# {DIAGNOSTIC_TITLE}\n\n{message}\n\n{DIAGNOSTIC_HINT}");
        let mut container = SlideContainer::new(ContainerKind::Diagnostic, source);
        container.active = true;
        self.containers = vec![container];
    }

    pub fn containers(&self) -> &[SlideContainer] {
        &self.containers
    }

    /// Number of containers of any kind, placeholder included.
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Indices of the navigable containers, i.e. everything but the placeholder.
    pub fn slide_indices(&self) -> Vec<usize> {
        self.containers
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind != ContainerKind::Loading)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn set_active(&mut self, index: usize, active: bool) {
        if let Some(container) = self.containers.get_mut(index) {
            container.active = active;
        }
    }

    pub fn active_containers(&self) -> impl Iterator<Item = (usize, &SlideContainer)> {
        self.containers.iter().enumerate().filter(|(_, c)| c.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_document_has_only_placeholder() {
        let doc = Document::loading(Chrome::default());
        assert_eq!(doc.container_count(), 1);
        assert!(doc.slide_indices().is_empty());
        assert_eq!(doc.containers()[0].kind, ContainerKind::Loading);
        assert!(doc.overlay.is_none());
    }

    #[test]
    fn test_inject_replaces_placeholder() {
        let mut doc = Document::loading(Chrome::default());
        doc.inject("# One\n\n---\n\n# Two");
        assert_eq!(doc.container_count(), 2);
        assert_eq!(doc.slide_indices(), vec![0, 1]);
        assert!(doc.containers().iter().all(|c| c.kind == ContainerKind::Slide));
        assert_eq!(doc.containers()[1].title(), Some("Two"));
        assert_eq!(doc.active_containers().count(), 0);
    }

    #[test]
    fn test_diagnostic_is_single_active_container() {
        let mut doc = Document::from_markdown("a\n\n---\n\nb", Chrome::default());
        doc.inject_diagnostic("fetch failed");
        assert_eq!(doc.container_count(), 1);
        let (index, container) = doc.active_containers().next().unwrap();
        assert_eq!(index, 0);
        assert_eq!(container.kind, ContainerKind::Diagnostic);
        assert_eq!(container.title(), Some(DIAGNOSTIC_TITLE));
        assert!(container.source.contains("fetch failed"));
    }

    #[test]
    fn test_chrome_controls_optional_elements() {
        let chrome = Chrome {
            progress: false,
            counter: true,
            hints: false,
        };
        let doc = Document::from_markdown("a", chrome);
        assert!(doc.progress.is_none());
        assert!(doc.counter.is_some());
        assert!(doc.hints.is_none());
    }

    #[test]
    fn test_chrome_yaml_defaults_missing_fields() {
        let chrome: Chrome = serde_yaml::from_str("counter: false").unwrap();
        assert!(chrome.progress);
        assert!(!chrome.counter);
        assert!(chrome.hints);
    }
}
