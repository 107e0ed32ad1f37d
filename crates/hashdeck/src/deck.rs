//! Deck manifests and the `DECK[#slide-N]` command-line argument.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::Chrome;
use crate::loader::{ContentSource, Location};
use crate::notes::AnnotationTable;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deck manifest {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A YAML deck manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Declared slide count. Only checked, never trusted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<usize>,

    #[serde(default)]
    pub fragments: Vec<String>,

    #[serde(default, skip_serializing_if = "AnnotationTable::is_empty")]
    pub notes: AnnotationTable,

    #[serde(default)]
    pub chrome: Chrome,
}

/// What the deck argument points at.
#[derive(Debug, Clone)]
pub enum DeckSource {
    /// Fragments are fetched asynchronously.
    Manifest(Manifest),
    /// Slides are present from the start.
    Markdown(String),
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub path: PathBuf,
    pub source: DeckSource,
}

impl Deck {
    /// Load a `.yaml`/`.yml` manifest or a markdown deck.
    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let source = if is_manifest(path) {
            let manifest: Manifest =
                serde_yaml::from_str(&contents).map_err(|source| DeckError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            DeckSource::Manifest(manifest)
        } else {
            DeckSource::Markdown(contents)
        };
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        match &self.source {
            DeckSource::Manifest(manifest) => Some(manifest),
            DeckSource::Markdown(_) => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.manifest().and_then(|m| m.title.as_deref())
    }

    pub fn theme(&self) -> Option<&str> {
        self.manifest().and_then(|m| m.theme.as_deref())
    }

    pub fn chrome(&self) -> Chrome {
        self.manifest().map(|m| m.chrome).unwrap_or_default()
    }

    pub fn expected_slides(&self) -> Option<usize> {
        self.manifest().and_then(|m| m.slides)
    }

    pub fn notes(&self) -> AnnotationTable {
        self.manifest().map(|m| m.notes.clone()).unwrap_or_default()
    }

    /// The content source for a manifest deck; `None` for markdown decks.
    pub fn content_source(&self) -> Option<ContentSource> {
        let manifest = self.manifest()?;
        let base = self.base_dir();
        let locations = manifest
            .fragments
            .iter()
            .map(|raw| Location::resolve(raw, base))
            .collect();
        Some(ContentSource::new(locations))
    }

    /// Name shown in the address field and window title.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .to_string()
    }
}

fn is_manifest(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// The positional argument, `talk.yaml#slide-5`, split into path and fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckLink {
    pub path: PathBuf,
    pub fragment: Option<String>,
}

impl DeckLink {
    /// Split at the last `#`, unless the whole argument names an existing
    /// file (paths may legitimately contain `#`).
    pub fn parse(arg: &str) -> Self {
        if Path::new(arg).exists() {
            return Self {
                path: PathBuf::from(arg),
                fragment: None,
            };
        }
        match arg.rsplit_once('#') {
            Some((path, fragment)) => Self {
                path: PathBuf::from(path),
                fragment: Some(fragment.to_string()).filter(|f| !f.is_empty()),
            },
            None => Self {
                path: PathBuf::from(arg),
                fragment: None,
            },
        }
    }
}

impl std::str::FromStr for DeckLink {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
