//! The content source: fetches slide fragments in parallel, joins them in
//! deck order and fires a single ready signal.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rayon::prelude::*;
use thiserror::Error;

use crate::document::Document;

/// Inserted between fragments so each one starts a new slide.
pub const FRAGMENT_BREAK: &str = "\n\n---\n\n";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Remote(String),
}

impl Location {
    /// `http(s)` URLs are remote; anything else is a path relative to `base`.
    pub fn resolve(raw: &str, base: &Path) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Remote(raw.to_string())
        } else {
            Self::File(base.join(raw))
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("the deck lists no slide fragments")]
    NoFragments,

    #[error("failed to load {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("no slides found in {fragments} fragment(s)")]
    Empty { fragments: usize },
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { content: String, fragments: usize },
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Put the outcome into the document: the joined fragments on success,
    /// a single diagnostic slide otherwise.
    pub fn inject_into(&self, document: &mut Document) {
        match self {
            Self::Loaded { content, fragments } => {
                document.inject(content);
                if document.slide_indices().is_empty() {
                    let error = LoadError::Empty {
                        fragments: *fragments,
                    };
                    tracing::warn!(%error, "loaded content has no slides");
                    document.inject_diagnostic(&error.to_string());
                }
            }
            Self::Failed(error) => document.inject_diagnostic(&error.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentSource {
    locations: Vec<Location>,
    timeout: Duration,
}

impl ContentSource {
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Fetch every fragment, blocking the calling thread. Fetches overlap;
    /// the result keeps deck order and the first failure aborts the batch.
    pub fn load(&self) -> LoadOutcome {
        if self.locations.is_empty() {
            return LoadOutcome::Failed(LoadError::NoFragments);
        }

        let agent = self.agent();
        let stamp = cache_stamp();
        let fetched: Result<Vec<String>, LoadError> = self
            .locations
            .par_iter()
            .map(|location| fetch(&agent, location, &stamp))
            .collect();

        match fetched {
            Ok(fragments) => {
                tracing::info!(fragments = fragments.len(), "slide fragments loaded");
                LoadOutcome::Loaded {
                    fragments: fragments.len(),
                    content: fragments.join(FRAGMENT_BREAK),
                }
            }
            Err(error) => {
                tracing::error!(%error, "loading slide fragments failed");
                LoadOutcome::Failed(error)
            }
        }
    }

    /// Load on a worker thread. `on_ready` runs on that thread right after
    /// the outcome is sent, e.g. to wake the UI.
    pub fn spawn<F>(self, on_ready: F) -> ReadySignal
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let outcome = self.load();
            // The receiver is gone when the viewer closed mid-load.
            if tx.send(outcome).is_ok() {
                on_ready();
            }
        });
        ReadySignal { rx: Some(rx) }
    }

    fn agent(&self) -> ureq::Agent {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();
        ureq::Agent::new_with_config(config)
    }
}

/// One-shot receiver for the content source's outcome.
#[derive(Debug)]
pub struct ReadySignal {
    rx: Option<Receiver<LoadOutcome>>,
}

impl ReadySignal {
    /// Take the outcome if it has arrived. Returns `Some` at most once.
    pub fn try_take(&mut self) -> Option<LoadOutcome> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.rx = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                Some(LoadOutcome::Failed(LoadError::Read {
                    location: "content source".to_string(),
                    source: std::io::Error::other("loader thread exited without a result"),
                }))
            }
        }
    }
}

fn fetch(agent: &ureq::Agent, location: &Location, stamp: &str) -> Result<String, LoadError> {
    tracing::debug!(%location, "fetching fragment");
    match location {
        Location::File(path) => std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            location: location.to_string(),
            source,
        }),
        Location::Remote(url) => agent
            .get(url)
            .query("v", stamp)
            .call()
            .and_then(|mut response| response.body_mut().read_to_string())
            .map_err(|source| LoadError::Fetch {
                location: location.to_string(),
                source: Box::new(source),
            }),
    }
}

/// Cache-busting query value shared by one batch.
fn cache_stamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chrome, ContainerKind, DIAGNOSTIC_TITLE};

    fn write(dir: &Path, name: &str, content: &str) -> Location {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        Location::File(path)
    }

    #[test]
    fn test_resolve_locations() {
        let base = Path::new("/decks/talk");
        assert_eq!(
            Location::resolve("slides/00.md", base),
            Location::File(PathBuf::from("/decks/talk/slides/00.md"))
        );
        assert_eq!(
            Location::resolve(" https://example.org/01.md ", base),
            Location::Remote("https://example.org/01.md".into())
        );
    }

    #[test]
    fn test_load_keeps_deck_order() {
        let dir = tempfile::tempdir().unwrap();
        let locations: Vec<Location> = (0..12)
            .map(|i| write(dir.path(), &format!("{i:02}.md"), &format!("# Slide {i}")))
            .collect();

        let outcome = ContentSource::new(locations).load();
        let LoadOutcome::Loaded { content, fragments } = outcome else {
            panic!("expected a successful load");
        };
        assert_eq!(fragments, 12);
        let titles: Vec<String> = crate::parser::splitter::split(&content);
        assert_eq!(titles.len(), 12);
        assert_eq!(titles[0], "# Slide 0");
        assert_eq!(titles[11], "# Slide 11");
    }

    #[test]
    fn test_one_missing_fragment_fails_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let locations = vec![
            write(dir.path(), "a.md", "# A"),
            Location::File(dir.path().join("missing.md")),
            write(dir.path(), "c.md", "# C"),
        ];
        let outcome = ContentSource::new(locations).load();
        match outcome {
            LoadOutcome::Failed(LoadError::Read { location, .. }) => {
                assert!(location.ends_with("missing.md"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_no_locations_is_a_failure() {
        let outcome = ContentSource::new(Vec::new()).load();
        assert!(matches!(outcome, LoadOutcome::Failed(LoadError::NoFragments)));
    }

    #[test]
    fn test_failure_injects_diagnostic() {
        let mut document = Document::loading(Chrome::default());
        LoadOutcome::Failed(LoadError::NoFragments).inject_into(&mut document);
        assert_eq!(document.slide_indices(), vec![0]);
        let container = &document.containers()[0];
        assert_eq!(container.kind, ContainerKind::Diagnostic);
        assert_eq!(container.title(), Some(DIAGNOSTIC_TITLE));
        assert!(container.source.contains("no slide fragments"));
    }

    #[test]
    fn test_blank_fragments_inject_diagnostic() {
        let mut document = Document::loading(Chrome::default());
        let outcome = LoadOutcome::Loaded {
            content: format!("  {FRAGMENT_BREAK}\n"),
            fragments: 2,
        };
        outcome.inject_into(&mut document);
        assert_eq!(document.containers()[0].kind, ContainerKind::Diagnostic);
    }

    #[test]
    fn test_spawn_signals_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let locations = vec![
            write(dir.path(), "a.md", "# A"),
            write(dir.path(), "b.md", "# B\n\n---\n\n# B2"),
        ];
        let (woke_tx, woke_rx) = mpsc::channel();
        let mut signal = ContentSource::new(locations).spawn(move || {
            woke_tx.send(()).unwrap();
        });

        woke_rx.recv_timeout(Duration::from_secs(10)).unwrap();
        let outcome = signal.try_take().expect("outcome after wakeup");
        assert!(outcome.is_loaded());
        assert!(signal.try_take().is_none());

        let mut document = Document::loading(Chrome::default());
        outcome.inject_into(&mut document);
        assert_eq!(document.slide_indices().len(), 3);
    }
}
