//! The viewer's "address bar": a deck location plus a `#slide-N` fragment,
//! with a back/forward history.
//!
//! Every change to the fragment queues an [`AddressChange`] tagged with its
//! [`Origin`]. Writes made by the navigator itself are `Internal` and are
//! dropped by reconciliation; everything the user or a deep link causes is
//! `External`.

use std::collections::VecDeque;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static SLIDE_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?slide-(\d+)").expect("valid slide fragment regex"));

/// Fragment text for a zero-based position, without the leading `#`.
pub fn slide_fragment(position: usize) -> String {
    format!("slide-{position}")
}

/// Parse `slide-<N>` (optionally `#`-prefixed). Trailing text after the
/// digits is ignored; anything else yields `None`.
pub fn parse_slide_fragment(fragment: &str) -> Option<usize> {
    SLIDE_FRAGMENT
        .captures(fragment.trim())
        .and_then(|caps| caps[1].parse().ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A projection of navigator state; must not be reconciled.
    Internal,
    /// Typed, linked, or reached through history.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressChange {
    pub fragment: Option<String>,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct Address {
    base: String,
    entries: Vec<Option<String>>,
    cursor: usize,
    pending: VecDeque<AddressChange>,
}

impl Address {
    pub fn new(base: impl Into<String>, fragment: Option<String>) -> Self {
        Self {
            base: base.into(),
            entries: vec![normalize(fragment)],
            cursor: 0,
            pending: VecDeque::new(),
        }
    }

    pub fn fragment(&self) -> Option<&str> {
        self.entries[self.cursor].as_deref()
    }

    pub fn href(&self) -> String {
        match self.fragment() {
            Some(fragment) => format!("{}#{fragment}", self.base),
            None => self.base.clone(),
        }
    }

    /// Rewrite the current entry in place. No history entry is created and
    /// the queued change is tagged [`Origin::Internal`].
    pub fn replace_fragment(&mut self, fragment: impl Into<String>) {
        let fragment = normalize(Some(fragment.into()));
        self.entries[self.cursor] = fragment.clone();
        self.pending.push_back(AddressChange {
            fragment,
            origin: Origin::Internal,
        });
    }

    /// Navigate to a new fragment, dropping any forward history.
    pub fn navigate(&mut self, fragment: Option<String>) {
        let fragment = normalize(fragment);
        self.entries.truncate(self.cursor + 1);
        self.entries.push(fragment.clone());
        self.cursor += 1;
        self.pending.push_back(AddressChange {
            fragment,
            origin: Origin::External,
        });
    }

    /// Navigate to whatever the user typed into the address field. A bare
    /// fragment (`#slide-3`, `slide-3`) or a full `location#fragment` is
    /// accepted; the location part is not re-resolved.
    pub fn navigate_to_input(&mut self, input: &str) {
        let input = input.trim();
        let fragment = match input.rsplit_once('#') {
            Some((_, fragment)) => Some(fragment.to_string()),
            None if input == self.base || input.is_empty() => None,
            None => Some(input.to_string()),
        };
        self.navigate(fragment);
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        self.queue_current_external();
        true
    }

    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        self.queue_current_external();
        true
    }

    /// Drain change notifications in the order they happened.
    pub fn take_changes(&mut self) -> Vec<AddressChange> {
        self.pending.drain(..).collect()
    }

    fn queue_current_external(&mut self) {
        self.pending.push_back(AddressChange {
            fragment: self.entries[self.cursor].clone(),
            origin: Origin::External,
        });
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

fn normalize(fragment: Option<String>) -> Option<String> {
    fragment
        .map(|f| f.trim_start_matches('#').to_string())
        .filter(|f| !f.is_empty())
}
