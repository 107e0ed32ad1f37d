//! The navigation engine.
//!
//! [`Navigator`] owns the current position and is the only writer of slide
//! visibility, chrome state, the presenter overlay and the address
//! fragment. Its lifecycle is `Uninitialized → Initialized → TornDown`;
//! initialization happens at most once, either on [`Event::ContentReady`]
//! or through the presence check in [`Navigator::startup`].

use std::time::{Duration, Instant};

use crate::address::{self, Address, AddressChange, Origin};
use crate::document::{Document, Overlay};
use crate::input::{self, Command, Key, SwipeTracker};
use crate::notes::AnnotationTable;

/// Delay between initialization and the hint region fading out.
pub const HINT_FADE_DELAY: Duration = Duration::from_secs(5);
pub const HINT_FADED_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ContentReady { at: Instant },
    Key(Key),
    PointerDown { x: f32 },
    PointerUp { x: f32 },
    /// The pointer left the surface mid-gesture.
    PointerCancel,
    AddressChanged(AddressChange),
    Tick(Instant),
}

/// Whether the shell should suppress its default handling of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initialized,
    TornDown,
}

#[derive(Debug)]
struct Session {
    position: usize,
    /// Document indices of the navigable containers, captured once.
    containers: Vec<usize>,
    overlay_visible: bool,
    fade_hints_at: Option<Instant>,
    swipe: SwipeTracker,
}

impl Session {
    fn slide_count(&self) -> usize {
        self.containers.len()
    }
}

#[derive(Debug)]
enum Lifecycle {
    Uninitialized,
    Initialized(Session),
    TornDown,
}

pub struct Navigator {
    document: Document,
    address: Address,
    notes: AnnotationTable,
    expected_slides: Option<usize>,
    lifecycle: Lifecycle,
}

impl Navigator {
    pub fn new(document: Document, address: Address, notes: AnnotationTable) -> Self {
        Self {
            document,
            address,
            notes,
            expected_slides: None,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Slide count declared by the deck; a mismatch is only reported.
    pub fn with_expected_slides(mut self, expected: Option<usize>) -> Self {
        self.expected_slides = expected;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for the content source to inject into.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Mutable access for external navigation (address field, history).
    /// Follow up with [`Navigator::sync_address`].
    pub fn address_mut(&mut self) -> &mut Address {
        &mut self.address
    }

    pub fn phase(&self) -> Phase {
        match self.lifecycle {
            Lifecycle::Uninitialized => Phase::Uninitialized,
            Lifecycle::Initialized(_) => Phase::Initialized,
            Lifecycle::TornDown => Phase::TornDown,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Initialized(_))
    }

    pub fn position(&self) -> Option<usize> {
        self.session().map(|s| s.position)
    }

    pub fn slide_count(&self) -> usize {
        self.session().map_or(0, Session::slide_count)
    }

    pub fn overlay_visible(&self) -> bool {
        self.session().is_some_and(|s| s.overlay_visible)
    }

    /// When the next timed change is due, so the shell can schedule a wakeup.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.session().and_then(|s| s.fade_hints_at)
    }

    fn cursor(&self) -> Option<(usize, usize)> {
        self.session().map(|s| (s.position, s.slide_count()))
    }

    fn session(&self) -> Option<&Session> {
        match &self.lifecycle {
            Lifecycle::Initialized(session) => Some(session),
            _ => None,
        }
    }

    /// Presence check run once at startup: content that is already in the
    /// document (more than one container) needs no ready signal.
    pub fn startup(&mut self, now: Instant) -> bool {
        let containers = self.document.container_count();
        if containers > 1 {
            tracing::debug!(containers, "content already present at startup");
            self.initialize(now)
        } else {
            tracing::debug!(containers, "waiting for content");
            false
        }
    }

    /// Enter the initialized state. Returns `false` when already initialized
    /// or torn down.
    pub fn initialize(&mut self, now: Instant) -> bool {
        if !matches!(self.lifecycle, Lifecycle::Uninitialized) {
            tracing::trace!(phase = ?self.phase(), "initialize ignored");
            return false;
        }

        let containers = self.document.slide_indices();
        let slide_count = containers.len();
        if let Some(expected) = self.expected_slides.filter(|&e| e != slide_count) {
            tracing::warn!(
                expected,
                found = slide_count,
                "deck declares a different slide count than was loaded"
            );
        }
        if slide_count == 0 {
            tracing::warn!("initialized without any slide containers");
        }

        // Changes queued before now are already reflected in the fragment.
        self.address.take_changes();
        self.document.overlay = Some(Overlay::default());
        self.lifecycle = Lifecycle::Initialized(Session {
            position: 0,
            containers,
            overlay_visible: false,
            fade_hints_at: Some(now + HINT_FADE_DELAY),
            swipe: SwipeTracker::default(),
        });

        let fragment = self.address.fragment().map(str::to_string);
        self.reconcile(fragment.as_deref());
        tracing::info!(
            slides = slide_count,
            position = self.position().unwrap_or(0),
            "navigator initialized"
        );
        true
    }

    /// Stop reacting to input and timers.
    pub fn teardown(&mut self) {
        if matches!(self.lifecycle, Lifecycle::TornDown) {
            return;
        }
        self.lifecycle = Lifecycle::TornDown;
        tracing::debug!("navigator torn down");
    }

    pub fn handle(&mut self, event: Event) -> Handled {
        match event {
            Event::ContentReady { at } => {
                if self.initialize(at) {
                    Handled::Consumed
                } else {
                    Handled::Ignored
                }
            }
            Event::Tick(now) => {
                self.tick(now);
                Handled::Ignored
            }
            _ if !self.is_initialized() => {
                tracing::trace!(?event, "input before initialization");
                Handled::Ignored
            }
            Event::Key(key) => match input::command_for_key(key, self.overlay_visible()) {
                Some(command) => {
                    self.execute(command);
                    Handled::Consumed
                }
                None => Handled::Ignored,
            },
            Event::PointerDown { x } => {
                if let Lifecycle::Initialized(session) = &mut self.lifecycle {
                    session.swipe.begin(x);
                }
                Handled::Ignored
            }
            Event::PointerCancel => {
                if let Lifecycle::Initialized(session) = &mut self.lifecycle {
                    session.swipe.cancel();
                }
                Handled::Ignored
            }
            Event::PointerUp { x } => {
                let command = match &mut self.lifecycle {
                    Lifecycle::Initialized(session) => session.swipe.end(x),
                    _ => None,
                };
                match command {
                    Some(command) => {
                        self.execute(command);
                        Handled::Consumed
                    }
                    None => Handled::Ignored,
                }
            }
            Event::AddressChanged(change) => {
                self.on_address_change(change);
                Handled::Consumed
            }
        }
    }

    pub fn execute(&mut self, command: Command) {
        tracing::debug!(?command, "command");
        match command {
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::First => self.go_to_first(),
            Command::Last => self.go_to_last(),
            Command::GoTo(index) => self.go_to(index),
            Command::ToggleOverlay => self.toggle_overlay(),
        }
    }

    /// Move to `index`, re-render and record the position in the address.
    /// Out-of-range targets are ignored.
    pub fn go_to(&mut self, index: usize) {
        let Lifecycle::Initialized(session) = &mut self.lifecycle else {
            return;
        };
        if index >= session.slide_count() {
            tracing::trace!(index, slides = session.slide_count(), "go_to out of range");
            return;
        }
        session.position = index;
        render(session, &mut self.document, &self.notes);
        self.address.replace_fragment(address::slide_fragment(index));
    }

    pub fn next(&mut self) {
        let Some((position, count)) = self.cursor() else {
            return;
        };
        if position + 1 < count {
            self.go_to(position + 1);
        }
    }

    pub fn previous(&mut self) {
        let Some((position, _)) = self.cursor() else {
            return;
        };
        if position > 0 {
            self.go_to(position - 1);
        }
    }

    pub fn go_to_first(&mut self) {
        self.go_to(0);
    }

    pub fn go_to_last(&mut self) {
        if let Some((_, count)) = self.cursor() {
            if count > 0 {
                self.go_to(count - 1);
            }
        }
    }

    pub fn toggle_overlay(&mut self) {
        let Lifecycle::Initialized(session) = &mut self.lifecycle else {
            return;
        };
        session.overlay_visible = !session.overlay_visible;
        if let Some(overlay) = self.document.overlay.as_mut() {
            overlay.visible = session.overlay_visible;
        }
        refresh_overlay(session, &mut self.document, &self.notes);
    }

    /// Reconcile every queued address change. Internal changes are the
    /// navigator's own writes and are dropped.
    pub fn sync_address(&mut self) {
        for change in self.address.take_changes() {
            self.handle(Event::AddressChanged(change));
        }
    }

    fn on_address_change(&mut self, change: AddressChange) {
        if change.origin == Origin::Internal {
            tracing::trace!(fragment = ?change.fragment, "suppressed internal address change");
            return;
        }
        tracing::debug!(fragment = ?change.fragment, "external address change");
        self.reconcile(change.fragment.as_deref());
    }

    /// Adopt a valid `slide-<N>` fragment, keep the position otherwise, and
    /// always re-render.
    fn reconcile(&mut self, fragment: Option<&str>) {
        let Lifecycle::Initialized(session) = &mut self.lifecycle else {
            return;
        };
        match fragment.and_then(address::parse_slide_fragment) {
            Some(index) if index < session.slide_count() => session.position = index,
            Some(index) => tracing::debug!(index, "fragment out of range, keeping position"),
            None => {}
        }
        render(session, &mut self.document, &self.notes);
    }

    /// Apply timers that are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        let Lifecycle::Initialized(session) = &mut self.lifecycle else {
            return;
        };
        if session.fade_hints_at.is_some_and(|at| now >= at) {
            session.fade_hints_at = None;
            if let Some(hints) = self.document.hints.as_mut() {
                hints.opacity = HINT_FADED_OPACITY;
                tracing::debug!("navigation hints faded");
            }
        }
    }
}

fn render(session: &Session, document: &mut Document, notes: &AnnotationTable) {
    for (i, &container) in session.containers.iter().enumerate() {
        document.set_active(container, i == session.position);
    }

    let count = session.slide_count();
    if count > 0 {
        if let Some(progress) = document.progress.as_mut() {
            progress.fraction = (session.position + 1) as f32 / count as f32;
        }
        if let Some(counter) = document.counter.as_mut() {
            counter.text = format!("{} / {}", session.position + 1, count);
        }
    }

    refresh_overlay(session, document, notes);
}

fn refresh_overlay(session: &Session, document: &mut Document, notes: &AnnotationTable) {
    if !session.overlay_visible {
        return;
    }
    if let Some(overlay) = document.overlay.as_mut() {
        overlay.content = notes.resolve(session.position).to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Chrome, ContainerKind};
    use crate::notes::NOTES_PLACEHOLDER;
    use proptest::prelude::*;

    fn markdown(slides: usize) -> String {
        (0..slides)
            .map(|i| format!("# Slide {i}"))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }

    fn navigator_with(slides: usize, fragment: Option<&str>, notes: AnnotationTable) -> Navigator {
        let document = Document::from_markdown(&markdown(slides), Chrome::default());
        let address = Address::new("talk.yaml", fragment.map(str::to_string));
        let mut nav = Navigator::new(document, address, notes);
        assert!(nav.initialize(Instant::now()));
        nav
    }

    fn navigator(slides: usize) -> Navigator {
        navigator_with(slides, None, AnnotationTable::default())
    }

    fn active_indices(nav: &Navigator) -> Vec<usize> {
        nav.document().active_containers().map(|(i, _)| i).collect()
    }

    fn counter(nav: &Navigator) -> &str {
        &nav.document().counter.as_ref().unwrap().text
    }

    fn overlay(nav: &Navigator) -> &Overlay {
        nav.document().overlay.as_ref().unwrap()
    }

    #[test]
    fn test_initialize_renders_first_slide() {
        let nav = navigator(18);
        assert_eq!(nav.phase(), Phase::Initialized);
        assert_eq!(nav.position(), Some(0));
        assert_eq!(nav.slide_count(), 18);
        assert_eq!(active_indices(&nav), vec![0]);
        assert_eq!(counter(&nav), "1 / 18");
        assert_eq!(nav.address().fragment(), None);
        assert!(!overlay(&nav).visible);
    }

    #[test]
    fn test_ready_signal_initializes_loaded_document() {
        let document = Document::loading(Chrome::default());
        let mut nav = Navigator::new(
            document,
            Address::new("talk.yaml", None),
            AnnotationTable::default(),
        );
        let now = Instant::now();
        assert!(!nav.startup(now));
        assert_eq!(nav.handle(Event::Key(Key::ArrowRight)), Handled::Ignored);

        nav.document_mut().inject(&markdown(3));
        assert_eq!(
            nav.handle(Event::ContentReady { at: now }),
            Handled::Consumed
        );
        assert_eq!(nav.slide_count(), 3);
        assert_eq!(active_indices(&nav), vec![0]);
    }

    #[test]
    fn test_startup_with_static_content_initializes_once() {
        let document = Document::from_markdown(&markdown(4), Chrome::default());
        let mut nav = Navigator::new(
            document,
            Address::new("talk.md", None),
            AnnotationTable::default(),
        );
        let now = Instant::now();
        assert!(nav.startup(now));
        nav.go_to(2);
        nav.toggle_overlay();

        // A later ready signal must not reset anything
        assert_eq!(
            nav.handle(Event::ContentReady { at: now }),
            Handled::Ignored
        );
        assert!(!nav.initialize(now));
        assert_eq!(nav.position(), Some(2));
        assert!(nav.overlay_visible());
    }

    #[test]
    fn test_loading_placeholder_is_not_navigable() {
        let mut document = Document::loading(Chrome::default());
        document.inject_diagnostic("fetch failed");
        let mut nav = Navigator::new(
            document,
            Address::new("talk.yaml", Some("slide-4".into())),
            AnnotationTable::default(),
        );
        nav.handle(Event::ContentReady {
            at: Instant::now(),
        });
        assert_eq!(nav.slide_count(), 1);
        assert_eq!(nav.position(), Some(0));
        let (_, active) = nav.document().active_containers().next().unwrap();
        assert_eq!(active.kind, ContainerKind::Diagnostic);
        nav.next();
        assert_eq!(nav.position(), Some(0));
    }

    #[test]
    fn test_go_to_updates_address_without_history() {
        let mut nav = navigator(10);
        nav.go_to(4);
        assert_eq!(nav.position(), Some(4));
        assert_eq!(nav.address().fragment(), Some("slide-4"));
        assert!(!nav.address().can_go_back());
        assert_eq!(active_indices(&nav), vec![4]);
        assert_eq!(counter(&nav), "5 / 10");
        let progress = nav.document().progress.as_ref().unwrap().fraction;
        assert!((progress - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_go_to_out_of_range_is_noop() {
        let mut nav = navigator(5);
        nav.go_to(2);
        nav.go_to(5);
        nav.go_to(usize::MAX);
        assert_eq!(nav.position(), Some(2));
        assert_eq!(nav.address().fragment(), Some("slide-2"));
    }

    #[test]
    fn test_no_wraparound() {
        let mut nav = navigator(3);
        nav.previous();
        assert_eq!(nav.position(), Some(0));
        assert_eq!(nav.address().fragment(), None);
        nav.go_to_last();
        nav.next();
        assert_eq!(nav.position(), Some(2));
        nav.go_to_first();
        assert_eq!(nav.position(), Some(0));
    }

    #[test]
    fn test_own_address_writes_are_suppressed() {
        let mut nav = navigator(10);
        nav.go_to(4);
        nav.handle(Event::AddressChanged(AddressChange {
            fragment: Some("slide-1".into()),
            origin: Origin::Internal,
        }));
        assert_eq!(nav.position(), Some(4));

        nav.go_to(6);
        nav.go_to(7);
        nav.sync_address();
        assert_eq!(nav.position(), Some(7));
    }

    #[test]
    fn test_initial_fragment_is_adopted() {
        let nav = navigator_with(18, Some("#slide-5"), AnnotationTable::default());
        assert_eq!(nav.position(), Some(5));
        assert_eq!(counter(&nav), "6 / 18");
        assert_eq!(active_indices(&nav), vec![5]);
    }

    #[test]
    fn test_initial_fragment_out_of_range_defaults_to_first() {
        let nav = navigator_with(18, Some("slide-99"), AnnotationTable::default());
        assert_eq!(nav.position(), Some(0));
        assert_eq!(counter(&nav), "1 / 18");
    }

    #[test]
    fn test_external_change_reconciles_or_keeps_position() {
        let mut nav = navigator(18);
        nav.go_to(3);

        nav.address_mut().navigate(Some("slide-99".into()));
        nav.sync_address();
        assert_eq!(nav.position(), Some(3));
        assert_eq!(active_indices(&nav), vec![3]);

        nav.address_mut().navigate(Some("garbage".into()));
        nav.sync_address();
        assert_eq!(nav.position(), Some(3));

        nav.address_mut().navigate_to_input("talk.yaml#slide-11");
        nav.sync_address();
        assert_eq!(nav.position(), Some(11));
        assert_eq!(counter(&nav), "12 / 18");
    }

    #[test]
    fn test_history_back_and_forward() {
        let mut nav = navigator(10);
        nav.address_mut().navigate(Some("slide-2".into()));
        nav.address_mut().navigate(Some("slide-7".into()));
        nav.sync_address();
        assert_eq!(nav.position(), Some(7));

        nav.address_mut().back();
        nav.sync_address();
        assert_eq!(nav.position(), Some(2));

        nav.address_mut().back();
        nav.sync_address();
        // First entry had no fragment: keep position, still render
        assert_eq!(nav.position(), Some(2));
        assert_eq!(active_indices(&nav), vec![2]);

        nav.address_mut().forward();
        nav.address_mut().forward();
        nav.sync_address();
        assert_eq!(nav.position(), Some(7));
    }

    #[test]
    fn test_digit_zero_jumps_to_tenth_slide() {
        for start in [0, 4, 9, 15] {
            let mut nav = navigator(18);
            nav.go_to(start);
            assert_eq!(nav.handle(Event::Key(Key::Digit(0))), Handled::Consumed);
            assert_eq!(nav.position(), Some(9));
        }
    }

    #[test]
    fn test_digit_beyond_slide_count_is_consumed_noop() {
        let mut nav = navigator(3);
        assert_eq!(nav.handle(Event::Key(Key::Digit(7))), Handled::Consumed);
        assert_eq!(nav.position(), Some(0));
        assert_eq!(nav.handle(Event::Key(Key::Digit(2))), Handled::Consumed);
        assert_eq!(nav.position(), Some(1));
    }

    #[test]
    fn test_unmapped_keys_are_not_consumed() {
        let mut nav = navigator(3);
        assert_eq!(nav.handle(Event::Key(Key::Char('x'))), Handled::Ignored);
        assert_eq!(nav.handle(Event::Key(Key::Escape)), Handled::Ignored);
    }

    #[test]
    fn test_overlay_shows_placeholder_then_entry() {
        let notes: AnnotationTable = [(5, "Hippocampus notes".to_string())]
            .into_iter()
            .collect();
        let mut nav = navigator_with(18, None, notes);

        nav.go_to(3);
        nav.handle(Event::Key(Key::Char('s')));
        assert!(overlay(&nav).visible);
        assert_eq!(overlay(&nav).content, NOTES_PLACEHOLDER);

        nav.handle(Event::Key(Key::Char('S')));
        assert!(!overlay(&nav).visible);
        nav.go_to(5);
        nav.toggle_overlay();
        assert_eq!(overlay(&nav).content, "Hippocampus notes");
    }

    #[test]
    fn test_overlay_follows_position_while_visible() {
        let notes: AnnotationTable = [(0, "zero".to_string()), (1, "one".to_string())]
            .into_iter()
            .collect();
        let mut nav = navigator_with(3, None, notes);
        nav.toggle_overlay();
        assert_eq!(overlay(&nav).content, "zero");
        nav.next();
        assert_eq!(overlay(&nav).content, "one");
        nav.next();
        assert_eq!(overlay(&nav).content, NOTES_PLACEHOLDER);
    }

    #[test]
    fn test_hidden_overlay_is_not_refreshed() {
        let notes: AnnotationTable = [(1, "one".to_string())].into_iter().collect();
        let mut nav = navigator_with(3, None, notes);
        nav.go_to(1);
        nav.toggle_overlay();
        nav.toggle_overlay();
        nav.go_to(2);
        assert!(!overlay(&nav).visible);
        assert_eq!(overlay(&nav).content, "one");
    }

    #[test]
    fn test_escape_dismisses_visible_overlay() {
        let mut nav = navigator(3);
        nav.toggle_overlay();
        assert_eq!(nav.handle(Event::Key(Key::Escape)), Handled::Consumed);
        assert!(!nav.overlay_visible());
        assert_eq!(nav.handle(Event::Key(Key::Escape)), Handled::Ignored);
        assert!(!nav.overlay_visible());
    }

    #[test]
    fn test_swipe_gestures() {
        let mut nav = navigator(5);
        nav.handle(Event::PointerDown { x: 400.0 });
        assert_eq!(nav.handle(Event::PointerUp { x: 380.0 }), Handled::Ignored);
        assert_eq!(nav.position(), Some(0));

        nav.handle(Event::PointerDown { x: 400.0 });
        assert_eq!(nav.handle(Event::PointerUp { x: 300.0 }), Handled::Consumed);
        assert_eq!(nav.position(), Some(1));

        nav.handle(Event::PointerDown { x: 100.0 });
        nav.handle(Event::PointerUp { x: 150.0 });
        assert_eq!(nav.position(), Some(0));

        nav.handle(Event::PointerDown { x: 400.0 });
        nav.handle(Event::PointerCancel);
        assert_eq!(nav.handle(Event::PointerUp { x: 100.0 }), Handled::Ignored);
        assert_eq!(nav.position(), Some(0));
    }

    #[test]
    fn test_hint_fade_is_one_shot() {
        let document = Document::from_markdown(&markdown(3), Chrome::default());
        let mut nav = Navigator::new(
            document,
            Address::new("talk.md", None),
            AnnotationTable::default(),
        );
        let start = Instant::now();
        nav.initialize(start);
        assert_eq!(nav.next_deadline(), Some(start + HINT_FADE_DELAY));

        nav.tick(start + Duration::from_secs(1));
        assert_eq!(nav.document().hints.as_ref().unwrap().opacity, 1.0);

        nav.handle(Event::Tick(start + HINT_FADE_DELAY));
        assert_eq!(
            nav.document().hints.as_ref().unwrap().opacity,
            HINT_FADED_OPACITY
        );
        assert_eq!(nav.next_deadline(), None);
        assert_eq!(nav.position(), Some(0));
    }

    #[test]
    fn test_missing_chrome_is_skipped() {
        let chrome = Chrome {
            progress: false,
            counter: false,
            hints: false,
        };
        let document = Document::from_markdown(&markdown(4), chrome);
        let mut nav = Navigator::new(
            document,
            Address::new("talk.md", None),
            AnnotationTable::default(),
        );
        let start = Instant::now();
        nav.initialize(start);
        nav.go_to(3);
        nav.tick(start + HINT_FADE_DELAY);
        assert_eq!(nav.position(), Some(3));
        assert!(nav.document().counter.is_none());
        assert!(nav.document().hints.is_none());
    }

    #[test]
    fn test_teardown_stops_input_and_timers() {
        let mut nav = navigator(4);
        nav.teardown();
        assert_eq!(nav.phase(), Phase::TornDown);
        assert_eq!(nav.handle(Event::Key(Key::ArrowRight)), Handled::Ignored);
        nav.tick(Instant::now() + HINT_FADE_DELAY);
        nav.address_mut().navigate(Some("slide-2".into()));
        nav.sync_address();
        assert_eq!(nav.position(), None);
        assert!(!nav.initialize(Instant::now()));
    }

    #[test]
    fn test_expected_slide_mismatch_still_uses_containers() {
        let document = Document::from_markdown(&markdown(4), Chrome::default());
        let mut nav = Navigator::new(
            document,
            Address::new("talk.yaml", None),
            AnnotationTable::default(),
        )
        .with_expected_slides(Some(17));
        nav.initialize(Instant::now());
        assert_eq!(nav.slide_count(), 4);
        nav.go_to(10);
        assert_eq!(nav.position(), Some(0));
    }

    #[derive(Debug, Clone)]
    enum Step {
        Next,
        Previous,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Next), Just(Step::Previous)]
    }

    proptest! {
        #[test]
        fn stepping_stays_in_range_without_wrapping(
            slides in 1usize..25,
            steps in prop::collection::vec(step(), 0..200),
        ) {
            let mut nav = navigator(slides);
            for s in steps {
                let before = nav.position().unwrap();
                match s {
                    Step::Next => {
                        nav.next();
                        let expected = if before + 1 < slides { before + 1 } else { before };
                        prop_assert_eq!(nav.position(), Some(expected));
                    }
                    Step::Previous => {
                        nav.previous();
                        prop_assert_eq!(nav.position(), Some(before.saturating_sub(1)));
                    }
                }
                let position = nav.position().unwrap();
                prop_assert!(position < slides);
                prop_assert_eq!(active_indices(&nav), vec![position]);
            }
        }

        #[test]
        fn go_to_changes_position_iff_in_range(
            slides in 1usize..25,
            start in 0usize..25,
            target in 0usize..60,
        ) {
            let mut nav = navigator(slides);
            nav.go_to(start);
            let before = nav.position().unwrap();
            nav.go_to(target);
            if target < slides {
                prop_assert_eq!(nav.position(), Some(target));
                let fragment = address::slide_fragment(target);
                prop_assert_eq!(nav.address().fragment(), Some(fragment.as_str()));
                prop_assert_eq!(active_indices(&nav), vec![target]);
            } else {
                prop_assert_eq!(nav.position(), Some(before));
            }
        }
    }
}
