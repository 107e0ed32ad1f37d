//! Platform-neutral keys and gestures, and the mapping to navigation commands.

/// Minimum horizontal travel, in points, for a press/release pair to count
/// as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Space,
    Home,
    End,
    Escape,
    Digit(u8),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    First,
    Last,
    GoTo(usize),
    ToggleOverlay,
}

/// Map a key press to a command. Escape only maps while the overlay is
/// visible; unmapped keys return `None` and keep their default handling.
pub fn command_for_key(key: Key, overlay_visible: bool) -> Option<Command> {
    match key {
        Key::ArrowRight | Key::ArrowDown | Key::Space | Key::PageDown => Some(Command::Next),
        Key::ArrowLeft | Key::ArrowUp | Key::PageUp => Some(Command::Previous),
        Key::Home => Some(Command::First),
        Key::End => Some(Command::Last),
        Key::Char('s' | 'S') => Some(Command::ToggleOverlay),
        Key::Escape if overlay_visible => Some(Command::ToggleOverlay),
        // 0 jumps to the tenth slide
        Key::Digit(0) => Some(Command::GoTo(9)),
        Key::Digit(d @ 1..=9) => Some(Command::GoTo(usize::from(d) - 1)),
        _ => None,
    }
}

/// Turns a press/release pair into at most one swipe command.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start_x: Option<f32>,
}

impl SwipeTracker {
    pub fn begin(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the gesture. Travelling left (finger moves towards smaller x)
    /// advances, travelling right goes back.
    pub fn end(&mut self, x: f32) -> Option<Command> {
        let start = self.start_x.take()?;
        let diff = start - x;
        if diff.abs() < SWIPE_THRESHOLD {
            None
        } else if diff > 0.0 {
            Some(Command::Next)
        } else {
            Some(Command::Previous)
        }
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}
