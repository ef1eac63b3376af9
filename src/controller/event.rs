use chrono::{DateTime, Local};
use std::fmt;

// Event category as reported by the device event source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Sync,
    Misc,
    Key,
    Absolute,
    Relative,
    // Any other category (force feedback, LEDs, ...), dispatched like Key/Absolute
    Other,
}

impl EventKind {
    /// Sync and Misc events carry protocol structure, not control changes.
    pub fn is_structural(&self) -> bool {
        matches!(self, EventKind::Sync | EventKind::Misc)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Sync => write!(f, "Sync"),
            EventKind::Misc => write!(f, "Misc"),
            EventKind::Key => write!(f, "Key"),
            EventKind::Absolute => write!(f, "Absolute"),
            EventKind::Relative => write!(f, "Relative"),
            EventKind::Other => write!(f, "Other"),
        }
    }
}

/// A single decoded device event: category, evdev-style code name and raw value.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    pub code: String,
    pub state: i32,
    pub timestamp: DateTime<Local>,
}

impl InputEvent {
    pub fn new(kind: EventKind, code: impl Into<String>, state: i32) -> Self {
        Self {
            kind,
            code: code.into(),
            state,
            timestamp: Local::now(),
        }
    }

    pub fn key(code: impl Into<String>, state: i32) -> Self {
        Self::new(EventKind::Key, code, state)
    }

    pub fn absolute(code: impl Into<String>, state: i32) -> Self {
        Self::new(EventKind::Absolute, code, state)
    }

    pub fn sync() -> Self {
        Self::new(EventKind::Sync, "SYN_REPORT", 0)
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}={} at {}",
            self.kind,
            self.code,
            self.state,
            self.timestamp.format("%H:%M:%S.%3f")
        )
    }
}
