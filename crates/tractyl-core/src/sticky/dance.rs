// Tractyl Tap-Dance Classification

use std::fmt;

/// Snapshot of a tap-dance sequence at resolution time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DanceState {
    /// Number of presses in the sequence
    pub count: u8,
    /// Whether the key is still down
    pub pressed: bool,
    /// Whether another key interrupted the sequence
    pub interrupted: bool,
}

impl DanceState {
    /// One press, released before resolution
    pub fn tap() -> Self {
        Self {
            count: 1,
            pressed: false,
            interrupted: false,
        }
    }

    /// One press, still held at resolution
    pub fn hold() -> Self {
        Self {
            count: 1,
            pressed: true,
            interrupted: false,
        }
    }
}

/// How a tap-dance sequence resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanceOutcome {
    SingleTap,
    SingleHold,
    /// Any multi-press sequence; carries the press count
    Other(u8),
}

impl DanceOutcome {
    /// Only the press state matters for a single press; interruption
    /// and elapsed time are ignored.
    pub fn classify(state: &DanceState) -> Self {
        if state.count == 1 {
            if state.pressed {
                DanceOutcome::SingleHold
            } else {
                DanceOutcome::SingleTap
            }
        } else {
            DanceOutcome::Other(state.count)
        }
    }
}

impl fmt::Display for DanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DanceOutcome::SingleTap => write!(f, "single tap"),
            DanceOutcome::SingleHold => write!(f, "single hold"),
            DanceOutcome::Other(count) => write!(f, "{} presses", count),
        }
    }
}
