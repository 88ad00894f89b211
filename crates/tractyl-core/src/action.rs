use std::fmt;

/// Edge of a key event as delivered by the key-dispatch framework.
///
/// The firmware only reports press and release; auto-repeat is generated
/// host-side, so there is no repeat edge here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
}

impl Action {
    /// Returns true for a press edge
    pub fn is_pressed(self) -> bool {
        matches!(self, Action::Press)
    }

    /// Returns true for a release edge
    pub fn is_released(self) -> bool {
        matches!(self, Action::Release)
    }

    /// Build an Action from the `pressed` bit of a key record
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            Action::Press
        } else {
            Action::Release
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "release"),
            Action::Press => write!(f, "press"),
        }
    }
}
