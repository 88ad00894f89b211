// Tractyl Sticky Roles
// The tap-dance keys and what each one holds down

use strum_macros::{Display, EnumIter, EnumString};

use crate::config::StickyTunables;
use crate::{Layer, ModMask, Modifier};

/// Number of sticky roles
pub const ROLE_COUNT: usize = 7;

/// A tap-dance key with sticky behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StickyRole {
    Alt,
    Shift,
    Ctrl,
    Gui,
    Raise,
    Lower,
    Escape,
}

/// What a role applies once activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleTarget {
    Modifier(Modifier),
    Layer(Layer),
    /// Escape holds nothing; it only taps ESC
    None,
}

impl StickyRole {
    /// Slot in per-role tables
    pub fn index(self) -> usize {
        match self {
            StickyRole::Alt => 0,
            StickyRole::Shift => 1,
            StickyRole::Ctrl => 2,
            StickyRole::Gui => 3,
            StickyRole::Raise => 4,
            StickyRole::Lower => 5,
            StickyRole::Escape => 6,
        }
    }

    pub fn target(self, sticky: &StickyTunables) -> RoleTarget {
        match self {
            StickyRole::Alt => RoleTarget::Modifier(Modifier::Alt),
            StickyRole::Shift => RoleTarget::Modifier(Modifier::Shift),
            StickyRole::Ctrl => RoleTarget::Modifier(Modifier::Ctrl),
            StickyRole::Gui => RoleTarget::Modifier(Modifier::Gui),
            StickyRole::Raise => RoleTarget::Layer(sticky.raise_layer),
            StickyRole::Lower => RoleTarget::Layer(sticky.lower_layer),
            StickyRole::Escape => RoleTarget::None,
        }
    }

    /// Modifier bit, for the modifier roles
    pub fn mod_mask(self) -> Option<ModMask> {
        match self {
            StickyRole::Alt => Some(ModMask::LALT),
            StickyRole::Shift => Some(ModMask::LSFT),
            StickyRole::Ctrl => Some(ModMask::LCTL),
            StickyRole::Gui => Some(ModMask::LGUI),
            _ => None,
        }
    }

    /// Whether the role takes part in one-shot activation
    pub fn is_sticky(self) -> bool {
        self != StickyRole::Escape
    }

    pub fn is_layer(self) -> bool {
        matches!(self, StickyRole::Raise | StickyRole::Lower)
    }
}
