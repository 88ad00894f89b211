// Tractyl Modifier Masks
// HID modifier bits registered by sticky keys

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use strum_macros::{Display, EnumIter};

/// Left-hand modifiers the sticky layer can hold down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Modifier {
    #[strum(serialize = "LCTL")]
    Ctrl,
    #[strum(serialize = "LSFT")]
    Shift,
    #[strum(serialize = "LALT")]
    Alt,
    #[strum(serialize = "LGUI")]
    Gui,
}

impl Modifier {
    /// Bit in the HID modifier byte
    pub fn bit(self) -> ModMask {
        match self {
            Modifier::Ctrl => ModMask::LCTL,
            Modifier::Shift => ModMask::LSFT,
            Modifier::Alt => ModMask::LALT,
            Modifier::Gui => ModMask::LGUI,
        }
    }
}

/// HID modifier byte (left modifiers in the low nibble, right in the high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModMask(pub u8);

impl ModMask {
    pub const NONE: ModMask = ModMask(0x00);
    pub const LCTL: ModMask = ModMask(0x01);
    pub const LSFT: ModMask = ModMask(0x02);
    pub const LALT: ModMask = ModMask(0x04);
    pub const LGUI: ModMask = ModMask(0x08);
    pub const RCTL: ModMask = ModMask(0x10);
    pub const RSFT: ModMask = ModMask(0x20);
    pub const RALT: ModMask = ModMask(0x40);
    pub const RGUI: ModMask = ModMask(0x80);

    /// Either shift key
    pub const SHIFT: ModMask = ModMask(0x22);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any bit of `other` is set in `self`
    pub fn intersects(self, other: ModMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, other: ModMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ModMask) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ModMask) {
        self.0 &= !other.0;
    }

    /// True if either shift is held
    pub fn has_shift(self) -> bool {
        self.intersects(ModMask::SHIFT)
    }
}

impl BitOr for ModMask {
    type Output = ModMask;

    fn bitor(self, rhs: ModMask) -> ModMask {
        ModMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModMask {
    fn bitor_assign(&mut self, rhs: ModMask) {
        self.0 |= rhs.0;
    }
}

impl From<Modifier> for ModMask {
    fn from(modifier: Modifier) -> Self {
        modifier.bit()
    }
}

impl fmt::Display for ModMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}
