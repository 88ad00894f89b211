// Tractyl Keycode Type
// HID usage codes emitted by caret/custom modes and sticky taps

use std::fmt;
use std::str::FromStr;

/// A single HID keyboard/consumer usage emitted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Keycode(pub u16);

impl Keycode {
    pub fn code(self) -> u16 {
        self.0
    }

    /// Name from the keycode table, "UNKNOWN" when not listed
    pub fn name(self) -> &'static str {
        keycode_name(self.0)
    }
}

impl From<u16> for Keycode {
    fn from(code: u16) -> Self {
        Keycode(code)
    }
}

impl From<Keycode> for u16 {
    fn from(keycode: Keycode) -> Self {
        keycode.0
    }
}

impl fmt::Display for Keycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Keycode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        keycode_from_name(s).ok_or_else(|| format!("Unknown keycode: {}", s))
    }
}

// KC_ constants and the NAMED table come from keycodes.tbl
include!(concat!(env!("OUT_DIR"), "/keycode_table.rs"));

pub const KC_A: Keycode = Keycode(0x04);
pub const KC_Z: Keycode = Keycode(0x1D);
pub const KC_1: Keycode = Keycode(0x1E);
pub const KC_0: Keycode = Keycode(0x27);

const LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

// HID orders digits 1..9 then 0
const DIGITS: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

const FUNCTION_KEYS: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

/// Display name for a keycode
pub fn keycode_name(code: u16) -> &'static str {
    match code {
        0x04..=0x1D => LETTERS[(code - 0x04) as usize],
        0x1E..=0x27 => DIGITS[(code - 0x1E) as usize],
        0x3A..=0x45 => FUNCTION_KEYS[(code - 0x3A) as usize],
        _ => NAMED
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(name, _)| *name)
            .unwrap_or("UNKNOWN"),
    }
}

/// Look up a keycode by name
///
/// Accepts an optional `KC_` prefix and is case-insensitive, so both
/// `KC_VOLU` and `volume_up` resolve.
pub fn keycode_from_name(name: &str) -> Option<Keycode> {
    let upper = name.trim().to_uppercase();
    let bare = upper.strip_prefix("KC_").unwrap_or(upper.as_str());

    if let Some(i) = LETTERS.iter().position(|l| *l == bare) {
        return Some(Keycode(0x04 + i as u16));
    }
    if let Some(i) = DIGITS.iter().position(|d| *d == bare) {
        return Some(Keycode(0x1E + i as u16));
    }
    if let Some(i) = FUNCTION_KEYS.iter().position(|f| *f == bare) {
        return Some(Keycode(0x3A + i as u16));
    }
    NAMED
        .iter()
        .find(|(n, _)| *n == bare)
        .map(|(_, code)| Keycode(*code))
}
