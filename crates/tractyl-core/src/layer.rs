// Tractyl Layers
// Index into the external keymap's layer stack

use std::fmt;

/// A keymap layer index. The layer tables themselves live outside the core;
/// the sticky layer only needs to switch them on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Layer(pub u8);

impl Layer {
    pub fn index(self) -> u8 {
        self.0
    }
}

impl From<u8> for Layer {
    fn from(index: u8) -> Self {
        Layer(index)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer{}", self.0)
    }
}
