// Tractyl Output Layer
// Seams towards the host report stream and the pointing sensor

mod recorder;

pub use recorder::{RecordingOutput, RecordingSensor};

use std::fmt;

use crate::{Keycode, Layer, ModMask};

/// Everything the core can ask of the host-facing side
pub trait HostOutput {
    /// Press and immediately release a key
    fn tap_code(&mut self, keycode: Keycode);
    fn register_mods(&mut self, mods: ModMask);
    fn unregister_mods(&mut self, mods: ModMask);
    fn layer_on(&mut self, layer: Layer);
    fn layer_off(&mut self, layer: Layer);
    /// Modifiers currently held on the host report
    fn mods(&self) -> ModMask;
}

/// The optical sensor's sensitivity register
pub trait PointingSensor {
    fn set_cpi(&mut self, cpi: u16);
}

/// One observable side effect, as recorded by [`RecordingOutput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Tap(Keycode),
    RegisterMods(ModMask),
    UnregisterMods(ModMask),
    LayerOn(Layer),
    LayerOff(Layer),
}

impl fmt::Display for OutputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputEvent::Tap(keycode) => write!(f, "tap {}", keycode),
            OutputEvent::RegisterMods(mods) => write!(f, "register mods {}", mods),
            OutputEvent::UnregisterMods(mods) => write!(f, "unregister mods {}", mods),
            OutputEvent::LayerOn(layer) => write!(f, "{} on", layer),
            OutputEvent::LayerOff(layer) => write!(f, "{} off", layer),
        }
    }
}
