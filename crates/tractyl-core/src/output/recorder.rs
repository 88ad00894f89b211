// Tractyl Recording Output
// Host/sensor doubles that remember what the core asked for

use smallvec::SmallVec;

use super::{HostOutput, OutputEvent, PointingSensor};
use crate::{Keycode, Layer, ModMask};

/// Records output events and tracks the resulting host state
/// (held modifiers, active layers)
#[derive(Debug, Clone, Default)]
pub struct RecordingOutput {
    events: Vec<OutputEvent>,
    mods: ModMask,
    /// Modifiers held by something other than the core (a physical shift)
    external_mods: ModMask,
    layers: SmallVec<[Layer; 4]>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events since creation or the last `take_events`
    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<OutputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Keys tapped, in order
    pub fn taps(&self) -> Vec<Keycode> {
        self.events
            .iter()
            .filter_map(|e| match e {
                OutputEvent::Tap(keycode) => Some(*keycode),
                _ => None,
            })
            .collect()
    }

    /// Modifiers registered by the core
    pub fn registered_mods(&self) -> ModMask {
        self.mods
    }

    pub fn is_layer_on(&self, layer: Layer) -> bool {
        self.layers.contains(&layer)
    }

    pub fn active_layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Pretend the user physically holds `mods`
    pub fn hold_external_mods(&mut self, mods: ModMask) {
        self.external_mods = mods;
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl HostOutput for RecordingOutput {
    fn tap_code(&mut self, keycode: Keycode) {
        self.events.push(OutputEvent::Tap(keycode));
    }

    fn register_mods(&mut self, mods: ModMask) {
        self.mods.insert(mods);
        self.events.push(OutputEvent::RegisterMods(mods));
    }

    fn unregister_mods(&mut self, mods: ModMask) {
        self.mods.remove(mods);
        self.events.push(OutputEvent::UnregisterMods(mods));
    }

    fn layer_on(&mut self, layer: Layer) {
        if !self.layers.contains(&layer) {
            self.layers.push(layer);
        }
        self.events.push(OutputEvent::LayerOn(layer));
    }

    fn layer_off(&mut self, layer: Layer) {
        self.layers.retain(|l| *l != layer);
        self.events.push(OutputEvent::LayerOff(layer));
    }

    fn mods(&self) -> ModMask {
        self.mods | self.external_mods
    }
}

/// Records every CPI write
#[derive(Debug, Clone, Default)]
pub struct RecordingSensor {
    writes: Vec<u16>,
}

impl RecordingSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent CPI, if any was ever set
    pub fn cpi(&self) -> Option<u16> {
        self.writes.last().copied()
    }

    pub fn writes(&self) -> &[u16] {
        &self.writes
    }
}

impl PointingSensor for RecordingSensor {
    fn set_cpi(&mut self, cpi: u16) {
        self.writes.push(cpi);
    }
}
