// Tractyl Keyboard State
// Owns every piece of runtime state for one half and routes host events

use std::fmt;

use crate::command::{Command, CommandKind, ModeFlag};
use crate::config::{ConfigStore, PointerConfig, Storage, Tunables};
use crate::dpi::{self, DpiCurve};
use crate::output::{HostOutput, PointingSensor};
use crate::pointer::{MotionEngine, MotionSample, MouseReport, PointerMode};
use crate::sticky::{DanceOutcome, DanceState, StickyArbiter, StickyRole};
use crate::sync::{self, SplitLink, SyncBridge};
use crate::{Action, Keycode};

/// Which side of the split keyboard this state runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HalfRole {
    /// Owns the config and pushes it over the split link
    Primary,
    /// Mirrors whatever the primary sends
    Secondary,
}

impl fmt::Display for HalfRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalfRole::Primary => write!(f, "primary"),
            HalfRole::Secondary => write!(f, "secondary"),
        }
    }
}

/// Runtime state of one keyboard half.
///
/// Every config mutation made through this type re-applies the sensor DPI,
/// so the sensor always runs at [`KeyboardState::sensor_dpi`].
#[derive(Debug)]
pub struct KeyboardState<S: Storage> {
    config: PointerConfig,
    store: ConfigStore<S>,
    tunables: Tunables,
    engine: MotionEngine,
    sticky: StickyArbiter,
    sync: SyncBridge,
    role: HalfRole,
    now_ms: u32,
}

impl<S: Storage> KeyboardState<S> {
    /// Load the persisted config (transient flags off)
    pub fn new(storage: S, tunables: Tunables, role: HalfRole) -> Self {
        let store = ConfigStore::new(storage);
        let config = store.load();
        log::debug!("{} half starting with config {:?}", role, config);
        Self {
            config,
            store,
            tunables,
            engine: MotionEngine::new(),
            sticky: StickyArbiter::new(tunables.sticky),
            sync: SyncBridge::new(tunables.sync.interval_ms),
            role,
            now_ms: 0,
        }
    }

    /// Push the initial DPI to the sensor
    pub fn init<P: PointingSensor>(&mut self, sensor: &mut P) {
        self.apply_dpi(sensor);
    }

    pub fn config(&self) -> &PointerConfig {
        &self.config
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn role(&self) -> HalfRole {
        self.role
    }

    pub fn sticky(&self) -> &StickyArbiter {
        &self.sticky
    }

    pub fn engine(&self) -> &MotionEngine {
        &self.engine
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore<S> {
        &mut self.store
    }

    /// Time of the last housekeeping tick
    pub fn now_ms(&self) -> u32 {
        self.now_ms
    }

    pub fn pointer_mode(&self) -> PointerMode {
        PointerMode::from_config(&self.config)
    }

    /// DPI the sensor should currently run at
    pub fn sensor_dpi(&self) -> u16 {
        dpi::sensor_dpi(&self.config, &self.tunables.dpi)
    }

    pub fn effective_dpi(&self, curve: DpiCurve) -> u16 {
        dpi::effective_dpi(&self.config, &self.tunables.dpi, curve)
    }

    fn apply_dpi<P: PointingSensor>(&self, sensor: &mut P) {
        sensor.set_cpi(self.sensor_dpi());
    }

    // --- DPI ---

    /// Step the default curve and persist
    pub fn cycle_default_dpi<P: PointingSensor>(&mut self, forward: bool, sensor: &mut P) {
        self.cycle_default_dpi_noeeprom(forward, sensor);
        self.store.save(&self.config);
    }

    pub fn cycle_default_dpi_noeeprom<P: PointingSensor>(&mut self, forward: bool, sensor: &mut P) {
        dpi::step(&mut self.config, &self.tunables.dpi, DpiCurve::Default, forward);
        self.apply_dpi(sensor);
    }

    /// Step the sniping curve and persist
    pub fn cycle_sniping_dpi<P: PointingSensor>(&mut self, forward: bool, sensor: &mut P) {
        self.cycle_sniping_dpi_noeeprom(forward, sensor);
        self.store.save(&self.config);
    }

    pub fn cycle_sniping_dpi_noeeprom<P: PointingSensor>(&mut self, forward: bool, sensor: &mut P) {
        dpi::step(&mut self.config, &self.tunables.dpi, DpiCurve::Sniping, forward);
        self.apply_dpi(sensor);
    }

    // --- modes ---

    pub fn set_mode<P: PointingSensor>(&mut self, flag: ModeFlag, enable: bool, sensor: &mut P) {
        match flag {
            ModeFlag::Sniping => self.config.set_sniping(enable),
            ModeFlag::DragScroll => self.config.set_dragscroll(enable),
            ModeFlag::Caret => self.config.set_caret(enable),
            ModeFlag::Custom => self.config.set_custom(enable),
            ModeFlag::ModeSelect => self.config.set_mode_select(enable),
            ModeFlag::Integration => self.config.set_integration(enable),
        }
        log::debug!("{:?} {}", flag, if enable { "on" } else { "off" });
        self.apply_dpi(sensor);
    }

    pub fn is_mode(&self, flag: ModeFlag) -> bool {
        match flag {
            ModeFlag::Sniping => self.config.is_sniping(),
            ModeFlag::DragScroll => self.config.is_dragscroll(),
            ModeFlag::Caret => self.config.is_caret(),
            ModeFlag::Custom => self.config.is_custom(),
            ModeFlag::ModeSelect => self.config.is_mode_select(),
            ModeFlag::Integration => self.config.is_integration(),
        }
    }

    pub fn toggle_mode<P: PointingSensor>(&mut self, flag: ModeFlag, sensor: &mut P) {
        let enable = !self.is_mode(flag);
        self.set_mode(flag, enable, sensor);
    }

    /// Handle a pointer command key. Holding shift reverses DPI steps.
    pub fn process_command<O: HostOutput, P: PointingSensor>(
        &mut self,
        command: Command,
        action: Action,
        out: &O,
        sensor: &mut P,
    ) {
        match command.kind() {
            CommandKind::Dpi { curve, forward } => {
                if !action.is_pressed() {
                    return;
                }
                let forward = forward != out.mods().has_shift();
                match curve {
                    DpiCurve::Default => self.cycle_default_dpi(forward, sensor),
                    DpiCurve::Sniping => self.cycle_sniping_dpi(forward, sensor),
                }
            }
            CommandKind::Momentary(flag) => self.set_mode(flag, action.is_pressed(), sensor),
            CommandKind::Toggle(flag) => {
                if action.is_pressed() {
                    self.toggle_mode(flag, sensor);
                }
            }
        }
    }

    // --- motion ---

    pub fn process_motion<O: HostOutput, P: PointingSensor>(
        &mut self,
        sample: MotionSample,
        out: &mut O,
        sensor: &mut P,
    ) -> MouseReport {
        let before = self.config;
        let report = self.engine.process(&mut self.config, &self.tunables, sample, out);
        if self.config != before {
            self.apply_dpi(sensor);
        }
        report
    }

    // --- sticky keys ---

    pub fn dance_finished<O: HostOutput, P: PointingSensor>(
        &mut self,
        role: StickyRole,
        state: &DanceState,
        out: &mut O,
        sensor: &mut P,
    ) -> DanceOutcome {
        let before = self.config;
        let outcome = self.sticky.finished(role, state, self.now_ms, &mut self.config, out);
        self.apply_if_changed(before, sensor);
        outcome
    }

    pub fn dance_reset<O: HostOutput, P: PointingSensor>(
        &mut self,
        role: StickyRole,
        out: &mut O,
        sensor: &mut P,
    ) {
        let before = self.config;
        self.sticky.reset(role, &mut self.config, out);
        self.apply_if_changed(before, sensor);
    }

    /// Ordinary key hook; completes a tapped sticky sequence
    pub fn process_key<O: HostOutput, P: PointingSensor>(
        &mut self,
        keycode: Keycode,
        action: Action,
        out: &mut O,
        sensor: &mut P,
    ) {
        let before = self.config;
        self.sticky.on_key_event(keycode, action, &mut self.config, out);
        self.apply_if_changed(before, sensor);
    }

    pub fn activate_stkeys<O: HostOutput, P: PointingSensor>(
        &mut self,
        out: &mut O,
        sensor: &mut P,
    ) {
        let before = self.config;
        self.sticky.activate_stkeys(&mut self.config, out);
        self.apply_if_changed(before, sensor);
    }

    pub fn unstick_keys<O: HostOutput, P: PointingSensor>(&mut self, out: &mut O, sensor: &mut P) {
        let before = self.config;
        self.sticky.unstick_keys(&mut self.config, out);
        self.apply_if_changed(before, sensor);
    }

    fn apply_if_changed<P: PointingSensor>(&self, before: PointerConfig, sensor: &mut P) {
        if self.config != before {
            self.apply_dpi(sensor);
        }
    }

    // --- housekeeping and sync ---

    /// Periodic tick: split sync (primary only) and sticky timeout
    pub fn housekeeping<L: SplitLink, O: HostOutput, P: PointingSensor>(
        &mut self,
        now_ms: u32,
        link: &mut L,
        out: &mut O,
        sensor: &mut P,
    ) {
        self.now_ms = now_ms;
        let before = self.config;
        self.sticky.tick(now_ms, &mut self.config, out);
        self.apply_if_changed(before, sensor);

        if self.role == HalfRole::Primary {
            self.sync.housekeeping(now_ms, &self.config, link);
        }
    }

    /// Take a config pushed by the other half. Returns false when the
    /// payload was dropped.
    pub fn receive_sync<P: PointingSensor>(&mut self, payload: &[u8], sensor: &mut P) -> bool {
        match sync::handle_sync(payload) {
            Some(config) => {
                self.config = config;
                self.apply_dpi(sensor);
                true
            }
            None => false,
        }
    }

    // --- persistence ---

    /// Write the config as it is now, transient flags included
    pub fn save(&mut self) {
        self.store.save(&self.config);
    }

    pub fn reset_to_default<P: PointingSensor>(&mut self, sensor: &mut P) {
        self.config = self.store.reset_to_default();
        self.engine.reset();
        self.apply_dpi(sensor);
    }
}
