// Tractyl Sticky Key Arbiter
// Tap-dance driven sticky modifiers and layers
//
// Each role resolves a tap-dance sequence into a tap or a hold:
// - hold: the role (and anything still pending) applies until the dance resets
// - tap: the role stays pending and arms a one-shot; the next ordinary key
//   press applies it and that key's release drops the roles it applied
// Layer roles turn their layer on as soon as the dance resolves.

pub mod dance;
pub mod role;

pub use dance::{DanceOutcome, DanceState};
pub use role::{RoleTarget, StickyRole, ROLE_COUNT};

use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::config::{PointerConfig, StickyTunables};
use crate::keycode::{Keycode, KC_ESCAPE};
use crate::output::HostOutput;
use crate::Action;

/// Where a role is in its sticky lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolePhase {
    #[default]
    Idle,
    /// Resolved as a tap, waiting for the next key
    TapResolved,
    /// Modifier registered or layer on
    HoldActive,
    /// Released by `unstick_keys`
    Unstuck,
}

#[derive(Debug, Clone, Copy, Default)]
struct RoleState {
    phase: RolePhase,
    /// Apply on the next `activate_stkeys`
    pending: bool,
    /// Modifier registered / layer on
    active: bool,
    /// Outcome of the last resolved dance, consulted by `reset`
    outcome: Option<DanceOutcome>,
}

/// Sticky key state for every role.
///
/// `is_active(role)` is true exactly while the role's modifier is
/// registered (or its layer is on) through the arbiter.
#[derive(Debug, Clone)]
pub struct StickyArbiter {
    tunables: StickyTunables,
    roles: [RoleState; ROLE_COUNT],
    /// A tapped role is waiting for the next key
    armed: bool,
    /// Time of the last dance resolution
    sticky_timer: u32,
    /// Keys that consumed a one-shot, each with the roles it applied
    /// (bit per role index); a key-up releases only its own roles
    one_shot_keys: SmallVec<[(Keycode, u8); 4]>,
}

impl StickyArbiter {
    pub fn new(tunables: StickyTunables) -> Self {
        Self {
            tunables,
            roles: [RoleState::default(); ROLE_COUNT],
            armed: false,
            sticky_timer: 0,
            one_shot_keys: SmallVec::new(),
        }
    }

    pub fn is_active(&self, role: StickyRole) -> bool {
        self.roles[role.index()].active
    }

    pub fn is_pending(&self, role: StickyRole) -> bool {
        self.roles[role.index()].pending
    }

    pub fn phase(&self, role: StickyRole) -> RolePhase {
        self.roles[role.index()].phase
    }

    pub fn outcome(&self, role: StickyRole) -> Option<DanceOutcome> {
        self.roles[role.index()].outcome
    }

    /// Whether a tapped role is waiting for the next key
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn sticky_timer(&self) -> u32 {
        self.sticky_timer
    }

    /// Tap-dance finished callback
    pub fn finished<O: HostOutput>(
        &mut self,
        role: StickyRole,
        state: &DanceState,
        now_ms: u32,
        config: &mut PointerConfig,
        out: &mut O,
    ) -> DanceOutcome {
        let outcome = DanceOutcome::classify(state);
        log::debug!("{} dance finished: {}", role, outcome);
        self.sticky_timer = now_ms;
        self.roles[role.index()].outcome = Some(outcome);

        if role.is_sticky() {
            self.roles[role.index()].pending = true;
            self.armed = true;
        }
        if let RoleTarget::Layer(layer) = role.target(&self.tunables) {
            let slot = &mut self.roles[role.index()];
            slot.active = true;
            out.layer_on(layer);
        }

        match outcome {
            DanceOutcome::SingleTap => {
                self.roles[role.index()].phase = RolePhase::TapResolved;
                match role {
                    StickyRole::Escape => {
                        config.set_sniping(false);
                        config.set_dragscroll(false);
                        out.tap_code(KC_ESCAPE);
                    }
                    StickyRole::Ctrl => {
                        config.set_sniping(false);
                        config.set_dragscroll(false);
                    }
                    StickyRole::Alt => config.set_dragscroll(true),
                    _ => {}
                }
            }
            DanceOutcome::SingleHold => {
                if role.is_sticky() {
                    self.activate_stkeys(config, out);
                    self.armed = false;
                }
            }
            DanceOutcome::Other(_) => {}
        }
        outcome
    }

    /// Tap-dance reset callback; a resolved hold lets go of everything
    pub fn reset<O: HostOutput>(
        &mut self,
        role: StickyRole,
        config: &mut PointerConfig,
        out: &mut O,
    ) {
        if self.roles[role.index()].outcome == Some(DanceOutcome::SingleHold) {
            self.unstick_keys(config, out);
        }
    }

    /// Apply every pending role: register modifiers, turn layers on.
    /// The lower role also enables sniping.
    pub fn activate_stkeys<O: HostOutput>(&mut self, config: &mut PointerConfig, out: &mut O) {
        for role in StickyRole::iter() {
            if !self.roles[role.index()].pending {
                continue;
            }
            match role.target(&self.tunables) {
                RoleTarget::Modifier(modifier) => out.register_mods(modifier.bit()),
                RoleTarget::Layer(layer) => out.layer_on(layer),
                RoleTarget::None => {}
            }
            if role == StickyRole::Lower {
                config.set_sniping(true);
            }
            let slot = &mut self.roles[role.index()];
            slot.pending = false;
            slot.active = true;
            slot.phase = RolePhase::HoldActive;
            log::debug!("sticky {} active", role);
        }
    }

    /// Release every active modifier and layer; a no-op when nothing is active.
    /// Releasing the lower role also disables sniping.
    pub fn unstick_keys<O: HostOutput>(&mut self, config: &mut PointerConfig, out: &mut O) {
        for role in StickyRole::iter() {
            self.release(role, config, out);
        }
        self.one_shot_keys.clear();
    }

    fn release<O: HostOutput>(
        &mut self,
        role: StickyRole,
        config: &mut PointerConfig,
        out: &mut O,
    ) {
        if !self.roles[role.index()].active {
            return;
        }
        match role.target(&self.tunables) {
            RoleTarget::Modifier(modifier) => out.unregister_mods(modifier.bit()),
            RoleTarget::Layer(layer) => out.layer_off(layer),
            RoleTarget::None => {}
        }
        if role == StickyRole::Lower {
            config.set_sniping(false);
        }
        let slot = &mut self.roles[role.index()];
        slot.active = false;
        slot.phase = RolePhase::Unstuck;
        log::debug!("sticky {} released", role);
    }

    fn pending_mask(&self) -> u8 {
        StickyRole::iter()
            .filter(|role| self.roles[role.index()].pending)
            .fold(0, |mask, role| mask | 1 << role.index())
    }

    /// Hook for ordinary (non-dance) keys, completing a tapped one-shot
    pub fn on_key_event<O: HostOutput>(
        &mut self,
        keycode: Keycode,
        action: Action,
        config: &mut PointerConfig,
        out: &mut O,
    ) {
        match action {
            Action::Press if self.armed => {
                let claimed = self.pending_mask();
                self.activate_stkeys(config, out);
                self.armed = false;
                // A re-tapped role now belongs to the newest key
                for (_, roles) in self.one_shot_keys.iter_mut() {
                    *roles &= !claimed;
                }
                self.one_shot_keys.push((keycode, claimed));
            }
            Action::Release => {
                let Some(pos) = self.one_shot_keys.iter().position(|(k, _)| *k == keycode) else {
                    return;
                };
                let (_, roles) = self.one_shot_keys.remove(pos);
                for role in StickyRole::iter() {
                    if roles & 1 << role.index() != 0 {
                        self.release(role, config, out);
                    }
                }
            }
            Action::Press => {}
        }
    }

    /// Expire an armed one-shot once `timeout_ms` has passed since the
    /// last dance resolved. Inert without a timeout.
    pub fn tick<O: HostOutput>(&mut self, now_ms: u32, config: &mut PointerConfig, out: &mut O) {
        let Some(timeout) = self.tunables.timeout_ms else {
            return;
        };
        if !self.armed || now_ms.wrapping_sub(self.sticky_timer) < timeout {
            return;
        }
        log::debug!("sticky sequence expired after {} ms", timeout);
        self.armed = false;
        for slot in self.roles.iter_mut() {
            slot.pending = false;
        }
        self.unstick_keys(config, out);
    }
}
