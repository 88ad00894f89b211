// Tractyl Motion Mode Engine
// Reinterprets relative sensor motion as pointing, scrolling, key taps or
// mode switches, depending on the active pointer mode
//
// One call per polling tick:
// - integrate the sample (integration mode) or take it as-is
// - dispatch on the mode flags: mode-select > dragscroll > caret > custom
// - pointing applies the optional acceleration curve unless sniping

pub mod accel;
pub mod buffer;

pub use buffer::{MotionBuffer, TapBurst, TapDirection};

use std::fmt;

use crate::config::{MotionTunables, PointerConfig, Tunables};
use crate::keycode::{Keycode, KC_DOWN, KC_LEFT, KC_RIGHT, KC_UP};
use crate::output::HostOutput;
use accel::{accelerate, constrain_hid};

/// Motion interpretation currently in effect, derived from the config flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerMode {
    Pointing,
    DragScroll,
    Caret,
    Custom,
    ModeSelect,
}

impl PointerMode {
    /// Resolve the flags in priority order
    pub fn from_config(config: &PointerConfig) -> Self {
        if config.is_mode_select() {
            PointerMode::ModeSelect
        } else if config.is_dragscroll() {
            PointerMode::DragScroll
        } else if config.is_caret() {
            PointerMode::Caret
        } else if config.is_custom() {
            PointerMode::Custom
        } else {
            PointerMode::Pointing
        }
    }
}

impl fmt::Display for PointerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointerMode::Pointing => "pointing",
            PointerMode::DragScroll => "dragscroll",
            PointerMode::Caret => "caret",
            PointerMode::Custom => "custom",
            PointerMode::ModeSelect => "mode-select",
        };
        write!(f, "{}", name)
    }
}

/// Raw relative motion read from the sensor for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionSample {
    pub dx: i16,
    pub dy: i16,
}

impl MotionSample {
    pub fn new(dx: i16, dy: i16) -> Self {
        Self { dx, dy }
    }
}

/// Relative mouse report fields handed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseReport {
    pub x: i8,
    pub y: i8,
    /// Horizontal scroll
    pub h: i8,
    /// Vertical scroll
    pub v: i8,
}

impl MouseReport {
    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0 && self.h == 0 && self.v == 0
    }
}

impl fmt::Display for MouseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={} h={} v={}", self.x, self.y, self.h, self.v)
    }
}

/// Mode change performed by a mode-select flick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    EnableDragScroll,
    EnableCaret,
    EnableIntegration,
    /// Drop every non-stacking mode and integration
    Reset,
}

impl ModeTransition {
    fn for_direction(direction: TapDirection) -> Self {
        match direction {
            TapDirection::Right => ModeTransition::EnableDragScroll,
            TapDirection::Left => ModeTransition::EnableCaret,
            TapDirection::Down => ModeTransition::EnableIntegration,
            TapDirection::Up => ModeTransition::Reset,
        }
    }

    fn apply(self, config: &mut PointerConfig) {
        match self {
            ModeTransition::EnableDragScroll => config.set_dragscroll(true),
            ModeTransition::EnableCaret => config.set_caret(true),
            ModeTransition::EnableIntegration => config.set_integration(true),
            ModeTransition::Reset => {
                config.disable_nonstacking();
                config.set_integration(false);
            }
        }
    }
}

/// Per-tick motion state: the integration accumulator and per-family buffers.
///
/// Buffers are cleared whenever the resolved mode changes, so motion
/// gathered in one mode never fires in the next. The integration
/// accumulator restarts from zero each time integration is switched on.
#[derive(Debug, Clone, Default)]
pub struct MotionEngine {
    integrated: MotionBuffer,
    scroll: MotionBuffer,
    taps: MotionBuffer,
    last_mode: Option<PointerMode>,
    last_integration: bool,
}

impl MotionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dragscroll accumulator
    pub fn scroll_buffer(&self) -> MotionBuffer {
        self.scroll
    }

    /// Caret/custom/mode-select accumulator
    pub fn tap_buffer(&self) -> MotionBuffer {
        self.taps
    }

    /// Forget all accumulated motion
    pub fn reset(&mut self) {
        self.integrated.clear();
        self.scroll.clear();
        self.taps.clear();
    }

    /// Process one sample. Caret/custom taps go straight to `out`;
    /// mode-select flicks rewrite `config`.
    pub fn process<O: HostOutput>(
        &mut self,
        config: &mut PointerConfig,
        tunables: &Tunables,
        sample: MotionSample,
        out: &mut O,
    ) -> MouseReport {
        let mode = PointerMode::from_config(config);
        if self.last_mode != Some(mode) {
            if let Some(previous) = self.last_mode {
                log::debug!("pointer mode {} -> {}", previous, mode);
            }
            self.scroll.clear();
            self.taps.clear();
            self.last_mode = Some(mode);
        }
        if config.is_integration() != self.last_integration {
            self.integrated.clear();
            self.last_integration = config.is_integration();
        }

        let (x, y) = if config.is_integration() {
            self.integrated.add(sample.dx as i32, sample.dy as i32);
            (self.integrated.x, self.integrated.y)
        } else {
            (sample.dx as i32, sample.dy as i32)
        };

        let motion = &tunables.motion;
        match mode {
            PointerMode::ModeSelect => {
                self.taps.add(x, y.saturating_neg());
                if let Some(burst) = self.taps.drain_taps(motion.caret_buffer) {
                    let transition = ModeTransition::for_direction(burst.direction);
                    log::debug!("mode-select flick {:?} -> {:?}", burst.direction, transition);
                    transition.apply(config);
                }
                MouseReport::default()
            }
            PointerMode::DragScroll => {
                let sx = if motion.dragscroll_reverse_x { -1 } else { 1 };
                let sy = if motion.dragscroll_reverse_y { -1 } else { 1 };
                self.scroll.add(x.saturating_mul(sx), y.saturating_mul(sy));
                let (h, v) = self.scroll.drain_scroll(scroll_threshold(config, motion));
                MouseReport { x: 0, y: 0, h, v }
            }
            PointerMode::Caret => {
                let sx = if motion.caret_reverse_x { -1 } else { 1 };
                let sy = if motion.caret_reverse_y { -1 } else { 1 };
                self.taps.add(x.saturating_mul(sx), y.saturating_mul(sy));
                let keys = [KC_RIGHT, KC_LEFT, KC_UP, KC_DOWN];
                self.emit_taps(config, motion, keys, out);
                MouseReport::default()
            }
            PointerMode::Custom => {
                self.taps.add(x, y.saturating_neg());
                let custom = &tunables.custom;
                let keys = [custom.right, custom.left, custom.up, custom.down];
                self.emit_taps(config, motion, keys, out);
                MouseReport::default()
            }
            PointerMode::Pointing => pointing_report(config, motion, sample),
        }
    }

    /// Drain the tap buffer into key taps; `keys` is right, left, up, down
    fn emit_taps<O: HostOutput>(
        &mut self,
        config: &PointerConfig,
        motion: &MotionTunables,
        keys: [Keycode; 4],
        out: &mut O,
    ) {
        let Some(burst) = self.taps.drain_taps(tap_threshold(config, motion)) else {
            return;
        };
        let keycode = match burst.direction {
            TapDirection::Right => keys[0],
            TapDirection::Left => keys[1],
            TapDirection::Up => keys[2],
            TapDirection::Down => keys[3],
        };
        log::trace!("tapping {} x{}", keycode, burst.count);
        for _ in 0..burst.count {
            out.tap_code(keycode);
        }
    }
}

/// Caret/custom threshold: scaled up under integration, quartered unless sniping
pub fn tap_threshold(config: &PointerConfig, motion: &MotionTunables) -> i32 {
    let mut threshold = motion.caret_buffer;
    if config.is_integration() {
        threshold = threshold.saturating_mul(motion.integration_caret_scale);
    }
    if !config.is_sniping() {
        threshold /= 4;
    }
    threshold.max(1)
}

/// Dragscroll threshold, scaled up under integration
pub fn scroll_threshold(config: &PointerConfig, motion: &MotionTunables) -> i32 {
    if config.is_integration() {
        motion.dragscroll_buffer.saturating_mul(motion.integration_scroll_scale)
    } else {
        motion.dragscroll_buffer
    }
}

fn pointing_report(
    config: &PointerConfig,
    motion: &MotionTunables,
    sample: MotionSample,
) -> MouseReport {
    let (x, y) = if motion.acceleration && !config.is_sniping() {
        (
            accelerate(sample.dx as i32, motion.acceleration_factor),
            accelerate(sample.dy as i32, motion.acceleration_factor),
        )
    } else {
        (constrain_hid(sample.dx as i32), constrain_hid(sample.dy as i32))
    };
    MouseReport { x, y, h: 0, v: 0 }
}
