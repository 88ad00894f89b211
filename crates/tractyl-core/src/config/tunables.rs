// Tractyl Tunables
// Constants that shape DPI curves, thresholds and sticky/sync timing

use crate::keycode::{
    Keycode, KC_AUDIO_VOL_DOWN, KC_AUDIO_VOL_UP, KC_BRIGHTNESS_DOWN, KC_BRIGHTNESS_UP,
};
use crate::Layer;

/// DPI curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiTunables {
    /// DPI at default step 0
    pub min_default: u16,
    /// DPI added per default step
    pub default_step: u16,
    /// DPI at sniping step 0
    pub min_sniping: u16,
    /// DPI added per sniping step
    pub sniping_step: u16,
    /// Fixed sensor DPI while drag-scrolling
    pub dragscroll: u16,
}

impl Default for DpiTunables {
    fn default() -> Self {
        Self {
            min_default: 400,
            default_step: 200,
            min_sniping: 200,
            sniping_step: 100,
            dragscroll: 100,
        }
    }
}

/// Motion engine thresholds and axis options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTunables {
    /// Counts an axis must exceed before one scroll unit fires
    pub dragscroll_buffer: i32,
    /// Counts per caret/custom tap while sniping (quartered otherwise)
    pub caret_buffer: i32,
    /// Apply the acceleration curve in plain pointing mode
    pub acceleration: bool,
    pub acceleration_factor: i32,
    /// Threshold multiplier for caret-style modes under integration
    pub integration_caret_scale: i32,
    /// Threshold multiplier for dragscroll under integration
    pub integration_scroll_scale: i32,
    pub dragscroll_reverse_x: bool,
    pub dragscroll_reverse_y: bool,
    pub caret_reverse_x: bool,
    pub caret_reverse_y: bool,
}

impl Default for MotionTunables {
    fn default() -> Self {
        Self {
            dragscroll_buffer: 6,
            caret_buffer: 40,
            acceleration: false,
            acceleration_factor: 24,
            integration_caret_scale: 20,
            integration_scroll_scale: 300,
            dragscroll_reverse_x: false,
            dragscroll_reverse_y: false,
            caret_reverse_x: false,
            // Positive y taps UP
            caret_reverse_y: false,
        }
    }
}

/// Keycodes tapped by custom mode, one per direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomKeys {
    pub right: Keycode,
    pub left: Keycode,
    pub up: Keycode,
    pub down: Keycode,
}

impl Default for CustomKeys {
    fn default() -> Self {
        Self {
            right: KC_BRIGHTNESS_UP,
            left: KC_BRIGHTNESS_DOWN,
            up: KC_AUDIO_VOL_UP,
            down: KC_AUDIO_VOL_DOWN,
        }
    }
}

/// Sticky-key layers and optional timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickyTunables {
    pub lower_layer: Layer,
    pub raise_layer: Layer,
    /// Disarm a pending sticky sequence after this many milliseconds.
    /// `None` keeps the sticky timer informational only.
    pub timeout_ms: Option<u32>,
}

impl Default for StickyTunables {
    fn default() -> Self {
        Self {
            lower_layer: Layer(1),
            raise_layer: Layer(2),
            timeout_ms: None,
        }
    }
}

/// Split sync cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTunables {
    /// Resend the config at least this often even when unchanged
    pub interval_ms: u32,
}

impl Default for SyncTunables {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

/// Every tunable of the input core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tunables {
    pub dpi: DpiTunables,
    pub motion: MotionTunables,
    pub custom: CustomKeys,
    pub sticky: StickyTunables,
    pub sync: SyncTunables,
}
