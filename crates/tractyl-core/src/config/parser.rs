// Tractyl Tunables Parser - TOML with Serde
// Parses tunables from TOML files

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::tunables::{
    CustomKeys, DpiTunables, MotionTunables, StickyTunables, SyncTunables, Tunables,
};
use crate::keycode::keycode_from_name;
use crate::{Keycode, Layer};

/// Tunables parser errors
#[derive(Debug, thiserror::Error)]
pub enum TunablesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid keycode: {0}")]
    InvalidKeycode(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Root TOML table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TunablesToml {
    #[serde(default)]
    pub dpi: Option<DpiToml>,

    #[serde(default)]
    pub motion: Option<MotionToml>,

    /// Custom-mode keycodes by name
    #[serde(default)]
    pub custom: Option<CustomToml>,

    #[serde(default)]
    pub sticky: Option<StickyToml>,

    #[serde(default)]
    pub sync: Option<SyncToml>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DpiToml {
    pub min_default: Option<u16>,
    pub default_step: Option<u16>,
    pub min_sniping: Option<u16>,
    pub sniping_step: Option<u16>,
    pub dragscroll: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct MotionToml {
    pub dragscroll_buffer: Option<i32>,
    pub caret_buffer: Option<i32>,
    pub acceleration: Option<bool>,
    pub acceleration_factor: Option<i32>,
    pub integration_caret_scale: Option<i32>,
    pub integration_scroll_scale: Option<i32>,
    pub dragscroll_reverse_x: Option<bool>,
    pub dragscroll_reverse_y: Option<bool>,
    pub caret_reverse_x: Option<bool>,
    pub caret_reverse_y: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CustomToml {
    pub right: Option<String>,
    pub left: Option<String>,
    pub up: Option<String>,
    pub down: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StickyToml {
    pub lower_layer: Option<u8>,
    pub raise_layer: Option<u8>,
    pub timeout_ms: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SyncToml {
    pub interval_ms: Option<u32>,
}

impl Tunables {
    /// Parse a TOML tunables file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, TunablesError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse tunables from a TOML string; absent keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, TunablesError> {
        let toml_tunables: TunablesToml =
            toml::from_str(content).map_err(|e| TunablesError::TomlParse(e.to_string()))?;
        toml_tunables.to_tunables()
    }

    /// Default location (~/.config/tractyl/tunables.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tractyl").join("tunables.toml"))
    }

    /// Load from the default location, or defaults if there is no file
    pub fn load_default() -> Result<Self, TunablesError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::debug!("loading tunables from {}", path.display());
                return Self::from_toml_path(path);
            }
        }
        Ok(Self::default())
    }
}

impl TunablesToml {
    /// Convert to validated tunables
    pub fn to_tunables(&self) -> Result<Tunables, TunablesError> {
        let mut tunables = Tunables::default();

        if let Some(ref dpi) = self.dpi {
            apply_dpi(&mut tunables.dpi, dpi)?;
        }
        if let Some(ref motion) = self.motion {
            apply_motion(&mut tunables.motion, motion)?;
        }
        if let Some(ref custom) = self.custom {
            apply_custom(&mut tunables.custom, custom)?;
        }
        if let Some(ref sticky) = self.sticky {
            apply_sticky(&mut tunables.sticky, sticky);
        }
        if let Some(ref sync) = self.sync {
            apply_sync(&mut tunables.sync, sync)?;
        }

        Ok(tunables)
    }
}

fn apply_dpi(dpi: &mut DpiTunables, toml: &DpiToml) -> Result<(), TunablesError> {
    if let Some(v) = toml.min_default {
        dpi.min_default = v;
    }
    if let Some(v) = toml.default_step {
        dpi.default_step = v;
    }
    if let Some(v) = toml.min_sniping {
        dpi.min_sniping = v;
    }
    if let Some(v) = toml.sniping_step {
        dpi.sniping_step = v;
    }
    if let Some(v) = toml.dragscroll {
        dpi.dragscroll = v;
    }

    // Highest reachable step must still fit the sensor's u16 register
    let top_default = dpi.default_step as u32 * (crate::config::DEFAULT_DPI_STEPS as u32 - 1)
        + dpi.min_default as u32;
    if top_default > u16::MAX as u32 {
        return Err(TunablesError::OutOfRange(format!(
            "default DPI curve reaches {}",
            top_default
        )));
    }
    let top_sniping = dpi.sniping_step as u32 * (crate::config::SNIPING_DPI_STEPS as u32 - 1)
        + dpi.min_sniping as u32;
    if top_sniping > u16::MAX as u32 {
        return Err(TunablesError::OutOfRange(format!(
            "sniping DPI curve reaches {}",
            top_sniping
        )));
    }
    Ok(())
}

fn apply_motion(motion: &mut MotionTunables, toml: &MotionToml) -> Result<(), TunablesError> {
    if let Some(v) = toml.dragscroll_buffer {
        motion.dragscroll_buffer = positive("motion.dragscroll_buffer", v)?;
    }
    if let Some(v) = toml.caret_buffer {
        motion.caret_buffer = positive("motion.caret_buffer", v)?;
    }
    if let Some(v) = toml.acceleration {
        motion.acceleration = v;
    }
    if let Some(v) = toml.acceleration_factor {
        motion.acceleration_factor = positive("motion.acceleration_factor", v)?;
    }
    if let Some(v) = toml.integration_caret_scale {
        motion.integration_caret_scale = positive("motion.integration_caret_scale", v)?;
    }
    if let Some(v) = toml.integration_scroll_scale {
        motion.integration_scroll_scale = positive("motion.integration_scroll_scale", v)?;
    }
    if let Some(v) = toml.dragscroll_reverse_x {
        motion.dragscroll_reverse_x = v;
    }
    if let Some(v) = toml.dragscroll_reverse_y {
        motion.dragscroll_reverse_y = v;
    }
    if let Some(v) = toml.caret_reverse_x {
        motion.caret_reverse_x = v;
    }
    if let Some(v) = toml.caret_reverse_y {
        motion.caret_reverse_y = v;
    }
    Ok(())
}

fn apply_custom(custom: &mut CustomKeys, toml: &CustomToml) -> Result<(), TunablesError> {
    if let Some(ref name) = toml.right {
        custom.right = parse_keycode(name)?;
    }
    if let Some(ref name) = toml.left {
        custom.left = parse_keycode(name)?;
    }
    if let Some(ref name) = toml.up {
        custom.up = parse_keycode(name)?;
    }
    if let Some(ref name) = toml.down {
        custom.down = parse_keycode(name)?;
    }
    Ok(())
}

fn apply_sticky(sticky: &mut StickyTunables, toml: &StickyToml) {
    if let Some(v) = toml.lower_layer {
        sticky.lower_layer = Layer(v);
    }
    if let Some(v) = toml.raise_layer {
        sticky.raise_layer = Layer(v);
    }
    if toml.timeout_ms.is_some() {
        sticky.timeout_ms = toml.timeout_ms;
    }
}

fn apply_sync(sync: &mut SyncTunables, toml: &SyncToml) -> Result<(), TunablesError> {
    if let Some(v) = toml.interval_ms {
        if v == 0 {
            return Err(TunablesError::OutOfRange("sync.interval_ms must be > 0".to_string()));
        }
        sync.interval_ms = v;
    }
    Ok(())
}

fn positive(field: &str, value: i32) -> Result<i32, TunablesError> {
    if value <= 0 {
        return Err(TunablesError::OutOfRange(format!(
            "{} must be > 0, got {}",
            field, value
        )));
    }
    Ok(value)
}

fn parse_keycode(name: &str) -> Result<Keycode, TunablesError> {
    keycode_from_name(name).ok_or_else(|| TunablesError::InvalidKeycode(name.to_string()))
}

/// Default tunables file content for a new installation
pub fn default_tunables_content() -> &'static str {
    r#"# Tractyl tunables
# Place this file at: ~/.config/tractyl/tunables.toml

[dpi]
min_default = 400
default_step = 200
min_sniping = 200
sniping_step = 100
dragscroll = 100

[motion]
dragscroll_buffer = 6
caret_buffer = 40
acceleration = false
acceleration_factor = 24
integration_caret_scale = 20
integration_scroll_scale = 300
dragscroll_reverse_x = false
dragscroll_reverse_y = false
caret_reverse_x = false
caret_reverse_y = false

[custom]
right = "BRIGHTNESS_UP"
left = "BRIGHTNESS_DOWN"
up = "VOLUME_UP"
down = "VOLUME_DOWN"

[sticky]
lower_layer = 1
raise_layer = 2
# timeout_ms = 500

[sync]
interval_ms = 500
"#
}
