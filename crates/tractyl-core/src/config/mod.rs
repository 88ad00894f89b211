// Tractyl Pointer Config
// Runtime pointer configuration and its persisted byte layout

pub mod store;
pub mod tunables;

#[cfg(feature = "host")]
pub mod parser;

pub use store::{ConfigStore, MemoryStorage, Storage, StorageError, CONFIG_KEY};
pub use tunables::{CustomKeys, DpiTunables, MotionTunables, StickyTunables, SyncTunables, Tunables};

#[cfg(feature = "host")]
pub use parser::{TunablesError, TunablesToml};

/// Size of the serialized config record, shared by storage and split sync
pub const CONFIG_SIZE: usize = 2;

const DEFAULT_DPI_STEP_MASK: u8 = 0x0F;
const SNIPING_DPI_STEP_SHIFT: u8 = 4;
const SNIPING_DPI_STEP_MASK: u8 = 0x03;

const FLAG_DRAGSCROLL: u8 = 1 << 0;
const FLAG_SNIPING: u8 = 1 << 1;
const FLAG_CARET: u8 = 1 << 2;
const FLAG_CUSTOM: u8 = 1 << 3;
const FLAG_MODE_SELECT: u8 = 1 << 4;
const FLAG_INTEGRATION: u8 = 1 << 5;
const FLAG_MASK: u8 = 0x3F;

/// Number of distinct default-curve DPI steps
pub const DEFAULT_DPI_STEPS: u8 = DEFAULT_DPI_STEP_MASK + 1;

/// Number of distinct sniping-curve DPI steps
pub const SNIPING_DPI_STEPS: u8 = SNIPING_DPI_STEP_MASK + 1;

/// Pointer configuration shared by every subsystem.
///
/// Byte layout (see [`PointerConfig::to_bytes`]):
/// - byte 0: bits 0-3 default DPI step, bits 4-5 sniping DPI step
/// - byte 1: bit 0 dragscroll, 1 sniping, 2 caret, 3 custom, 4 mode-select,
///   5 integration
///
/// Dragscroll, caret, custom and mode-select are "non-stacking": the setters
/// clear the other three before enabling one, so at most one of them is ever
/// set. Sniping and integration combine with anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerConfig {
    default_dpi_step: u8,
    sniping_dpi_step: u8,
    dragscroll: bool,
    sniping: bool,
    caret: bool,
    custom: bool,
    mode_select: bool,
    integration: bool,
}

impl PointerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize into the fixed record written to storage and the split link
    pub fn to_bytes(&self) -> [u8; CONFIG_SIZE] {
        let dpi = (self.default_dpi_step & DEFAULT_DPI_STEP_MASK)
            | ((self.sniping_dpi_step & SNIPING_DPI_STEP_MASK) << SNIPING_DPI_STEP_SHIFT);

        let mut flags = 0u8;
        if self.dragscroll {
            flags |= FLAG_DRAGSCROLL;
        }
        if self.sniping {
            flags |= FLAG_SNIPING;
        }
        if self.caret {
            flags |= FLAG_CARET;
        }
        if self.custom {
            flags |= FLAG_CUSTOM;
        }
        if self.mode_select {
            flags |= FLAG_MODE_SELECT;
        }
        if self.integration {
            flags |= FLAG_INTEGRATION;
        }

        [dpi, flags]
    }

    /// Deserialize a record verbatim, transient flags included.
    ///
    /// Reserved bits are ignored. A record that violates the non-stacking
    /// rule is taken as-is; only the setters enforce it.
    pub fn from_bytes(bytes: [u8; CONFIG_SIZE]) -> Self {
        let [dpi, flags] = bytes;
        let flags = flags & FLAG_MASK;
        Self {
            default_dpi_step: dpi & DEFAULT_DPI_STEP_MASK,
            sniping_dpi_step: (dpi >> SNIPING_DPI_STEP_SHIFT) & SNIPING_DPI_STEP_MASK,
            dragscroll: flags & FLAG_DRAGSCROLL != 0,
            sniping: flags & FLAG_SNIPING != 0,
            caret: flags & FLAG_CARET != 0,
            custom: flags & FLAG_CUSTOM != 0,
            mode_select: flags & FLAG_MODE_SELECT != 0,
            integration: flags & FLAG_INTEGRATION != 0,
        }
    }

    /// Deserialize from a slice, `None` unless it is exactly [`CONFIG_SIZE`] long
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let record: [u8; CONFIG_SIZE] = bytes.try_into().ok()?;
        Some(Self::from_bytes(record))
    }

    /// Drop every mode flag, keeping only the DPI steps
    pub fn clear_transient(&mut self) {
        self.dragscroll = false;
        self.sniping = false;
        self.caret = false;
        self.custom = false;
        self.mode_select = false;
        self.integration = false;
    }

    pub fn default_dpi_step(&self) -> u8 {
        self.default_dpi_step
    }

    pub fn sniping_dpi_step(&self) -> u8 {
        self.sniping_dpi_step
    }

    /// Move the default step by one, wrapping within its 4-bit field
    pub fn step_default_dpi(&mut self, forward: bool) {
        self.default_dpi_step = wrap_step(self.default_dpi_step, forward, DEFAULT_DPI_STEP_MASK);
    }

    /// Move the sniping step by one, wrapping within its 2-bit field
    pub fn step_sniping_dpi(&mut self, forward: bool) {
        self.sniping_dpi_step = wrap_step(self.sniping_dpi_step, forward, SNIPING_DPI_STEP_MASK);
    }

    pub fn is_dragscroll(&self) -> bool {
        self.dragscroll
    }

    pub fn is_sniping(&self) -> bool {
        self.sniping
    }

    pub fn is_caret(&self) -> bool {
        self.caret
    }

    pub fn is_custom(&self) -> bool {
        self.custom
    }

    pub fn is_mode_select(&self) -> bool {
        self.mode_select
    }

    pub fn is_integration(&self) -> bool {
        self.integration
    }

    pub fn set_sniping(&mut self, enable: bool) {
        self.sniping = enable;
    }

    pub fn set_integration(&mut self, enable: bool) {
        self.integration = enable;
    }

    pub fn set_dragscroll(&mut self, enable: bool) {
        if enable {
            self.disable_nonstacking();
        }
        self.dragscroll = enable;
    }

    pub fn set_caret(&mut self, enable: bool) {
        if enable {
            self.disable_nonstacking();
        }
        self.caret = enable;
    }

    pub fn set_custom(&mut self, enable: bool) {
        if enable {
            self.disable_nonstacking();
        }
        self.custom = enable;
    }

    pub fn set_mode_select(&mut self, enable: bool) {
        if enable {
            self.disable_nonstacking();
        }
        self.mode_select = enable;
    }

    /// Clear dragscroll, caret, custom and mode-select
    pub fn disable_nonstacking(&mut self) {
        self.dragscroll = false;
        self.caret = false;
        self.custom = false;
        self.mode_select = false;
    }

    /// Number of non-stacking modes currently set (0 or 1 when built through the setters)
    pub fn nonstacking_count(&self) -> usize {
        [self.dragscroll, self.caret, self.custom, self.mode_select]
            .iter()
            .filter(|&&on| on)
            .count()
    }
}

fn wrap_step(step: u8, forward: bool, mask: u8) -> u8 {
    let next = if forward {
        step.wrapping_add(1)
    } else {
        step.wrapping_sub(1)
    };
    next & mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zeroed() {
        let config = PointerConfig::default();
        assert_eq!(config.to_bytes(), [0, 0]);
        assert_eq!(config.nonstacking_count(), 0);
    }

    #[test]
    fn test_byte_layout() {
        let mut config = PointerConfig::new();
        config.step_default_dpi(true);
        config.step_default_dpi(true);
        config.step_sniping_dpi(true);
        config.set_sniping(true);
        config.set_caret(true);
        config.set_integration(true);

        // default step 2, sniping step 1 in bits 4-5
        // sniping | caret | integration
        assert_eq!(config.to_bytes(), [0x12, 0b0010_0110]);
        assert_eq!(PointerConfig::from_bytes(config.to_bytes()), config);
    }

    #[test]
    fn test_reserved_bits_ignored() {
        let config = PointerConfig::from_bytes([0xC3, 0xC0]);
        assert_eq!(config.default_dpi_step(), 3);
        assert_eq!(config.sniping_dpi_step(), 0);
        assert_eq!(config.nonstacking_count(), 0);
        assert!(!config.is_sniping());
    }

    #[test]
    fn test_from_slice_requires_exact_size() {
        assert!(PointerConfig::from_slice(&[0x01]).is_none());
        assert!(PointerConfig::from_slice(&[0x01, 0x00, 0x00]).is_none());
        let config = PointerConfig::from_slice(&[0x01, FLAG_DRAGSCROLL]).unwrap();
        assert!(config.is_dragscroll());
        assert_eq!(config.default_dpi_step(), 1);
    }

    #[test]
    fn test_enabling_mode_clears_others() {
        let mut config = PointerConfig::new();
        config.set_dragscroll(true);
        config.set_caret(true);
        assert!(config.is_caret());
        assert!(!config.is_dragscroll());

        config.set_custom(true);
        assert!(config.is_custom());
        assert!(!config.is_caret());

        config.set_mode_select(true);
        assert!(config.is_mode_select());
        assert!(!config.is_custom());
        assert_eq!(config.nonstacking_count(), 1);
    }

    #[test]
    fn test_disabling_mode_only_clears_itself() {
        let mut config = PointerConfig::new();
        config.set_caret(true);
        config.set_dragscroll(false);
        assert!(config.is_caret());

        config.set_caret(false);
        assert_eq!(config.nonstacking_count(), 0);
    }

    #[test]
    fn test_sniping_and_integration_stack() {
        let mut config = PointerConfig::new();
        config.set_sniping(true);
        config.set_integration(true);
        config.set_dragscroll(true);
        assert!(config.is_sniping());
        assert!(config.is_integration());
        assert!(config.is_dragscroll());

        config.disable_nonstacking();
        assert!(config.is_sniping());
        assert!(config.is_integration());
    }

    #[test]
    fn test_nonstacking_invariant_over_sequences() {
        // Every combination of four setters applied in sequence
        let setters: [fn(&mut PointerConfig, bool); 4] = [
            PointerConfig::set_dragscroll,
            PointerConfig::set_caret,
            PointerConfig::set_custom,
            PointerConfig::set_mode_select,
        ];
        let mut config = PointerConfig::new();
        for round in 0..64u32 {
            for (i, setter) in setters.iter().enumerate() {
                let enable = (round >> i) & 1 == 1;
                setter(&mut config, enable);
                assert!(config.nonstacking_count() <= 1);
            }
        }
    }

    #[test]
    fn test_dpi_steps_wrap() {
        let mut config = PointerConfig::new();
        config.step_default_dpi(false);
        assert_eq!(config.default_dpi_step(), DEFAULT_DPI_STEPS - 1);
        config.step_default_dpi(true);
        assert_eq!(config.default_dpi_step(), 0);

        for _ in 0..SNIPING_DPI_STEPS {
            config.step_sniping_dpi(true);
        }
        assert_eq!(config.sniping_dpi_step(), 0);
    }

    #[test]
    fn test_clear_transient_keeps_dpi() {
        let mut config = PointerConfig::new();
        config.step_default_dpi(true);
        config.set_sniping(true);
        config.set_custom(true);
        config.clear_transient();
        assert_eq!(config.default_dpi_step(), 1);
        assert_eq!(config.to_bytes()[1], 0);
    }
}
