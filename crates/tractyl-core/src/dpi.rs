// Tractyl DPI Controller
// Stepped sensitivity curves for default and sniping pointer modes

use std::fmt;

use crate::config::{DpiTunables, PointerConfig};

/// Which of the two stepped curves an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpiCurve {
    Default,
    Sniping,
}

impl fmt::Display for DpiCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DpiCurve::Default => write!(f, "default"),
            DpiCurve::Sniping => write!(f, "sniping"),
        }
    }
}

/// DPI of `curve` at its current step: `step * STEP_SIZE + MIN_DPI`
pub fn effective_dpi(config: &PointerConfig, dpi: &DpiTunables, curve: DpiCurve) -> u16 {
    let value = match curve {
        DpiCurve::Default => {
            config.default_dpi_step() as u32 * dpi.default_step as u32 + dpi.min_default as u32
        }
        DpiCurve::Sniping => {
            config.sniping_dpi_step() as u32 * dpi.sniping_step as u32 + dpi.min_sniping as u32
        }
    };
    value.min(u16::MAX as u32) as u16
}

/// DPI the sensor should run at for the current mode flags.
///
/// Dragscroll pins a fixed value; otherwise sniping picks the sniping
/// curve and everything else uses the default curve.
pub fn sensor_dpi(config: &PointerConfig, dpi: &DpiTunables) -> u16 {
    if config.is_dragscroll() {
        dpi.dragscroll
    } else if config.is_sniping() {
        effective_dpi(config, dpi, DpiCurve::Sniping)
    } else {
        effective_dpi(config, dpi, DpiCurve::Default)
    }
}

/// Move `curve` one step and return its new effective DPI
pub fn step(config: &mut PointerConfig, dpi: &DpiTunables, curve: DpiCurve, forward: bool) -> u16 {
    match curve {
        DpiCurve::Default => config.step_default_dpi(forward),
        DpiCurve::Sniping => config.step_sniping_dpi(forward),
    }
    let value = effective_dpi(config, dpi, curve);
    log::debug!(
        "{} dpi stepped {} -> {}",
        curve,
        if forward { "forward" } else { "backward" },
        value
    );
    value
}
