// Tractyl Motion Buffer
// Signed per-axis accumulators with threshold draining

/// Direction a tap-style mode fires in.
///
/// Positive x is right; positive buffered y is up (callers decide how the
/// sensor's y sign maps into the buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapDirection {
    Right,
    Left,
    Up,
    Down,
}

/// A threshold crossing: which way, and how many threshold multiples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapBurst {
    pub direction: TapDirection,
    pub count: u32,
}

/// Pair of signed accumulators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionBuffer {
    pub x: i32,
    pub y: i32,
}

impl MotionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    pub fn clear(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Fire one scroll unit per axis whose magnitude exceeds `threshold`.
    ///
    /// Returns `(h, v)` in `-1..=1`; an axis that fires is reset to zero,
    /// the other keeps accumulating.
    pub fn drain_scroll(&mut self, threshold: i32) -> (i8, i8) {
        let h = drain_axis(&mut self.x, threshold);
        let v = drain_axis(&mut self.y, threshold);
        (h, v)
    }

    /// Fire taps once the combined magnitude reaches `threshold`.
    ///
    /// The dominant axis (x wins only when strictly larger) picks the
    /// direction and the count is one tap per whole threshold in `|x| + |y|`.
    /// Both axes are zeroed afterwards; the sub-threshold remainder goes with
    /// the fired axis.
    pub fn drain_taps(&mut self, threshold: i32) -> Option<TapBurst> {
        let threshold = threshold.max(1);
        let magnitude = self.x.unsigned_abs() as u64 + self.y.unsigned_abs() as u64;
        if magnitude < threshold as u64 {
            return None;
        }

        let direction = if self.x.unsigned_abs() > self.y.unsigned_abs() {
            if self.x > 0 {
                TapDirection::Right
            } else {
                TapDirection::Left
            }
        } else if self.y > 0 {
            TapDirection::Up
        } else {
            TapDirection::Down
        };

        let count = (magnitude / threshold as u64).min(u32::MAX as u64) as u32;
        self.clear();
        Some(TapBurst { direction, count })
    }
}

fn drain_axis(value: &mut i32, threshold: i32) -> i8 {
    if value.unsigned_abs() > threshold.max(0) as u32 {
        let unit = if *value > 0 { 1 } else { -1 };
        *value = 0;
        unit
    } else {
        0
    }
}
