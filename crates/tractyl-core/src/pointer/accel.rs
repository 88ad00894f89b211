/// Largest magnitude a relative HID mouse axis can carry
pub const HID_MAX: i32 = 127;

/// Clamp to the symmetric HID range `-127..=127`
pub fn constrain_hid(value: i32) -> i8 {
    value.clamp(-HID_MAX, HID_MAX) as i8
}

/// Quadratic acceleration: `sign(d) * d*d / factor + d`, clamped to HID range
pub fn accelerate(d: i32, factor: i32) -> i8 {
    let factor = factor.max(1);
    let d = d as i64;
    let boost = d * d / factor as i64;
    let value = if d > 0 { boost + d } else { -boost + d };
    constrain_hid(value.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}
