//! Lenient scalar extraction from JSON values.
//!
//! Exchanges send prices as strings, weather APIs send numbers, and both send
//! `null` now and then. These helpers accept either form and map anything
//! unusable to `None`.

use serde_json::Value;

pub(crate) fn as_f64(value: Option<&Value>) -> Option<f64> {
    let v = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

pub(crate) fn as_i32(value: Option<&Value>) -> Option<i32> {
    let v = as_f64(value)?;
    if v.fract() != 0.0 || v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}
