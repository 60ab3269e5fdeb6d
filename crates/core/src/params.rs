//! Typed lookups into a JSON parameter object.
//!
//! Scene overrides arrive as loose JSON (CLI `--params`, wasm `mount`
//! options). Lenient helpers return the default for a missing or mistyped
//! key; the `expect_*` helpers are used where a wrong type should be reported
//! instead of silently ignored.

use crate::error::SceneError;
use serde_json::Value;

pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Non-negative integers only; floats and negatives fall back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// A `[min, max]` pair. Anything other than a two-number array with
/// `min <= max` yields `default`.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    let pair = params.get(name).and_then(Value::as_array).and_then(|arr| {
        match arr.as_slice() {
            [lo, hi] => Some((lo.as_f64()?, hi.as_f64()?)),
            _ => None,
        }
    });
    match pair {
        Some((lo, hi)) if lo <= hi => (lo, hi),
        _ => default,
    }
}

/// Optional cap: a key set to `null` clears the default, a missing key keeps it.
pub fn param_cap(params: &Value, name: &str, default: Option<usize>) -> Option<usize> {
    match params.get(name) {
        None => default,
        Some(Value::Null) => None,
        Some(v) => v.as_u64().map(|v| v as usize).or(default),
    }
}

/// Strict string lookup: `Ok(None)` when absent, an error when present but
/// not a string.
pub fn expect_str<'a>(params: &'a Value, name: &str) -> Result<Option<&'a str>, SceneError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(SceneError::ParamTypeMismatch {
            name: name.to_owned(),
            expected: "string".into(),
            got: json_type_name(other).into(),
        }),
    }
}

pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
