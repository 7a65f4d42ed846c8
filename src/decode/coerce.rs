//! Best-effort cell coercion for JSON record output
//!
//! The merged-CSV path never coerces; raw strings pass through verbatim.

use serde_json::Value;

/// Map a raw text cell to a typed JSON value.
///
/// Evaluated in order: empty string stays an empty string (not null), then
/// integer, then float, then `true`/`false` (any case), else the original
/// string. The ordering is part of the contract; downstream consumers
/// distinguish numeric from string cells.
///
/// Pure function of the input; a cell coerces the same way no matter which
/// partition it came from.
pub fn coerce(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }

    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }

    if let Ok(f) = raw.parse::<f64>() {
        // NaN and infinities have no JSON representation; fall through
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }

    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    Value::String(raw.to_string())
}
