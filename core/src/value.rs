//! Value model and string-to-value coercion.
//!
//! Every argument arrives as a string; [`coerce`] converts it into a typed
//! [`Value`] according to the declared [`ValueKind`]. Conversion diagnostics
//! follow the Go `strconv` wording (`invalid syntax`, `value out of range`)
//! because downstream tooling matches on those exact suffixes.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of value an option or positional slot accepts.
///
/// # Examples
///
/// ```
/// use argbind_core::ValueKind;
///
/// let kind = ValueKind::default();
/// assert_eq!(kind, ValueKind::Bool);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Boolean switch; takes no argument unless given inline (`--flag=false`).
    #[default]
    Bool,
    /// Plain string value.
    Str,
    /// Signed integer value.
    Int,
    /// Floating point value.
    Float,
    /// Repeatable string option; each occurrence appends one element.
    StrList,
    /// Repeatable `key:value` option; each occurrence sets one entry.
    StrMap,
    /// Value parsed by a caller-supplied function on the descriptor.
    Custom,
}

impl ValueKind {
    /// Whether options of this kind consume an argument token.
    pub fn takes_value(self) -> bool {
        !matches!(self, ValueKind::Bool)
    }

    /// Whether repeated occurrences accumulate instead of overwrite.
    pub fn accumulates(self) -> bool {
        matches!(self, ValueKind::StrList | ValueKind::StrMap)
    }
}

/// A typed value produced by coercion and stored in a
/// [`ValueStore`](crate::ValueStore).
///
/// # Examples
///
/// ```
/// use argbind_core::Value;
///
/// let v = Value::Int(42);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// String.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Ordered sequence (list options, remainder slots).
    List(Vec<Value>),
    /// Key/value entries (map options).
    Map(BTreeMap<String, String>),
}

impl Value {
    /// Returns the boolean payload, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float payload, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the element sequence, if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entry map, if this is a [`Value::Map`].
    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// A failed string-to-value conversion.
///
/// Displays as `parsing "<literal>": <detail>`, matching the Go `strconv`
/// error wording that callers are known to match on.
///
/// # Examples
///
/// ```
/// use argbind_core::{ValueKind, coerce};
///
/// let err = coerce("notint1", ValueKind::Int).unwrap_err();
/// assert_eq!(err.to_string(), "parsing \"notint1\": invalid syntax");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parsing \"{literal}\": {detail}")]
pub struct CoerceError {
    /// The offending input, verbatim.
    pub literal: String,
    /// Diagnostic detail (`invalid syntax` or `value out of range`).
    pub detail: &'static str,
}

impl CoerceError {
    fn syntax(literal: &str) -> Self {
        CoerceError {
            literal: literal.to_string(),
            detail: "invalid syntax",
        }
    }

    fn range(literal: &str) -> Self {
        CoerceError {
            literal: literal.to_string(),
            detail: "value out of range",
        }
    }
}

/// Coerces a raw argument string into a [`Value`] of the given kind.
///
/// List and map kinds coerce a single element/entry per call; accumulation
/// into the final [`Value::List`]/[`Value::Map`] is the caller's concern.
/// [`ValueKind::Custom`] without a descriptor parser falls back to a plain
/// string.
///
/// # Examples
///
/// ```
/// use argbind_core::{Value, ValueKind, coerce};
///
/// assert_eq!(coerce("3", ValueKind::Int).unwrap(), Value::Int(3));
/// assert_eq!(coerce("t", ValueKind::Bool).unwrap(), Value::Bool(true));
/// assert!(coerce("x", ValueKind::Int).is_err());
/// ```
pub fn coerce(raw: &str, kind: ValueKind) -> Result<Value, CoerceError> {
    match kind {
        ValueKind::Bool => parse_bool(raw).map(Value::Bool),
        ValueKind::Str | ValueKind::StrList | ValueKind::Custom => {
            Ok(Value::Str(raw.to_string()))
        }
        ValueKind::Int => parse_int(raw).map(Value::Int),
        ValueKind::Float => parse_float(raw).map(Value::Float),
        ValueKind::StrMap => {
            let (key, value) = split_map_entry(raw)?;
            let mut entries = BTreeMap::new();
            entries.insert(key.to_string(), value.to_string());
            Ok(Value::Map(entries))
        }
    }
}

/// Parses a boolean using the Go `strconv.ParseBool` accepted set.
pub fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(CoerceError::syntax(raw)),
    }
}

fn parse_int(raw: &str) -> Result<i64, CoerceError> {
    raw.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => CoerceError::range(raw),
        _ => CoerceError::syntax(raw),
    })
}

fn parse_float(raw: &str) -> Result<f64, CoerceError> {
    raw.parse::<f64>().map_err(|_| CoerceError::syntax(raw))
}

/// Splits a `key:value` map entry at the first colon.
pub fn split_map_entry(raw: &str) -> Result<(&str, &str), CoerceError> {
    raw.split_once(':').ok_or_else(|| CoerceError::syntax(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_int_invalid_syntax_message() {
        let err = coerce("notint1", ValueKind::Int).unwrap_err();
        assert_eq!(err.to_string(), "parsing \"notint1\": invalid syntax");
    }

    #[test]
    fn test_coerce_int_out_of_range_message() {
        let err = coerce("99999999999999999999", ValueKind::Int).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parsing \"99999999999999999999\": value out of range"
        );
    }

    #[test]
    fn test_parse_bool_accepts_go_literals() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(parse_bool(raw), Ok(true), "{raw}");
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(parse_bool(raw), Ok(false), "{raw}");
        }
        assert!(parse_bool("yes").is_err());
    }

    #[test]
    fn test_coerce_map_entry() {
        let value = coerce("env:prod", ValueKind::StrMap).unwrap();
        let entries = value.as_map().unwrap();
        assert_eq!(entries.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_coerce_map_entry_without_delimiter() {
        let err = coerce("envprod", ValueKind::StrMap).unwrap_err();
        assert_eq!(err.to_string(), "parsing \"envprod\": invalid syntax");
    }

    #[test]
    fn test_coerce_negative_int() {
        assert_eq!(coerce("-3", ValueKind::Int).unwrap(), Value::Int(-3));
    }
}
