//! The caller-owned value sink populated by the parsing engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Parsed values, keyed by option key or positional slot name.
///
/// The store is caller-owned and persists across parse calls; list and map
/// entries accumulate on repeated calls rather than being replaced. Call
/// [`clear`](ValueStore::clear) between invocations for idempotent
/// re-parsing. Subcommand values live under `"<command>.<key>"`.
///
/// # Examples
///
/// ```
/// use argbind_core::{Value, ValueStore};
///
/// let mut store = ValueStore::new();
/// store.set("verbose", Value::Bool(true));
/// store.append("include", Value::Str("src".into()));
/// store.append("include", Value::Str("tests".into()));
///
/// assert_eq!(store.get_bool("verbose"), Some(true));
/// assert_eq!(store.get_strings("include").unwrap(), vec!["src", "tests"]);
/// assert!(!store.is_set("quiet"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    values: BTreeMap<String, Value>,
}

impl ValueStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous one.
    pub fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Appends an element to the list under `key`, creating it if absent.
    ///
    /// A non-list value already under the key is replaced by a fresh list.
    pub fn append(&mut self, key: &str, element: Value) {
        match self.values.get_mut(key) {
            Some(Value::List(items)) => items.push(element),
            _ => {
                self.values
                    .insert(key.to_string(), Value::List(vec![element]));
            }
        }
    }

    /// Inserts one entry into the map under `key`, creating it if absent.
    ///
    /// A non-map value already under the key is replaced by a fresh map.
    pub fn insert_entry(&mut self, key: &str, entry_key: &str, entry_value: &str) {
        match self.values.get_mut(key) {
            Some(Value::Map(entries)) => {
                entries.insert(entry_key.to_string(), entry_value.to_string());
            }
            _ => {
                let mut entries = BTreeMap::new();
                entries.insert(entry_key.to_string(), entry_value.to_string());
                self.values.insert(key.to_string(), Value::Map(entries));
            }
        }
    }

    /// Looks up a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Looks up a boolean value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Looks up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Looks up an integer value.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Looks up a float value.
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_float)
    }

    /// Looks up a list value.
    pub fn get_list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Looks up a list of strings, failing if any element is not a string.
    pub fn get_strings(&self, key: &str) -> Option<Vec<&str>> {
        self.get_list(key)?.iter().map(Value::as_str).collect()
    }

    /// Looks up a list of integers, failing if any element is not an integer.
    pub fn get_ints(&self, key: &str) -> Option<Vec<i64>> {
        self.get_list(key)?.iter().map(Value::as_int).collect()
    }

    /// Looks up a map value.
    pub fn get_map(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.get(key).and_then(Value::as_map)
    }

    /// Whether a value is present under the key.
    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Removes every stored value.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
