//! Positional binder: commits buffered non-option tokens to declared slots
//! once scanning finishes.

use argbind_core::{PositionalSlot, Value, ValueStore, coerce};

use crate::error::ParseError;

/// Binds buffered positional candidates to slots in declared order.
///
/// Binding is atomic: values are staged and committed to the store only if
/// every coercion succeeds, so a failure leaves the store untouched and the
/// whole candidate sequence available as leftovers. On success, returns the
/// candidates no slot consumed (in original order).
///
/// An optional slot is skipped when handing it a token would starve a
/// required slot declared after it.
pub fn bind_positionals(
    slots: &[PositionalSlot],
    buffered: &[(usize, String)],
    store: &mut ValueStore,
    key_prefix: &str,
) -> Result<Vec<(usize, String)>, ParseError> {
    let mut staged: Vec<(String, Value)> = Vec::new();
    let mut cursor = 0usize;

    for (index, slot) in slots.iter().enumerate() {
        let key = format!("{key_prefix}{}", slot.name);
        if slot.is_remainder {
            let rest = &buffered[cursor..];
            if slot.required && rest.is_empty() {
                return Err(ParseError::MissingRequiredPositional {
                    name: slot.name.clone(),
                    at_least_one: true,
                });
            }
            let mut elements = Vec::with_capacity(rest.len());
            for (_, token) in rest {
                elements.push(coerce_slot(slot, token)?);
            }
            staged.push((key, Value::List(elements)));
            cursor = buffered.len();
            continue;
        }

        let available = buffered.len() - cursor;
        if available == 0 {
            if slot.required {
                return Err(ParseError::MissingRequiredPositional {
                    name: slot.name.clone(),
                    at_least_one: false,
                });
            }
            continue;
        }
        if !slot.required && available <= required_after(slots, index) {
            continue;
        }

        let (_, token) = &buffered[cursor];
        staged.push((key, coerce_slot(slot, token)?));
        cursor += 1;
    }

    for (key, value) in staged {
        store.set(&key, value);
    }
    Ok(buffered[cursor..].to_vec())
}

fn required_after(slots: &[PositionalSlot], index: usize) -> usize {
    slots[index + 1..].iter().filter(|s| s.required).count()
}

fn coerce_slot(slot: &PositionalSlot, token: &str) -> Result<Value, ParseError> {
    coerce(token, slot.value_kind).map_err(|err| ParseError::InvalidValue {
        context: format!("argument `{}'", slot.name),
        literal: err.literal,
        detail: err.detail.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argbind_core::ValueKind;

    fn candidates(tokens: &[&str]) -> Vec<(usize, String)> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.to_string()))
            .collect()
    }

    #[test]
    fn test_binds_in_declared_order() {
        let slots = vec![
            PositionalSlot::required("src", ValueKind::Str),
            PositionalSlot::required("dest", ValueKind::Str),
        ];
        let mut store = ValueStore::new();
        let unbound =
            bind_positionals(&slots, &candidates(&["a", "b", "c"]), &mut store, "").unwrap();

        assert_eq!(store.get_str("src"), Some("a"));
        assert_eq!(store.get_str("dest"), Some("b"));
        assert_eq!(unbound, vec![(2, "c".to_string())]);
    }

    #[test]
    fn test_remainder_collects_rest_with_coercion() {
        let slots = vec![PositionalSlot::required("rest", ValueKind::Int).remainder()];
        let mut store = ValueStore::new();
        let unbound =
            bind_positionals(&slots, &candidates(&["1", "2", "3"]), &mut store, "").unwrap();

        assert!(unbound.is_empty());
        assert_eq!(store.get_ints("rest").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failed_coercion_commits_nothing() {
        let slots = vec![
            PositionalSlot::required("first", ValueKind::Str),
            PositionalSlot::required("rest", ValueKind::Int).remainder(),
        ];
        let mut store = ValueStore::new();
        let err = bind_positionals(&slots, &candidates(&["a", "1", "x"]), &mut store, "")
            .unwrap_err();

        assert!(err.to_string().ends_with("x\": invalid syntax"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_required_remainder_needs_one_token() {
        let slots = vec![PositionalSlot::required("rest", ValueKind::Str).remainder()];
        let mut store = ValueStore::new();
        let err = bind_positionals(&slots, &[], &mut store, "").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the required argument `rest (at least 1 argument)' was not provided"
        );
    }

    #[test]
    fn test_optional_slot_yields_to_later_required() {
        let slots = vec![
            PositionalSlot::optional("maybe", ValueKind::Str),
            PositionalSlot::required("must", ValueKind::Str),
        ];
        let mut store = ValueStore::new();
        bind_positionals(&slots, &candidates(&["only"]), &mut store, "").unwrap();

        assert!(!store.is_set("maybe"));
        assert_eq!(store.get_str("must"), Some("only"));
    }

    #[test]
    fn test_no_slots_leaves_everything_unbound() {
        let mut store = ValueStore::new();
        let unbound = bind_positionals(&[], &candidates(&["a", "b"]), &mut store, "").unwrap();
        assert_eq!(unbound.len(), 2);
        assert!(store.is_empty());
    }
}
