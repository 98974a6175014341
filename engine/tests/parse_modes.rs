//! Mode-controller behavior: `--` termination, stop-at-first-non-option,
//! and the exact leftover/error contracts for each.

use argbind_core::{DescriptorTable, OptionDescriptor, PositionalSlot, ValueKind, ValueStore};
use argbind_engine::{ModeFlags, Parser};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bool_v() -> DescriptorTable {
    DescriptorTable::new().with_option(OptionDescriptor::flag(Some('v'), None))
}

fn parser(table: DescriptorTable, modes: ModeFlags) -> Parser {
    Parser::new(table, modes).unwrap()
}

fn no_leftovers() -> Vec<String> {
    Vec::new()
}

// ---------------------------------------------------------------------------
// Double dash termination
// ---------------------------------------------------------------------------

#[test]
fn test_pass_double_dash() {
    let p = parser(bool_v(), ModeFlags::new().with_pass_double_dash());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "--", "-v", "-g"]);

    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error);
    assert_eq!(store.get_bool("v"), Some(true));
    assert_eq!(outcome.leftovers, vec!["-v", "-g"]);
}

#[test]
fn test_double_dash_consumed_exactly_once() {
    let p = parser(bool_v(), ModeFlags::new().with_pass_double_dash());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["--", "--", "-v"]);

    assert!(outcome.is_ok());
    // The second -- is an ordinary passthrough token.
    assert_eq!(outcome.leftovers, vec!["--", "-v"]);
    assert!(!store.is_set("v"));
}

#[test]
fn test_double_dash_is_ordinary_without_mode() {
    let p = parser(bool_v(), ModeFlags::new());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["--", "-v"]);

    assert!(outcome.is_ok());
    assert_eq!(outcome.leftovers, vec!["--"]);
    // Scanning continued past the bare --, so -v was still matched.
    assert_eq!(store.get_bool("v"), Some(true));
}

// ---------------------------------------------------------------------------
// Stop at first non-option
// ---------------------------------------------------------------------------

#[test]
fn test_pass_after_non_option() {
    let p = parser(bool_v(), ModeFlags::new().with_pass_after_non_option());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "arg", "-v", "-g"]);

    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error);
    assert_eq!(store.get_bool("v"), Some(true));
    assert_eq!(outcome.leftovers, vec!["arg", "-v", "-g"]);
}

#[test]
fn test_pass_after_non_option_with_positional() {
    let table = bool_v()
        .with_positional(PositionalSlot::required("rest", ValueKind::Str).remainder());
    let p = parser(table, ModeFlags::new().with_pass_after_non_option());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "arg", "-v", "-g"]);

    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error);
    assert_eq!(store.get_bool("v"), Some(true));
    assert_eq!(outcome.leftovers, no_leftovers());
    assert_eq!(store.get_strings("rest").unwrap(), vec!["arg", "-v", "-g"]);
}

#[test]
fn test_pass_after_non_option_with_positional_int_pass() {
    let table = bool_v()
        .with_positional(PositionalSlot::required("rest", ValueKind::Int).remainder());
    let p = parser(table, ModeFlags::new().with_pass_after_non_option());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "1", "2", "3"]);

    assert!(outcome.is_ok(), "unexpected error: {:?}", outcome.error);
    assert_eq!(store.get_bool("v"), Some(true));
    assert_eq!(outcome.leftovers, no_leftovers());
    assert_eq!(store.get_ints("rest").unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_pass_after_non_option_with_positional_int_fail() {
    struct Case {
        args: &'static [&'static str],
        err_suffix: &'static str,
        leftovers: &'static [&'static str],
    }
    let cases = [
        Case {
            args: &["-v", "notint1", "notint2", "notint3"],
            err_suffix: "notint1\": invalid syntax",
            leftovers: &["notint1", "notint2", "notint3"],
        },
        Case {
            args: &["-v", "1", "notint2", "notint3"],
            err_suffix: "notint2\": invalid syntax",
            leftovers: &["1", "notint2", "notint3"],
        },
    ];

    for case in cases {
        let table = bool_v()
            .with_positional(PositionalSlot::required("rest", ValueKind::Int).remainder());
        let p = parser(table, ModeFlags::new().with_pass_after_non_option());
        let mut store = ValueStore::new();

        let outcome = p.parse_args(&mut store, case.args.iter().copied());

        let error = outcome.error.expect("expected error");
        assert!(
            error.to_string().ends_with(case.err_suffix),
            "expected the first illegal argument in the error, got: {error}"
        );
        assert_eq!(outcome.leftovers, case.leftovers);
    }
}

// ---------------------------------------------------------------------------
// Combined modes
// ---------------------------------------------------------------------------

#[test]
fn test_double_dash_wins_during_scanning() {
    let modes = ModeFlags::new()
        .with_pass_double_dash()
        .with_pass_after_non_option();
    let p = parser(bool_v(), modes);
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "--", "arg", "-g"]);

    assert!(outcome.is_ok());
    assert_eq!(store.get_bool("v"), Some(true));
    assert_eq!(outcome.leftovers, vec!["arg", "-g"]);
}

#[test]
fn test_double_dash_after_stop_is_verbatim() {
    let modes = ModeFlags::new()
        .with_pass_double_dash()
        .with_pass_after_non_option();
    let p = parser(bool_v(), modes);
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "arg", "--", "-g"]);

    assert!(outcome.is_ok());
    // Once stopped at the first non-option, a later -- is just a token.
    assert_eq!(outcome.leftovers, vec!["arg", "--", "-g"]);
}

// ---------------------------------------------------------------------------
// Choice-constrained options (error message contracts)
// ---------------------------------------------------------------------------

#[test]
fn test_pass_no_choice() {
    let table = DescriptorTable::new().with_option(
        OptionDescriptor::with_value(Some('v'), None, ValueKind::Str).with_choices(&["val"]),
    );
    let p = parser(table, ModeFlags::new().with_pass_after_non_option());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v"]);

    let error = outcome.error.expect("expected error");
    assert!(
        error.to_string().ends_with("expected argument for flag `-v'"),
        "got: {error}"
    );
}

#[test]
fn test_pass_invalid_choice() {
    let table = DescriptorTable::new().with_option(
        OptionDescriptor::with_value(Some('v'), None, ValueKind::Str)
            .with_choices(&["val1", "val2", "val3"]),
    );
    let p = parser(table, ModeFlags::new().with_pass_after_non_option());
    let mut store = ValueStore::new();

    let outcome = p.parse_args(&mut store, ["-v", "v"]);

    let error = outcome.error.expect("expected error");
    assert!(
        error
            .to_string()
            .ends_with("Allowed values are: val1, val2 or val3"),
        "expected list of allowed values in the error, got: {error}"
    );
}
