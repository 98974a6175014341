//! Parse error types.
//!
//! Message wording is a compatibility contract: callers match on exact
//! suffixes such as `` expected argument for flag `-v' `` and
//! `Allowed values are: val1, val2 or val3`. Do not reword without
//! updating the consumers documented in the crate root.

use thiserror::Error;

/// A terminal parse failure.
///
/// The first error encountered stops the parse; tokens scanned but not
/// bound are surfaced as leftovers alongside it in the
/// [`ParseOutcome`](crate::ParseOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// An option token did not resolve against the descriptor table.
    ///
    /// `flag` carries the spelling as typed, dashes included.
    #[error("unknown flag `{flag}'")]
    UnknownOption {
        /// The unrecognized spelling.
        flag: String,
    },

    /// A value-taking option was the last token of the input.
    #[error("expected argument for flag `{flag}'")]
    MissingArgument {
        /// The option spelling as typed.
        flag: String,
    },

    /// A value failed type conversion.
    ///
    /// Displays as `invalid value for <context>: parsing "<literal>":
    /// <detail>`; the suffix matches the Go `strconv` wording.
    #[error("invalid value for {context}: parsing \"{literal}\": {detail}")]
    InvalidValue {
        /// What was being bound, e.g. `` flag `-p' `` or `` argument `rest' ``.
        context: String,
        /// The offending input, verbatim.
        literal: String,
        /// Conversion diagnostic.
        detail: String,
    },

    /// A value was not a member of the declared choice set.
    #[error("Invalid value `{value}' for flag `{flag}'. Allowed values are: {}", join_or(allowed))]
    InvalidChoice {
        /// The option spelling as typed.
        flag: String,
        /// The rejected value.
        value: String,
        /// The allowed values, in declared order.
        allowed: Vec<String>,
    },

    /// A required positional slot received no token.
    #[error("the required argument `{}' was not provided", slot_label(name, *at_least_one))]
    MissingRequiredPositional {
        /// Slot name.
        name: String,
        /// Whether the slot is a remainder needing at least one token.
        at_least_one: bool,
    },

    /// A required option was never given and holds no value.
    #[error("the required flag `{flag}' was not specified")]
    MissingRequiredOption {
        /// The option's canonical spelling.
        flag: String,
    },

    /// An abbreviated long option matched more than one descriptor.
    #[error("ambiguous flag `{flag}': could match {}", join_or(candidates))]
    AmbiguousOption {
        /// The abbreviated spelling as typed.
        flag: String,
        /// Full spellings of every candidate.
        candidates: Vec<String>,
    },

    /// The first non-option token did not name a declared subcommand.
    #[error("Unknown command `{name}'")]
    UnknownCommand {
        /// The offending token.
        name: String,
    },
}

/// Joins values with commas, the final pair with "or".
///
/// `["a"]` → `a`; `["a","b"]` → `a or b`; `["a","b","c"]` → `a, b or c`.
pub(crate) fn join_or(values: &[String]) -> String {
    match values {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn slot_label(name: &str, at_least_one: bool) -> String {
    if at_least_one {
        format!("{name} (at least 1 argument)")
    } else {
        name.to_string()
    }
}
