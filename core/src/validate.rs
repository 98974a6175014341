//! Construction-time descriptor table validation.
//!
//! Identity collisions, misplaced remainder slots, and bad defaults are
//! construction-time errors, never parse-time ones. The engine's parser
//! constructor runs [`validate_table`] and refuses an invalid table.
//!
//! # Examples
//!
//! ```
//! use argbind_core::*;
//!
//! let table = DescriptorTable::new()
//!     .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")));
//! assert!(validate_table(&table).is_empty());
//!
//! // Invalid: two options spelled -v
//! let bad = DescriptorTable::new()
//!     .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")))
//!     .with_option(OptionDescriptor::flag(Some('v'), Some("version")));
//! assert!(!validate_table(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{DescriptorTable, OptionDescriptor};
use crate::value::coerce;

/// Structural problems found in a [`DescriptorTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// An option declares neither a short nor a long form.
    #[error("option must define a short or long form")]
    MissingOptionName,
    /// Two options share a spelling or store key.
    #[error("duplicate option: {0}")]
    DuplicateOption(String),
    /// Two positional slots share a name, or a slot name collides with an
    /// option key.
    #[error("duplicate positional slot: {0}")]
    DuplicateSlot(String),
    /// A remainder slot is declared before the last position.
    #[error("remainder slot must be declared last: {0}")]
    RemainderNotLast(String),
    /// More than one remainder slot is declared.
    #[error("multiple remainder slots: {0}")]
    MultipleRemainder(String),
    /// A default value does not coerce to the option's kind.
    #[error("invalid default for option {name}: {reason}")]
    InvalidDefault {
        /// Offending option key.
        name: String,
        /// Underlying conversion diagnostic.
        reason: String,
    },
    /// A default value is not a member of the declared choice set.
    #[error("default for option {name} is not an allowed choice: {value}")]
    DefaultNotInChoices {
        /// Offending option key.
        name: String,
        /// The default value.
        value: String,
    },
    /// A table declares both subcommands and positional slots.
    #[error("a table with subcommands cannot declare positional slots")]
    CommandsWithPositionals,
    /// Two subcommands share a name or alias.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// A subcommand has an empty name.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option group has an empty name.
    #[error("group name cannot be empty")]
    EmptyGroupName,
}

/// Validates a descriptor table, groups and subcommand tables included.
///
/// Returns all problems found, stopping at the first error per category
/// sweep. An empty result means the table is safe to parse against.
pub fn validate_table(table: &DescriptorTable) -> Vec<TableError> {
    let mut errors = Vec::new();

    errors.extend(validate_options(table));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_positionals(table));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_commands(table));

    errors
}

fn validate_options(table: &DescriptorTable) -> Vec<TableError> {
    let mut errors = Vec::new();
    let mut shorts: HashSet<char> = HashSet::new();
    let mut longs: HashSet<&str> = HashSet::new();
    let mut keys: HashSet<String> = HashSet::new();

    for option in table.all_options() {
        if option.short.is_none() && option.long.is_none() {
            errors.push(TableError::MissingOptionName);
            return errors;
        }

        if let Some(short) = option.short {
            if !shorts.insert(short) {
                errors.push(TableError::DuplicateOption(format!("-{short}")));
                return errors;
            }
        }

        if let Some(long) = option.long.as_deref() {
            if !longs.insert(long) {
                errors.push(TableError::DuplicateOption(format!("--{long}")));
                return errors;
            }
        }

        if !keys.insert(option.key()) {
            errors.push(TableError::DuplicateOption(option.key()));
            return errors;
        }

        if let Some(error) = validate_default(option) {
            errors.push(error);
            return errors;
        }
    }

    for group in &table.groups {
        if group.name.trim().is_empty() {
            errors.push(TableError::EmptyGroupName);
            return errors;
        }
    }

    errors
}

fn validate_default(option: &OptionDescriptor) -> Option<TableError> {
    let default = option.default_value.as_deref()?;

    let failure = match &option.parser {
        Some(parser) => parser.parse(default).err(),
        None => coerce(default, option.value_kind).err().map(|e| e.to_string()),
    };
    if let Some(reason) = failure {
        return Some(TableError::InvalidDefault {
            name: option.key(),
            reason,
        });
    }

    if !option.choices.is_empty() && !option.choices.iter().any(|c| c == default) {
        return Some(TableError::DefaultNotInChoices {
            name: option.key(),
            value: default.to_string(),
        });
    }

    None
}

fn validate_positionals(table: &DescriptorTable) -> Vec<TableError> {
    let mut errors = Vec::new();
    let mut keys: HashSet<String> = table.all_options().iter().map(|o| o.key()).collect();
    let mut remainder: Option<&str> = None;

    for slot in &table.positionals {
        if !keys.insert(slot.name.clone()) {
            errors.push(TableError::DuplicateSlot(slot.name.clone()));
            return errors;
        }

        if let Some(first) = remainder {
            // A remainder slot earlier in the list already absorbed
            // everything; any slot after it is unreachable.
            let error = if slot.is_remainder {
                TableError::MultipleRemainder(slot.name.clone())
            } else {
                TableError::RemainderNotLast(first.to_string())
            };
            errors.push(error);
            return errors;
        }

        if slot.is_remainder {
            remainder = Some(&slot.name);
        }
    }

    errors
}

fn validate_commands(table: &DescriptorTable) -> Vec<TableError> {
    let mut errors = Vec::new();

    if table.has_commands() && table.has_positionals() {
        errors.push(TableError::CommandsWithPositionals);
        return errors;
    }

    let mut names: HashSet<&str> = HashSet::new();
    for command in &table.commands {
        if command.name.trim().is_empty() {
            errors.push(TableError::EmptyCommandName);
            return errors;
        }
        if !names.insert(command.name.as_str()) {
            errors.push(TableError::DuplicateCommand(command.name.clone()));
            return errors;
        }
        for alias in &command.aliases {
            if !names.insert(alias.as_str()) {
                errors.push(TableError::DuplicateCommand(alias.clone()));
                return errors;
            }
        }

        errors.extend(validate_table(&command.table));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}
