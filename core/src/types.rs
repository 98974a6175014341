//! Descriptor type definitions for argv binding.
//!
//! This module defines the declarative data model consumed by the parsing
//! engine: options, positional slots, option groups, and subcommands,
//! assembled into a [`DescriptorTable`]. The types serialize with [`serde`]
//! so a table can be loaded from a JSON spec file.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueKind};

/// A caller-supplied conversion function for [`ValueKind::Custom`] options.
///
/// The function receives the raw argument string and returns either the
/// converted [`Value`] or a diagnostic string surfaced in the parse error.
#[derive(Clone)]
pub struct CustomParser(Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>);

impl CustomParser {
    /// Wraps a conversion function.
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        CustomParser(Arc::new(parse))
    }

    /// Applies the conversion to a raw argument string.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        (self.0)(raw)
    }
}

impl fmt::Debug for CustomParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomParser(..)")
    }
}

/// Descriptor for a named option.
///
/// An option has a short form (e.g. `-v`) and/or a long form (e.g.
/// `--verbose`), a value kind, and optional constraints: a choice set, a
/// default, and a required marker.
///
/// Use the constructors [`flag`](OptionDescriptor::flag) and
/// [`with_value`](OptionDescriptor::with_value), then chain builder methods.
///
/// # Examples
///
/// ```
/// use argbind_core::{OptionDescriptor, ValueKind};
///
/// let verbose = OptionDescriptor::flag(Some('v'), Some("verbose"))
///     .with_description("Enable verbose output");
/// assert_eq!(verbose.key(), "verbose");
/// assert_eq!(verbose.display_name(), "--verbose");
/// assert!(!verbose.takes_value());
///
/// let port = OptionDescriptor::with_value(Some('p'), Some("port"), ValueKind::Int)
///     .with_default("8080");
/// assert!(port.takes_value());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Short form character (spelled `-v` on the command line).
    #[serde(default)]
    pub short: Option<char>,
    /// Long form name, without the leading dashes.
    #[serde(default)]
    pub long: Option<String>,
    /// Kind of value the option accepts.
    #[serde(default)]
    pub value_kind: ValueKind,
    /// Whether the option must appear (or already hold a value).
    #[serde(default)]
    pub required: bool,
    /// Allowed string representations, in declared order; empty means
    /// unconstrained.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Raw default, coerced into the store when the option is not given.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Whether repeated occurrences are expected (implied by list and map
    /// kinds; repeated scalars overwrite).
    #[serde(default)]
    pub can_repeat: bool,
    /// Description for diagnostics and generated output.
    #[serde(default)]
    pub description: Option<String>,
    /// Conversion function for [`ValueKind::Custom`].
    #[serde(skip)]
    pub parser: Option<CustomParser>,
}

impl OptionDescriptor {
    /// Creates a boolean switch (no argument).
    ///
    /// # Examples
    ///
    /// ```
    /// use argbind_core::OptionDescriptor;
    ///
    /// let flag = OptionDescriptor::flag(Some('v'), None);
    /// assert_eq!(flag.key(), "v");
    /// assert_eq!(flag.display_name(), "-v");
    /// ```
    pub fn flag(short: Option<char>, long: Option<&str>) -> Self {
        Self::with_value(short, long, ValueKind::Bool)
    }

    /// Creates an option that takes a value of the given kind.
    pub fn with_value(short: Option<char>, long: Option<&str>, value_kind: ValueKind) -> Self {
        OptionDescriptor {
            short,
            long: long.map(String::from),
            value_kind,
            required: false,
            choices: Vec::new(),
            default_value: None,
            can_repeat: value_kind.accumulates(),
            description: None,
            parser: None,
        }
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Constrains values to the given choice set, in declared order.
    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Sets a default value, applied when the option is not given.
    pub fn with_default(mut self, default: &str) -> Self {
        self.default_value = Some(default.to_string());
        self
    }

    /// Marks the option as repeatable.
    pub fn repeatable(mut self) -> Self {
        self.can_repeat = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Attaches a custom conversion function and sets the kind to
    /// [`ValueKind::Custom`].
    pub fn with_parser(mut self, parser: CustomParser) -> Self {
        self.value_kind = ValueKind::Custom;
        self.parser = Some(parser);
        self
    }

    /// Store key: the long name when present, otherwise the short character.
    pub fn key(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::new(),
        }
    }

    /// User-facing spelling: `--long` when present, otherwise `-s`.
    pub fn display_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => String::new(),
        }
    }

    /// Whether this option consumes an argument token.
    pub fn takes_value(&self) -> bool {
        self.value_kind.takes_value()
    }
}

/// Descriptor for a positional slot, bound by order rather than by name.
///
/// # Examples
///
/// ```
/// use argbind_core::{PositionalSlot, ValueKind};
///
/// let src = PositionalSlot::required("source", ValueKind::Str);
/// assert!(src.required);
///
/// let rest = PositionalSlot::required("rest", ValueKind::Int).remainder();
/// assert!(rest.is_remainder);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionalSlot {
    /// Slot name, used as the store key and in diagnostics.
    pub name: String,
    /// Kind applied to each bound token.
    #[serde(default)]
    pub value_kind: ValueKind,
    /// Whether the slot must receive at least one token.
    #[serde(default)]
    pub required: bool,
    /// Whether the slot absorbs all remaining non-option tokens.
    #[serde(default)]
    pub is_remainder: bool,
    /// Description for diagnostics and generated output.
    #[serde(default)]
    pub description: Option<String>,
}

impl PositionalSlot {
    /// Creates a required slot.
    pub fn required(name: &str, value_kind: ValueKind) -> Self {
        PositionalSlot {
            name: name.to_string(),
            value_kind,
            required: true,
            is_remainder: false,
            description: None,
        }
    }

    /// Creates an optional slot.
    pub fn optional(name: &str, value_kind: ValueKind) -> Self {
        PositionalSlot {
            required: false,
            ..Self::required(name, value_kind)
        }
    }

    /// Marks the slot as a variable-length remainder. Must be declared last.
    pub fn remainder(mut self) -> Self {
        self.is_remainder = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// A named group of options nested inside a [`DescriptorTable`].
///
/// Groups share the identity namespace of the enclosing table; they exist
/// for organization, and matching traverses them recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionGroup {
    /// Group name.
    pub name: String,
    /// Nested descriptor table (options and further groups).
    #[serde(default)]
    pub table: DescriptorTable,
}

impl OptionGroup {
    /// Creates a group around a nested table.
    pub fn new(name: &str, table: DescriptorTable) -> Self {
        OptionGroup {
            name: name.to_string(),
            table,
        }
    }
}

/// A subcommand with its own descriptor table.
///
/// When a table declares subcommands, the first non-option token selects
/// one and the rest of the argument vector is parsed against its table.
///
/// # Examples
///
/// ```
/// use argbind_core::{DescriptorTable, OptionDescriptor, Subcommand, ValueKind};
///
/// let commit = Subcommand::new(
///     "commit",
///     DescriptorTable::new().with_option(
///         OptionDescriptor::with_value(Some('m'), Some("message"), ValueKind::Str),
///     ),
/// )
/// .with_alias("ci");
/// assert!(commit.matches("ci"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcommand {
    /// Command name.
    pub name: String,
    /// Alternative names.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Descriptor table scoped to this command.
    #[serde(default)]
    pub table: DescriptorTable,
    /// Description for diagnostics and generated output.
    #[serde(default)]
    pub description: Option<String>,
}

impl Subcommand {
    /// Creates a subcommand with the given name and table.
    pub fn new(name: &str, table: DescriptorTable) -> Self {
        Subcommand {
            name: name.to_string(),
            aliases: Vec::new(),
            table,
            description: None,
        }
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Checks whether a token selects this command (name or alias).
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }
}

/// The immutable descriptor table consumed by the parsing engine.
///
/// Built once per parser, reused across parse calls. Identity lookups
/// traverse nested groups recursively; subcommands carry their own tables.
///
/// # Examples
///
/// ```
/// use argbind_core::{DescriptorTable, OptionDescriptor, PositionalSlot, ValueKind};
///
/// let table = DescriptorTable::new()
///     .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")))
///     .with_positional(PositionalSlot::required("file", ValueKind::Str));
///
/// assert!(table.find_short('v').is_some());
/// assert!(table.find_long("verbose").is_some());
/// assert!(table.find_long("debug").is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DescriptorTable {
    /// Options declared directly on this table.
    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
    /// Nested option groups.
    #[serde(default)]
    pub groups: Vec<OptionGroup>,
    /// Subcommands.
    #[serde(default)]
    pub commands: Vec<Subcommand>,
    /// Positional slots, in binding order.
    #[serde(default)]
    pub positionals: Vec<PositionalSlot>,
}

impl DescriptorTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OptionDescriptor) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a nested group.
    pub fn with_group(mut self, group: OptionGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a subcommand.
    pub fn with_command(mut self, command: Subcommand) -> Self {
        self.commands.push(command);
        self
    }

    /// Adds a positional slot.
    pub fn with_positional(mut self, slot: PositionalSlot) -> Self {
        self.positionals.push(slot);
        self
    }

    /// Resolves a short option, searching groups depth-first.
    pub fn find_short(&self, short: char) -> Option<&OptionDescriptor> {
        self.options
            .iter()
            .find(|o| o.short == Some(short))
            .or_else(|| self.groups.iter().find_map(|g| g.table.find_short(short)))
    }

    /// Resolves a long option by exact name, searching groups depth-first.
    pub fn find_long(&self, long: &str) -> Option<&OptionDescriptor> {
        self.options
            .iter()
            .find(|o| o.long.as_deref() == Some(long))
            .or_else(|| self.groups.iter().find_map(|g| g.table.find_long(long)))
    }

    /// Collects options whose long name starts with the given prefix.
    ///
    /// Used by the abbreviated-matching extension; exact matches are the
    /// caller's concern via [`find_long`](DescriptorTable::find_long).
    pub fn find_long_prefix(&self, prefix: &str) -> Vec<&OptionDescriptor> {
        let mut found: Vec<&OptionDescriptor> = self
            .options
            .iter()
            .filter(|o| o.long.as_deref().is_some_and(|l| l.starts_with(prefix)))
            .collect();
        for group in &self.groups {
            found.extend(group.table.find_long_prefix(prefix));
        }
        found
    }

    /// Finds a subcommand by name or alias.
    pub fn find_command(&self, token: &str) -> Option<&Subcommand> {
        self.commands.iter().find(|c| c.matches(token))
    }

    /// Collects every option declared on this table or a nested group.
    pub fn all_options(&self) -> Vec<&OptionDescriptor> {
        let mut all: Vec<&OptionDescriptor> = self.options.iter().collect();
        for group in &self.groups {
            all.extend(group.table.all_options());
        }
        all
    }

    /// Whether any subcommands are declared.
    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Whether any positional slots are declared.
    pub fn has_positionals(&self) -> bool {
        !self.positionals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_key_prefers_long() {
        let opt = OptionDescriptor::flag(Some('v'), Some("verbose"));
        assert_eq!(opt.key(), "verbose");
        assert_eq!(opt.display_name(), "--verbose");

        let short_only = OptionDescriptor::flag(Some('v'), None);
        assert_eq!(short_only.key(), "v");
        assert_eq!(short_only.display_name(), "-v");
    }

    #[test]
    fn test_find_option_through_groups() {
        let table = DescriptorTable::new()
            .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")))
            .with_group(OptionGroup::new(
                "output",
                DescriptorTable::new().with_option(OptionDescriptor::with_value(
                    Some('o'),
                    Some("output"),
                    ValueKind::Str,
                )),
            ));

        assert!(table.find_short('o').is_some());
        assert!(table.find_long("output").is_some());
        assert_eq!(table.all_options().len(), 2);
    }

    #[test]
    fn test_long_prefix_collection() {
        let table = DescriptorTable::new()
            .with_option(OptionDescriptor::flag(None, Some("verbose")))
            .with_option(OptionDescriptor::flag(None, Some("version")));

        assert_eq!(table.find_long_prefix("ver").len(), 2);
        assert_eq!(table.find_long_prefix("verb").len(), 1);
        assert!(table.find_long_prefix("x").is_empty());
    }

    #[test]
    fn test_command_alias_matching() {
        let table = DescriptorTable::new()
            .with_command(Subcommand::new("commit", DescriptorTable::new()).with_alias("ci"));

        assert!(table.find_command("commit").is_some());
        assert!(table.find_command("ci").is_some());
        assert!(table.find_command("push").is_none());
    }

    #[test]
    fn test_table_deserializes_from_json_spec() {
        let spec = r#"{
            "options": [
                {"short": "v", "long": "verbose"},
                {"long": "port", "value_kind": "int", "default_value": "8080"}
            ],
            "positionals": [
                {"name": "rest", "value_kind": "str", "required": true, "is_remainder": true}
            ]
        }"#;
        let table: DescriptorTable = serde_json::from_str(spec).unwrap();
        assert!(table.find_short('v').is_some());
        assert_eq!(
            table.find_long("port").unwrap().default_value.as_deref(),
            Some("8080")
        );
        assert!(table.positionals[0].is_remainder);
    }
}
