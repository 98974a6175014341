//! Core descriptor and value types for declarative argv binding.
//!
//! This crate defines the data model consumed by the `argbind-engine`
//! parsing engine:
//!
//! - [`OptionDescriptor`] — a named option with short/long forms, value
//!   kind, choice set, default, and required marker.
//! - [`PositionalSlot`] — a positional argument bound by declaration order,
//!   optionally a variable-length remainder.
//! - [`OptionGroup`] / [`Subcommand`] — nested descriptor tables.
//! - [`DescriptorTable`] — the immutable table a parser is built from.
//! - [`Value`] / [`ValueKind`] / [`coerce`] — the typed value model and
//!   Go-`strconv`-compatible string conversion.
//! - [`ValueStore`] — the caller-owned sink parsed values are written to.
//!
//! Validation ([`validate_table`]) catches construction-time errors such as
//! duplicate option identities and misplaced remainder slots.
//!
//! # Example
//!
//! ```
//! use argbind_core::*;
//!
//! let table = DescriptorTable::new()
//!     .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")))
//!     .with_option(
//!         OptionDescriptor::with_value(Some('f'), Some("format"), ValueKind::Str)
//!             .with_choices(&["json", "yaml"])
//!             .with_default("json"),
//!     )
//!     .with_positional(PositionalSlot::optional("files", ValueKind::Str).remainder());
//!
//! assert!(validate_table(&table).is_empty());
//! assert!(table.find_long("format").is_some());
//! ```

mod store;
mod types;
mod validate;
mod value;

pub use store::ValueStore;
pub use types::{
    CustomParser, DescriptorTable, OptionDescriptor, OptionGroup, PositionalSlot, Subcommand,
};
pub use validate::{TableError, validate_table};
pub use value::{CoerceError, Value, ValueKind, coerce, parse_bool, split_map_entry};
