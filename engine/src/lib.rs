//! Single-pass argv parsing engine.
//!
//! Binds an argument vector to a declared
//! [`DescriptorTable`](argbind_core::DescriptorTable) in one left-to-right
//! scan: tokenization, option matching, value coercion, choice validation,
//! and positional binding, producing either a populated
//! [`ValueStore`](argbind_core::ValueStore) plus leftover arguments, or a
//! positionally-anchored error.
//!
//! Components:
//!
//! - tokenizer — classifies one raw token (`--opt=val`, `-abc`, `--`,
//!   positional).
//! - matcher — resolves identities against the table, nested groups and
//!   abbreviations included.
//! - value consumer — claims argument tokens, coerces, validates choices,
//!   writes sinks.
//! - positional binder — commits buffered non-option tokens to slots at
//!   end of scan.
//! - [`Parser`] / [`ModeFlags`] — the mode controller driving the scan and
//!   the result collector.
//!
//! # Example
//!
//! ```
//! use argbind_core::{DescriptorTable, OptionDescriptor, PositionalSlot, ValueKind, ValueStore};
//! use argbind_engine::{ModeFlags, Parser};
//!
//! let table = DescriptorTable::new()
//!     .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")))
//!     .with_option(OptionDescriptor::with_value(Some('p'), Some("port"), ValueKind::Int))
//!     .with_positional(PositionalSlot::optional("files", ValueKind::Str).remainder());
//!
//! let parser = Parser::new(table, ModeFlags::new().with_pass_double_dash()).unwrap();
//! let mut store = ValueStore::new();
//! let outcome = parser.parse_args(&mut store, ["-v", "--port=8080", "a.txt", "b.txt"]);
//!
//! assert!(outcome.is_ok());
//! assert_eq!(store.get_bool("verbose"), Some(true));
//! assert_eq!(store.get_int("port"), Some(8080));
//! assert_eq!(store.get_strings("files").unwrap(), vec!["a.txt", "b.txt"]);
//! ```
//!
//! Error message wording (see [`ParseError`]) is a compatibility contract;
//! callers match on suffixes such as `` expected argument for flag `-v' ``.

mod error;
mod matcher;
mod parser;
mod positional;
mod token;

pub use error::ParseError;
pub use parser::{ModeFlags, ParseOutcome, Parser};
