//! Option matcher: resolves tokenized identities against the descriptor
//! table. Matching is pure lookup; unknown-option policy and value
//! consumption are the parser's concern.

use argbind_core::{DescriptorTable, OptionDescriptor};

/// Result of resolving a long option identity.
#[derive(Debug)]
pub enum LongMatch<'t> {
    /// Exactly one descriptor matched.
    Found(&'t OptionDescriptor),
    /// No descriptor matched.
    Unknown,
    /// Abbreviated matching found several candidates; carries their full
    /// spellings in declaration order.
    Ambiguous(Vec<String>),
}

/// Resolves a long option name, searching nested groups.
///
/// With `allow_abbrev`, a name that matches no option exactly may resolve
/// as a unique prefix of one declared long name; two or more prefix
/// candidates are ambiguous.
pub fn resolve_long<'t>(
    table: &'t DescriptorTable,
    name: &str,
    allow_abbrev: bool,
) -> LongMatch<'t> {
    if let Some(option) = table.find_long(name) {
        return LongMatch::Found(option);
    }
    if !allow_abbrev || name.is_empty() {
        return LongMatch::Unknown;
    }

    let candidates = table.find_long_prefix(name);
    match candidates.as_slice() {
        [] => LongMatch::Unknown,
        [only] => LongMatch::Found(only),
        many => LongMatch::Ambiguous(many.iter().map(|o| o.display_name()).collect()),
    }
}

/// Resolves a short option character, searching nested groups.
pub fn resolve_short(table: &DescriptorTable, short: char) -> Option<&OptionDescriptor> {
    table.find_short(short)
}
