//! Parse driver: the mode controller that walks the argument vector and
//! routes each token to the matcher, value consumer, or positional buffer,
//! and the result collector that assembles leftovers.

use std::collections::HashSet;

use tracing::{debug, trace};

use argbind_core::{
    CoerceError, DescriptorTable, OptionDescriptor, Subcommand, TableError, Value, ValueKind,
    ValueStore, coerce, split_map_entry, validate_table,
};

use crate::error::ParseError;
use crate::matcher::{LongMatch, resolve_long, resolve_short};
use crate::positional::bind_positionals;
use crate::token::{Token, classify};

/// Behavioral modes, fixed at parser construction.
///
/// All modes default to off; combine them with the chainable setters.
///
/// # Examples
///
/// ```
/// use argbind_engine::ModeFlags;
///
/// let modes = ModeFlags::new()
///     .with_pass_double_dash()
///     .with_ignore_unknown();
/// assert!(modes.pass_double_dash);
/// assert!(!modes.pass_after_non_option);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// Honor an explicit `--` terminator; everything after it bypasses
    /// option matching.
    pub pass_double_dash: bool,
    /// Stop option matching at the first non-option token.
    pub pass_after_non_option: bool,
    /// Unknown options become leftovers instead of errors.
    pub ignore_unknown: bool,
    /// Optional extension: resolve unique abbreviations of long options.
    pub match_abbrev: bool,
}

impl ModeFlags {
    /// All modes off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the `--` terminator.
    pub fn with_pass_double_dash(mut self) -> Self {
        self.pass_double_dash = true;
        self
    }

    /// Enables stopping at the first non-option token.
    pub fn with_pass_after_non_option(mut self) -> Self {
        self.pass_after_non_option = true;
        self
    }

    /// Enables unknown-option passthrough.
    pub fn with_ignore_unknown(mut self) -> Self {
        self.ignore_unknown = true;
        self
    }

    /// Enables abbreviated long-option matching.
    pub fn with_match_abbrev(mut self) -> Self {
        self.match_abbrev = true;
        self
    }
}

/// Result of one parse call.
///
/// Option values already written to the store before a failure remain
/// written; parsing is not transactional.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// Tokens never bound to any option or slot, in original order.
    pub leftovers: Vec<String>,
    /// Dispatched subcommand path (space-joined when nested), if any.
    pub command: Option<String>,
    /// The first error encountered, if any.
    pub error: Option<ParseError>,
}

impl ParseOutcome {
    /// Whether the parse finished without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, keeping the leftovers on success.
    pub fn into_result(self) -> Result<Vec<String>, ParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.leftovers),
        }
    }
}

/// Scan phase. `Scanning` classifies and matches tokens; both terminal
/// phases buffer every remaining token verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scanning,
    TerminatedByDoubleDash,
    StoppedAtNonOption,
}

/// Mutable state scoped to one parse call.
struct ParseState {
    args: Vec<String>,
    cursor: usize,
    phase: Phase,
    /// Positional candidates, with their original argv index.
    buffered: Vec<(usize, String)>,
    /// Ignored-unknown leftovers, with their original argv index.
    deferred: Vec<(usize, String)>,
    /// Index of the token most recently claimed as an option value.
    last_claimed: Option<usize>,
    /// Store keys written this call, for required/default sweeps.
    seen: HashSet<String>,
}

impl ParseState {
    fn new(args: Vec<String>) -> Self {
        ParseState {
            args,
            cursor: 0,
            phase: Phase::Scanning,
            buffered: Vec::new(),
            deferred: Vec::new(),
            last_claimed: None,
            seen: HashSet::new(),
        }
    }

    fn next(&mut self) -> Option<(usize, String)> {
        if self.cursor >= self.args.len() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        self.last_claimed = None;
        Some((index, self.args[index].clone()))
    }

    /// Claims the next token as an option value, regardless of its shape.
    fn claim_next(&mut self) -> Option<String> {
        if self.cursor >= self.args.len() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        self.last_claimed = Some(index);
        Some(self.args[index].clone())
    }
}

/// A parser bound to one descriptor table and a fixed set of modes.
///
/// The table is validated at construction and immutable afterwards; each
/// [`parse_args`](Parser::parse_args) call owns fresh scan state, so a
/// parser may serve multiple calls (with distinct stores) concurrently.
///
/// # Examples
///
/// ```
/// use argbind_core::{DescriptorTable, OptionDescriptor, ValueStore};
/// use argbind_engine::{ModeFlags, Parser};
///
/// let table = DescriptorTable::new()
///     .with_option(OptionDescriptor::flag(Some('v'), Some("verbose")));
/// let parser = Parser::new(table, ModeFlags::new()).unwrap();
///
/// let mut store = ValueStore::new();
/// let outcome = parser.parse_args(&mut store, ["-v", "file.txt"]);
/// assert!(outcome.is_ok());
/// assert_eq!(store.get_bool("verbose"), Some(true));
/// assert_eq!(outcome.leftovers, vec!["file.txt"]);
/// ```
#[derive(Debug)]
pub struct Parser {
    table: DescriptorTable,
    modes: ModeFlags,
}

impl Parser {
    /// Builds a parser, rejecting a structurally invalid table with the
    /// first validation error.
    pub fn new(table: DescriptorTable, modes: ModeFlags) -> Result<Self, TableError> {
        match validate_table(&table).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(Parser { table, modes }),
        }
    }

    /// The descriptor table this parser was built from.
    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }

    /// The modes this parser was built with.
    pub fn modes(&self) -> ModeFlags {
        self.modes
    }

    /// Parses an argument vector into the store.
    ///
    /// A single left-to-right scan; the first error stops binding and is
    /// returned with everything scanned-but-unbound as leftovers. The
    /// store is caller-owned: repeated calls accumulate list and map
    /// values.
    pub fn parse_args<I, S>(&self, store: &mut ValueStore, args: I) -> ParseOutcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        trace!(count = args.len(), "starting parse");
        self.run(&self.table, store, args, "")
    }

    fn run(
        &self,
        table: &DescriptorTable,
        store: &mut ValueStore,
        args: Vec<String>,
        prefix: &str,
    ) -> ParseOutcome {
        let mut state = ParseState::new(args);

        while let Some((index, arg)) = state.next() {
            if state.phase != Phase::Scanning {
                state.buffered.push((index, arg));
                continue;
            }

            let token = classify(&arg);
            match token {
                Token::DoubleDash if self.modes.pass_double_dash => {
                    debug!("double dash terminator; remaining tokens pass through");
                    state.phase = Phase::TerminatedByDoubleDash;
                }
                Token::Long { name, inline } => {
                    if let Err(error) =
                        self.handle_long(table, store, &mut state, index, &arg, name, inline, prefix)
                    {
                        return fail(state, error, index);
                    }
                }
                Token::Shorts(cluster) => {
                    if let Err(error) =
                        self.handle_shorts(table, store, &mut state, index, &arg, cluster, prefix)
                    {
                        return fail(state, error, index);
                    }
                }
                Token::Positional(_) | Token::DoubleDash => {
                    if table.has_commands() {
                        return match table.find_command(&arg) {
                            Some(command) => {
                                self.dispatch(table, command, store, &mut state, prefix)
                            }
                            None => fail(
                                state,
                                ParseError::UnknownCommand { name: arg.clone() },
                                index,
                            ),
                        };
                    }
                    trace!(token = %arg, "buffering positional candidate");
                    state.buffered.push((index, arg));
                    if self.modes.pass_after_non_option {
                        debug!("first non-option token; remaining tokens pass through");
                        state.phase = Phase::StoppedAtNonOption;
                    }
                }
            }
        }

        self.finalize(table, store, state, prefix)
    }

    /// Result collection at end of scan: positional binding, defaults,
    /// required-option sweep, leftover assembly.
    fn finalize(
        &self,
        table: &DescriptorTable,
        store: &mut ValueStore,
        state: ParseState,
        prefix: &str,
    ) -> ParseOutcome {
        let unbound = match bind_positionals(&table.positionals, &state.buffered, store, prefix) {
            Ok(unbound) => unbound,
            Err(error) => {
                debug!(%error, "positional binding failed");
                return ParseOutcome {
                    leftovers: merge_ordered(state.deferred, state.buffered),
                    command: None,
                    error: Some(error),
                };
            }
        };

        self.apply_defaults(table, store, prefix, &state.seen);
        let error = self.check_required(table, store, prefix, &state.seen);
        ParseOutcome {
            leftovers: merge_ordered(state.deferred, unbound),
            command: None,
            error,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_long(
        &self,
        table: &DescriptorTable,
        store: &mut ValueStore,
        state: &mut ParseState,
        index: usize,
        raw: &str,
        name: &str,
        inline: Option<&str>,
        prefix: &str,
    ) -> Result<(), ParseError> {
        let spelled = format!("--{name}");
        match resolve_long(table, name, self.modes.match_abbrev) {
            LongMatch::Found(option) => {
                self.consume_value(option, &spelled, inline, state, store, prefix)
            }
            LongMatch::Ambiguous(candidates) => Err(ParseError::AmbiguousOption {
                flag: spelled,
                candidates,
            }),
            LongMatch::Unknown => {
                if self.modes.ignore_unknown {
                    debug!(flag = %spelled, "deferring unknown option to leftovers");
                    state.deferred.push((index, raw.to_string()));
                    Ok(())
                } else {
                    Err(ParseError::UnknownOption { flag: spelled })
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_shorts(
        &self,
        table: &DescriptorTable,
        store: &mut ValueStore,
        state: &mut ParseState,
        index: usize,
        raw: &str,
        cluster: &str,
        prefix: &str,
    ) -> Result<(), ParseError> {
        for (pos, ch) in cluster.char_indices() {
            let spelled = format!("-{ch}");
            let Some(option) = resolve_short(table, ch) else {
                if self.modes.ignore_unknown {
                    // Members earlier in the cluster are already applied;
                    // defer the unknown one and whatever follows it.
                    let leftover = if pos == 0 {
                        raw.to_string()
                    } else {
                        format!("-{}", &cluster[pos..])
                    };
                    debug!(flag = %spelled, "deferring unknown option to leftovers");
                    state.deferred.push((index, leftover));
                    return Ok(());
                }
                return Err(ParseError::UnknownOption { flag: spelled });
            };

            let rest = &cluster[pos + ch.len_utf8()..];
            if option.takes_value() {
                let inline = if rest.is_empty() {
                    None
                } else {
                    Some(rest.strip_prefix('=').unwrap_or(rest))
                };
                return self.consume_value(option, &spelled, inline, state, store, prefix);
            }
            if let Some(value) = rest.strip_prefix('=') {
                // Explicit negation, e.g. -v=false.
                return self.consume_value(option, &spelled, Some(value), state, store, prefix);
            }
            self.consume_value(option, &spelled, None, state, store, prefix)?;
        }
        Ok(())
    }

    /// Applies a matched option: claims an argument token if needed,
    /// coerces, validates choices, and writes into the store.
    fn consume_value(
        &self,
        option: &OptionDescriptor,
        spelled: &str,
        inline: Option<&str>,
        state: &mut ParseState,
        store: &mut ValueStore,
        prefix: &str,
    ) -> Result<(), ParseError> {
        let key = format!("{prefix}{}", option.key());
        state.seen.insert(key.clone());

        if option.value_kind == ValueKind::Bool {
            let switched_on = match inline {
                Some(raw) => coerce(raw, ValueKind::Bool)
                    .map_err(|err| invalid_value(spelled, err))?
                    .as_bool()
                    .unwrap_or(true),
                None => true,
            };
            trace!(flag = %spelled, value = switched_on, "setting switch");
            store.set(&key, Value::Bool(switched_on));
            return Ok(());
        }

        let raw = match inline {
            Some(value) => value.to_string(),
            None => state
                .claim_next()
                .ok_or_else(|| ParseError::MissingArgument {
                    flag: spelled.to_string(),
                })?,
        };

        if !option.choices.is_empty() && !option.choices.iter().any(|c| c == &raw) {
            return Err(ParseError::InvalidChoice {
                flag: spelled.to_string(),
                value: raw,
                allowed: option.choices.clone(),
            });
        }

        trace!(flag = %spelled, value = %raw, "consuming option value");
        match option.value_kind {
            ValueKind::StrList => store.append(&key, Value::Str(raw)),
            ValueKind::StrMap => {
                let (entry_key, entry_value) =
                    split_map_entry(&raw).map_err(|err| invalid_value(spelled, err))?;
                store.insert_entry(&key, entry_key, entry_value);
            }
            ValueKind::Custom => {
                let value = match &option.parser {
                    Some(parser) => {
                        parser.parse(&raw).map_err(|reason| ParseError::InvalidValue {
                            context: format!("flag `{spelled}'"),
                            literal: raw.clone(),
                            detail: reason,
                        })?
                    }
                    None => Value::Str(raw),
                };
                store.set(&key, value);
            }
            kind => {
                let value = coerce(&raw, kind).map_err(|err| invalid_value(spelled, err))?;
                store.set(&key, value);
            }
        }
        Ok(())
    }

    /// Hands the rest of the argument vector to a subcommand's table.
    fn dispatch(
        &self,
        table: &DescriptorTable,
        command: &Subcommand,
        store: &mut ValueStore,
        state: &mut ParseState,
        prefix: &str,
    ) -> ParseOutcome {
        debug!(command = %command.name, "dispatching to subcommand table");
        let rest = state.args.split_off(state.cursor);
        let sub_prefix = format!("{prefix}{}.", command.name);
        let sub = self.run(&command.table, store, rest, &sub_prefix);

        let error = match sub.error {
            Some(error) => Some(error),
            None => {
                self.apply_defaults(table, store, prefix, &state.seen);
                self.check_required(table, store, prefix, &state.seen)
            }
        };

        // A table with subcommands has no positional slots, so nothing is
        // buffered here; only deferred unknowns precede the sub leftovers.
        let mut leftovers = merge_ordered(std::mem::take(&mut state.deferred), Vec::new());
        leftovers.extend(sub.leftovers);
        let command_path = Some(match sub.command {
            Some(nested) => format!("{} {nested}", command.name),
            None => command.name.clone(),
        });
        ParseOutcome {
            leftovers,
            command: command_path,
            error,
        }
    }

    fn apply_defaults(
        &self,
        table: &DescriptorTable,
        store: &mut ValueStore,
        prefix: &str,
        seen: &HashSet<String>,
    ) {
        for option in table.all_options() {
            let Some(default) = option.default_value.as_deref() else {
                continue;
            };
            let key = format!("{prefix}{}", option.key());
            if seen.contains(&key) || store.is_set(&key) {
                continue;
            }
            // Defaults were checked at construction; a conversion failure
            // here cannot happen, so it is silently skipped.
            let value = match &option.parser {
                Some(parser) => parser.parse(default).ok(),
                None => match option.value_kind {
                    ValueKind::StrList => {
                        Some(Value::List(vec![Value::Str(default.to_string())]))
                    }
                    ValueKind::StrMap => split_map_entry(default).ok().map(|(k, v)| {
                        let mut entries = std::collections::BTreeMap::new();
                        entries.insert(k.to_string(), v.to_string());
                        Value::Map(entries)
                    }),
                    kind => coerce(default, kind).ok(),
                },
            };
            if let Some(value) = value {
                trace!(option = %key, "applying default value");
                store.set(&key, value);
            }
        }
    }

    fn check_required(
        &self,
        table: &DescriptorTable,
        store: &ValueStore,
        prefix: &str,
        seen: &HashSet<String>,
    ) -> Option<ParseError> {
        for option in table.all_options() {
            if !option.required {
                continue;
            }
            let key = format!("{prefix}{}", option.key());
            if seen.contains(&key) || store.is_set(&key) {
                continue;
            }
            return Some(ParseError::MissingRequiredOption {
                flag: option.display_name(),
            });
        }
        None
    }
}

fn invalid_value(spelled: &str, err: CoerceError) -> ParseError {
    ParseError::InvalidValue {
        context: format!("flag `{spelled}'"),
        literal: err.literal,
        detail: err.detail.to_string(),
    }
}

/// Error result collection: everything scanned but not bound becomes a
/// leftover, from the triggering token onward, in original order.
fn fail(state: ParseState, error: ParseError, at_index: usize) -> ParseOutcome {
    debug!(%error, "parse failed");
    let from = state.last_claimed.unwrap_or(at_index);
    let mut items = state.deferred;
    items.extend(state.buffered);
    items.extend(
        (from..state.args.len()).map(|index| (index, state.args[index].clone())),
    );
    ParseOutcome {
        leftovers: sorted_tokens(items),
        command: None,
        error: Some(error),
    }
}

fn merge_ordered(mut first: Vec<(usize, String)>, second: Vec<(usize, String)>) -> Vec<String> {
    first.extend(second);
    sorted_tokens(first)
}

fn sorted_tokens(mut items: Vec<(usize, String)>) -> Vec<String> {
    items.sort_by_key(|(index, _)| *index);
    items.into_iter().map(|(_, token)| token).collect()
}
