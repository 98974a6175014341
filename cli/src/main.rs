//! Inspector binary: loads a descriptor table from a JSON spec file and
//! parses an argument vector against it, printing the outcome as JSON.
//!
//! The binary's own flags are parsed with the engine itself:
//!
//! ```text
//! argbind --spec table.json [--mode pass-double-dash]... [--pretty] -- <args>...
//! ```

use std::fs;
use std::process::ExitCode;

use serde::Serialize;
use thiserror::Error;

use argbind_core::{DescriptorTable, OptionDescriptor, TableError, ValueKind, ValueStore};
use argbind_engine::{ModeFlags, Parser};

const MODE_NAMES: &[&str] = &[
    "pass-double-dash",
    "pass-after-non-option",
    "ignore-unknown",
    "match-abbrev",
];

/// Failures outside the target parse itself (bad usage, I/O, bad spec).
#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid descriptor table: {0}")]
    Table(#[from] TableError),

    #[error("{0}")]
    Usage(String),
}

/// What gets printed: the populated store plus the parse outcome.
#[derive(Debug, Serialize)]
struct Report<'a> {
    values: &'a ValueStore,
    leftovers: &'a [String],
    command: Option<&'a str>,
    error: Option<String>,
}

/// Descriptor table for the binary's own flags.
fn own_table() -> DescriptorTable {
    DescriptorTable::new()
        .with_option(
            OptionDescriptor::with_value(Some('s'), Some("spec"), ValueKind::Str)
                .required()
                .with_description("Path to a JSON descriptor table"),
        )
        .with_option(
            OptionDescriptor::with_value(Some('m'), Some("mode"), ValueKind::StrList)
                .with_choices(MODE_NAMES)
                .with_description("Parse mode, repeatable"),
        )
        .with_option(
            OptionDescriptor::flag(None, Some("pretty"))
                .with_description("Pretty-print the JSON report"),
        )
}

fn modes_from(names: &[&str]) -> ModeFlags {
    let mut modes = ModeFlags::new();
    for name in names {
        modes = match *name {
            "pass-double-dash" => modes.with_pass_double_dash(),
            "pass-after-non-option" => modes.with_pass_after_non_option(),
            "ignore-unknown" => modes.with_ignore_unknown(),
            "match-abbrev" => modes.with_match_abbrev(),
            // Unreachable: the choice set rejects anything else.
            _ => modes,
        };
    }
    modes
}

fn run() -> Result<ExitCode, CliError> {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let own = Parser::new(own_table(), ModeFlags::new().with_pass_double_dash())?;
    let mut own_store = ValueStore::new();
    let own_outcome = own.parse_args(&mut own_store, argv);
    if let Some(error) = own_outcome.error {
        return Err(CliError::Usage(error.to_string()));
    }

    let spec_path = own_store
        .get_str("spec")
        .ok_or_else(|| CliError::Usage("missing --spec".to_string()))?;
    let table: DescriptorTable = serde_json::from_str(&fs::read_to_string(spec_path)?)?;
    let mode_names = own_store.get_strings("mode").unwrap_or_default();
    let parser = Parser::new(table, modes_from(&mode_names))?;

    let mut store = ValueStore::new();
    let outcome = parser.parse_args(&mut store, own_outcome.leftovers);

    let report = Report {
        values: &store,
        leftovers: &outcome.leftovers,
        command: outcome.command.as_deref(),
        error: outcome.error.as_ref().map(ToString::to_string),
    };
    let rendered = if own_store.get_bool("pretty").unwrap_or(false) {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{rendered}");

    Ok(if outcome.error.is_some() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("argbind: {error}");
            ExitCode::from(2)
        }
    }
}
