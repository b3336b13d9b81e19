//! Command-line interface argument parsing.
//!
//! The host only classifies raw tokens (bare vs option) so the locator
//! can use bare ones as search roots. The default tabulator drops
//! unrecognised options and parses the rest with clap.

use crate::error::UsageError;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// Explanation appended to the usage line on argument errors.
pub const RUNLOGS_HELP: &str =
    "where RUNLOGS is the path pointing to the results or logs of a previous run";

/// Tabulate the results of a previous run
///
/// Scores every trial of every task under RUNLOGS and prints a summary
/// table. A `tabulate.py` found in the working directory, or above
/// RUNLOGS, replaces this default tabulation entirely.
///
/// Examples:
///   trialtab ./results
///   trialtab --csv ./results > summary.csv
///   trialtab --init-config
#[derive(Parser, Debug, Clone)]
#[command(about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// Path pointing to the results or logs of a previous run
    #[arg(value_name = "RUNLOGS")]
    pub runlogs: Vec<PathBuf>,

    /// Output the tabulation in CSV format
    #[arg(short, long, conflicts_with = "json")]
    pub csv: bool,

    /// Output the tabulation as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the tabulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Console table with footer (default)
    #[default]
    Table,
    Csv,
    Json,
}

impl Args {
    /// Usage line for `bin_name`, as printed ahead of argument errors.
    pub fn usage(bin_name: &str) -> String {
        Self::command()
            .bin_name(bin_name.to_string())
            .render_usage()
            .to_string()
    }

    /// Validate the parsed arguments, returning the results root.
    pub fn validate(&self) -> Result<&PathBuf, UsageError> {
        if self.verbose && self.quiet {
            return Err(UsageError::ConflictingVerbosity);
        }

        match self.runlogs.as_slice() {
            [] => Err(UsageError::MissingArgument),
            [runlogs] => Ok(runlogs),
            _ => Err(UsageError::TooManyArguments),
        }
    }

    pub fn format(&self) -> OutputFormat {
        if self.csv {
            OutputFormat::Csv
        } else if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// True for tokens treated as options rather than paths.
pub fn is_option(arg: &str) -> bool {
    arg.starts_with('-')
}

/// Bare (non-option) tokens, in their original order.
pub fn bare_args(args: &[String]) -> impl DoubleEndedIterator<Item = &str> {
    args.iter().map(String::as_str).filter(|a| !is_option(a))
}

/// Option tokens the default tabulator understands. Matching is exact, so
/// combined short flags such as `-cv` are not split.
const KNOWN_OPTIONS: &[&str] = &[
    "-c", "--csv", "-j", "--json", "-v", "--verbose", "-q", "--quiet", "-h", "--help",
];

pub fn is_known_option(arg: &str) -> bool {
    KNOWN_OPTIONS.contains(&arg)
}

/// Split an invocation into the tokens clap should see and the unrecognised
/// options to ignore. The leading invocation name is always kept.
pub fn split_unknown_options(args: &[String]) -> (Vec<String>, Vec<String>) {
    let mut kept = Vec::with_capacity(args.len());
    let mut ignored = Vec::new();

    for (i, arg) in args.iter().enumerate() {
        if i == 0 || !is_option(arg) || is_known_option(arg) {
            kept.push(arg.clone());
        } else {
            ignored.push(arg.clone());
        }
    }

    (kept, ignored)
}

/// Log level from raw tokens, decided before any provider is chosen.
///
/// Uses the same exact matching as [`split_unknown_options`]. When both
/// `-v` and `-q` are given quiet wins here; the default tabulator then
/// rejects the pair as a usage error.
pub fn log_level(args: &[String]) -> tracing::Level {
    let has = |short: &str, long: &str| {
        args.iter()
            .filter(|a| is_known_option(a))
            .any(|a| a == short || a == long)
    };

    if has("-q", "--quiet") {
        tracing::Level::ERROR
    } else if has("-v", "--verbose") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    }
}
