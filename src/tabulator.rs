//! Built-in tabulation.
//!
//! Parses the invocation, scans the results root, scores each trial and
//! prints the chosen rendering to stdout.

use crate::analysis::{LogScorer, Scorer};
use crate::cli::{self, Args, OutputFormat, RUNLOGS_HELP};
use crate::config::{Config, ScanConfig};
use crate::plugin::Tabulator;
use crate::report;
use crate::scanner::ResultsScanner;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Exit status for command-line usage errors.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Default provider: one bare RUNLOGS argument, optional output flags.
pub struct DefaultTabulator {
    scan: ScanConfig,
    scorer: Box<dyn Scorer>,
}

impl DefaultTabulator {
    pub fn new(scan: ScanConfig, scorer: Box<dyn Scorer>) -> Self {
        Self { scan, scorer }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.scan.clone(),
            Box::new(LogScorer::from(&config.scorer)),
        )
    }

    /// Scan `runlogs` and render it in `format`.
    pub fn render(&self, runlogs: &Path, format: OutputFormat) -> Result<String> {
        let matrix = ResultsScanner::new(runlogs.to_path_buf(), &self.scan)
            .scan(self.scorer.as_ref())
            .with_context(|| format!("Failed to tabulate {}", runlogs.display()))?;

        if matrix.is_empty() {
            warn!("No task directories found under {}", runlogs.display());
        }

        match format {
            OutputFormat::Table => Ok(report::generate_table(&matrix)),
            OutputFormat::Csv => Ok(report::generate_csv(&matrix)),
            OutputFormat::Json => report::generate_json(&matrix),
        }
    }
}

impl Tabulator for DefaultTabulator {
    fn tabulate(&self, args: &[String]) -> Result<i32> {
        let invocation = args.first().map(String::as_str).unwrap_or("trialtab");

        let (known, ignored) = cli::split_unknown_options(args);
        if !ignored.is_empty() {
            debug!("Ignoring unrecognised options: {:?}", ignored);
        }

        let parsed = match Args::try_parse_from(&known) {
            Ok(parsed) => parsed,
            Err(e) => {
                e.print()?;
                return Ok(e.exit_code());
            }
        };
        debug!("Arguments: {:?}", parsed);

        let runlogs = match parsed.validate() {
            Ok(runlogs) => runlogs,
            Err(e) => {
                eprint!("{}", Args::usage(invocation));
                eprintln!("\n{}", RUNLOGS_HELP);
                eprintln!("{}: {}", invocation, e);
                return Ok(USAGE_EXIT_CODE);
            }
        };

        let output = self.render(runlogs, parsed.format())?;

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(output.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write tabulation")?;

        Ok(0)
    }
}

impl Default for DefaultTabulator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
