//! TrialTab - tabulate the outcomes of previous test runs
//!
//! Scores every trial of every task in a results tree and prints a
//! summary table, CSV or JSON. A `tabulate.py` override found in the
//! working directory, or above a RUNLOGS argument, takes over instead.
//!
//! Exit codes:
//!   0 - Success (including --help)
//!   1 - Runtime error (unreadable results, bad config, override launch failure)
//!   2 - Usage error (missing or extra RUNLOGS, unknown option)
//!   Delegated overrides exit with their own status.

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod plugin;
mod report;
mod scanner;
mod tabulator;

use anyhow::{Context, Result};
use config::{Config, CONFIG_ENV, DEFAULT_CONFIG_FILE};
use plugin::{ExternalTabulator, PluginLocator, Tabulator};
use std::path::Path;
use tabulator::DefaultTabulator;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let raw: Vec<String> = std::env::args().collect();
    let (program, cli_args) = match raw.split_first() {
        Some((program, rest)) => (program.as_str(), rest.to_vec()),
        None => (env!("CARGO_PKG_NAME"), Vec::new()),
    };

    // Handle --init-config early (no logging needed)
    if cli_args.iter().any(|a| a == "--init-config") {
        match handle_init_config() {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    init_logging(cli::log_level(&cli_args));

    let invocation = Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string());

    match run(invocation, cli_args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Tabulation failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write a default .trialtab.toml.
fn handle_init_config() -> Result<i32> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        return Ok(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(0)
}

/// Initialize logging on stderr; `RUST_LOG` overrides the flag-derived level.
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: failed to set tracing subscriber");
    }
}

/// Pick a provider and hand it the whole invocation. Returns the exit code.
fn run(invocation: String, cli_args: Vec<String>) -> Result<i32> {
    let config = load_config()?;
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;

    let override_script = if config.plugin.enabled {
        PluginLocator::from(&config.plugin).locate(&cwd, &cli_args)?
    } else {
        debug!("Override lookup disabled by config");
        None
    };

    let provider: Box<dyn Tabulator> = match override_script {
        Some(script) => {
            let external = ExternalTabulator::new(script, &config.plugin);
            eprintln!(
                "Using tabulation method defined in '{}'\n",
                external.script().display()
            );
            Box::new(external)
        }
        None => {
            eprintln!("Using default tabulation method.\n");
            Box::new(DefaultTabulator::from_config(&config))
        }
    };

    let mut args = Vec::with_capacity(cli_args.len() + 1);
    args.push(invocation);
    args.extend(cli_args);

    provider.tabulate(&args)
}

/// Load configuration from TRIALTAB_CONFIG, the working directory, or defaults.
fn load_config() -> Result<Config> {
    if let Some(path) = Config::env_path() {
        info!("Loading config from {} ({})", path.display(), CONFIG_ENV);
        return Config::load(&path);
    }

    match Config::load_from_dir(Path::new("."))? {
        Some(config) => {
            info!("Loaded config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
