//! Tabulation providers and override lookup.
//!
//! A provider takes the full invocation (name plus every argument) and
//! returns the process exit status. User overrides are an explicit
//! extension point: a script found by [`PluginLocator`] is run as a
//! child process in place of the built-in tabulation.

pub mod external;
pub mod locator;

pub use external::ExternalTabulator;
pub use locator::PluginLocator;

use anyhow::Result;

/// Something that can produce a tabulation for an invocation.
pub trait Tabulator {
    /// `args[0]` is the invocation name. Returns the exit status.
    fn tabulate(&self, args: &[String]) -> Result<i32>;
}
