//! Domain error types for trialtab.
//!
//! Typed errors at module boundaries. They are wrapped in `anyhow::Error`
//! on the way up to `main`, where callers can still downcast them.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised while locating, scanning or delegating.
#[derive(Debug, Error)]
pub enum TabulateError {
    #[error("'{}' is not a directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Failed to read log file {}", .path.display())]
    LogRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to launch tabulation script {}", .path.display())]
    PluginLaunch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Problems with the command line itself. Reported with usage text and
/// exit status 2.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("missing argument RUNLOGS")]
    MissingArgument,

    #[error("too many arguments")]
    TooManyArguments,

    #[error("cannot use both --verbose and --quiet")]
    ConflictingVerbosity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_directory_message() {
        let err = TabulateError::InvalidDirectory(PathBuf::from("/no/such/dir"));
        assert_eq!(err.to_string(), "'/no/such/dir' is not a directory");
    }

    #[test]
    fn test_usage_messages() {
        assert_eq!(
            UsageError::MissingArgument.to_string(),
            "missing argument RUNLOGS"
        );
        assert_eq!(UsageError::TooManyArguments.to_string(), "too many arguments");
    }
}
