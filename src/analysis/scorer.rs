//! Trial scorers.
//!
//! A scorer maps one trial directory to an [`Outcome`]. The default
//! [`LogScorer`] looks for success markers in the trial's console log;
//! any closure `Fn(&Path) -> Result<Outcome>` can stand in for it.

use crate::config::ScorerConfig;
use crate::error::TabulateError;
use crate::models::Outcome;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Classifies a single trial directory.
pub trait Scorer {
    fn score(&self, trial_dir: &Path) -> Result<Outcome>;
}

impl<F> Scorer for F
where
    F: Fn(&Path) -> Result<Outcome>,
{
    fn score(&self, trial_dir: &Path) -> Result<Outcome> {
        self(trial_dir)
    }
}

/// Scores a trial by searching its log file for success markers.
#[derive(Debug, Clone)]
pub struct LogScorer {
    log_file: String,
    success_markers: Vec<String>,
}

impl LogScorer {
    pub fn new(log_file: impl Into<String>, success_markers: Vec<String>) -> Self {
        Self {
            log_file: log_file.into(),
            success_markers,
        }
    }
}

impl Default for LogScorer {
    fn default() -> Self {
        Self::from(&ScorerConfig::default())
    }
}

impl From<&ScorerConfig> for LogScorer {
    fn from(config: &ScorerConfig) -> Self {
        Self::new(config.log_file.clone(), config.success_markers.clone())
    }
}

impl Scorer for LogScorer {
    fn score(&self, trial_dir: &Path) -> Result<Outcome> {
        let log_path = trial_dir.join(&self.log_file);

        if !log_path.is_file() {
            debug!("No log at {}", log_path.display());
            return Ok(Outcome::Missing);
        }

        let bytes = std::fs::read(&log_path).map_err(|source| TabulateError::LogRead {
            path: log_path.clone(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);

        if self
            .success_markers
            .iter()
            .any(|marker| content.contains(marker.as_str()))
        {
            Ok(Outcome::Success)
        } else {
            Ok(Outcome::Failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_log_is_missing() {
        let dir = TempDir::new().unwrap();
        let outcome = LogScorer::default().score(dir.path()).unwrap();
        assert_eq!(outcome, Outcome::Missing);
    }

    #[test]
    fn test_marker_present_is_success() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("console_log.txt"),
            "running...\nALL TESTS PASSED !#!#\nbye\n",
        )
        .unwrap();
        let outcome = LogScorer::default().score(dir.path()).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_marker_absent_is_failure() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("console_log.txt"), "ALL TESTS PASSED\n").unwrap();
        let outcome = LogScorer::default().score(dir.path()).unwrap();
        assert_eq!(outcome, Outcome::Failure);
    }

    #[test]
    fn test_any_marker_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("out.log"), "result: OK").unwrap();
        let scorer = LogScorer::new("out.log", vec!["PASS".to_string(), "OK".to_string()]);
        assert_eq!(scorer.score(dir.path()).unwrap(), Outcome::Success);
    }

    #[test]
    fn test_non_utf8_log_is_scored() {
        let dir = TempDir::new().unwrap();
        let mut bytes = vec![0xff, 0xfe, b'\n'];
        bytes.extend_from_slice(b"ALL TESTS PASSED !#!#");
        fs::write(dir.path().join("console_log.txt"), bytes).unwrap();
        let outcome = LogScorer::default().score(dir.path()).unwrap();
        assert_eq!(outcome, Outcome::Success);
    }

    #[test]
    fn test_closure_scorer() {
        let dir = TempDir::new().unwrap();
        let scorer = |path: &Path| -> Result<Outcome> {
            Ok(if path.join("ok").exists() {
                Outcome::Success
            } else {
                Outcome::Failure
            })
        };
        assert_eq!(scorer.score(dir.path()).unwrap(), Outcome::Failure);
        fs::write(dir.path().join("ok"), "").unwrap();
        assert_eq!(scorer.score(dir.path()).unwrap(), Outcome::Success);
    }
}
