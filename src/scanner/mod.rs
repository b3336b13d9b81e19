//! Results tree scanner.
//!
//! Walks the two fixed levels of a results root: task directories
//! directly under the root, then trial directories `0`, `1`, ... under
//! each task, stopping at the first gap.

use crate::analysis::Scorer;
use crate::config::ScanConfig;
use crate::error::TabulateError;
use crate::models::{Outcome, ResultMatrix, TaskResult};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Scanner over a single results root.
pub struct ResultsScanner {
    root: PathBuf,
    exclude_dirs: Vec<String>,
}

impl ResultsScanner {
    /// Create a new scanner.
    pub fn new(root: PathBuf, config: &ScanConfig) -> Self {
        Self {
            root,
            exclude_dirs: config.exclude_dirs.clone(),
        }
    }

    /// Score every task under the root, oldest first.
    pub fn scan(&self, scorer: &dyn Scorer) -> Result<ResultMatrix> {
        if !self.root.is_dir() {
            return Err(TabulateError::InvalidDirectory(self.root.clone()).into());
        }

        let mut tasks = Vec::new();

        for task_dir in self.task_dirs()? {
            let task_id = task_dir.file_name().to_string_lossy().to_string();
            let trials = self.scan_trials(task_dir.path(), scorer)?;
            debug!("Task {}: {} trial(s)", task_id, trials.len());

            tasks.push(TaskResult {
                modified: modified_time(&task_dir),
                ..TaskResult::new(task_id, trials)
            });
        }

        let matrix = ResultMatrix::new(tasks);
        info!(
            "Scanned {} task(s), up to {} trial(s) each",
            matrix.tasks.len(),
            matrix.max_trials
        );
        Ok(matrix)
    }

    /// Task directories directly under the root, sorted by mtime then name.
    fn task_dirs(&self) -> Result<Vec<DirEntry>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by(|a, b| {
                modified_time(a)
                    .cmp(&modified_time(b))
                    .then_with(|| a.file_name().cmp(b.file_name()))
            });

        let mut dirs = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| {
                format!("Failed to read results directory {}", self.root.display())
            })?;

            let name = entry.file_name().to_string_lossy();
            if self.is_excluded(&name) {
                debug!("Skipping excluded entry {}", name);
                continue;
            }

            if !entry.file_type().is_dir() {
                continue;
            }

            dirs.push(entry);
        }

        Ok(dirs)
    }

    /// Score contiguous trial directories `0..n` of one task.
    fn scan_trials(&self, task_path: &Path, scorer: &dyn Scorer) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::new();

        loop {
            let trial_dir = task_path.join(outcomes.len().to_string());
            if !trial_dir.is_dir() {
                break;
            }
            outcomes.push(scorer.score(&trial_dir)?);
        }

        Ok(outcomes)
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|pattern| name == pattern)
    }
}

fn modified_time(entry: &DirEntry) -> Option<SystemTime> {
    entry.metadata().ok().and_then(|m| m.modified().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LogScorer;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    const PASS: &str = "ALL TESTS PASSED !#!#";

    fn write_trial(root: &Path, task: &str, trial: usize, log: Option<&str>) {
        let dir = root.join(task).join(trial.to_string());
        fs::create_dir_all(&dir).unwrap();
        if let Some(content) = log {
            fs::write(dir.join("console_log.txt"), content).unwrap();
        }
    }

    fn set_mtime(path: &Path, secs: u64) {
        fs::File::open(path)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn scan(root: &Path) -> ResultMatrix {
        ResultsScanner::new(root.to_path_buf(), &ScanConfig::default())
            .scan(&LogScorer::default())
            .unwrap()
    }

    #[test]
    fn test_scan_scenario() {
        let dir = TempDir::new().unwrap();
        write_trial(dir.path(), "taskA", 0, Some(PASS));
        write_trial(dir.path(), "taskA", 1, Some(PASS));
        write_trial(dir.path(), "taskB", 0, Some("1 failed"));
        write_trial(dir.path(), "taskB", 1, None);
        set_mtime(&dir.path().join("taskA"), 1_000);
        set_mtime(&dir.path().join("taskB"), 2_000);

        let matrix = scan(dir.path());
        assert_eq!(matrix.max_trials, 2);
        assert_eq!(matrix.tasks[0].task_id, "taskA");
        assert_eq!(matrix.tasks[0].trials, vec![Outcome::Success, Outcome::Success]);
        assert_eq!(matrix.tasks[1].task_id, "taskB");
        assert_eq!(matrix.tasks[1].trials, vec![Outcome::Failure, Outcome::Missing]);
    }

    #[test]
    fn test_tasks_sorted_by_mtime() {
        let dir = TempDir::new().unwrap();
        for task in ["alpha", "beta", "gamma"] {
            write_trial(dir.path(), task, 0, Some(PASS));
        }
        set_mtime(&dir.path().join("alpha"), 3_000);
        set_mtime(&dir.path().join("beta"), 1_000);
        set_mtime(&dir.path().join("gamma"), 2_000);

        let ids: Vec<_> = scan(dir.path())
            .tasks
            .into_iter()
            .map(|t| t.task_id)
            .collect();
        assert_eq!(ids, vec!["beta", "gamma", "alpha"]);
    }

    #[test]
    fn test_trials_stop_at_first_gap() {
        let dir = TempDir::new().unwrap();
        write_trial(dir.path(), "task", 0, Some(PASS));
        write_trial(dir.path(), "task", 2, Some(PASS));

        let matrix = scan(dir.path());
        assert_eq!(matrix.tasks[0].trials, vec![Outcome::Success]);
        assert_eq!(matrix.max_trials, 1);
    }

    #[test]
    fn test_skips_excluded_and_plain_files() {
        let dir = TempDir::new().unwrap();
        write_trial(dir.path(), "task", 0, Some(PASS));
        write_trial(dir.path(), "__pycache__", 0, Some(PASS));
        fs::write(dir.path().join("notes.txt"), "not a task").unwrap();

        let matrix = scan(dir.path());
        assert_eq!(matrix.tasks.len(), 1);
        assert_eq!(matrix.tasks[0].task_id, "task");
    }

    #[test]
    fn test_task_without_trials() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let matrix = scan(dir.path());
        assert_eq!(matrix.tasks.len(), 1);
        assert!(matrix.tasks[0].trials.is_empty());
        assert_eq!(matrix.max_trials, 0);
    }

    #[test]
    fn test_empty_root() {
        let dir = TempDir::new().unwrap();
        let matrix = scan(dir.path());
        assert!(matrix.is_empty());
        assert_eq!(matrix.max_trials, 0);
    }

    #[test]
    fn test_missing_root_is_invalid_directory() {
        let dir = TempDir::new().unwrap();
        let err = ResultsScanner::new(dir.path().join("nope"), &ScanConfig::default())
            .scan(&LogScorer::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulateError>(),
            Some(TabulateError::InvalidDirectory(_))
        ));
    }
}
