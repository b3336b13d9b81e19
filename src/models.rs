//! Data models for run tabulation.
//!
//! This module contains the structures derived from a results tree:
//! trial outcomes, per-task results, the padded result matrix and the
//! per-trial summary that feeds the table footer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Outcome of a single trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The trial log contains a success marker
    Success,
    /// The trial log exists but contains no success marker
    Failure,
    /// The trial log does not exist
    Missing,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "True"),
            Outcome::Failure => write!(f, "False"),
            Outcome::Missing => Ok(()),
        }
    }
}

/// Scored trials of one task directory.
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Directory name of the task.
    pub task_id: String,
    /// Modification time of the task directory, used for ordering.
    pub modified: Option<SystemTime>,
    /// Outcomes of trials `0..n`, in order.
    pub trials: Vec<Outcome>,
}

impl TaskResult {
    pub fn new(task_id: impl Into<String>, trials: Vec<Outcome>) -> Self {
        Self {
            task_id: task_id.into(),
            modified: None,
            trials,
        }
    }

    /// Outcome at `index`, or `Missing` past the last trial.
    pub fn outcome(&self, index: usize) -> Outcome {
        self.trials.get(index).copied().unwrap_or(Outcome::Missing)
    }
}

/// All tasks of a results root, in scan order.
#[derive(Debug, Clone, Default)]
pub struct ResultMatrix {
    pub tasks: Vec<TaskResult>,
    /// Largest trial count seen across all tasks.
    pub max_trials: usize,
}

impl ResultMatrix {
    /// Builds a matrix, deriving `max_trials` from the tasks.
    pub fn new(tasks: Vec<TaskResult>) -> Self {
        let max_trials = tasks.iter().map(|t| t.trials.len()).max().unwrap_or(0);
        Self { tasks, max_trials }
    }

    /// Trial outcomes of a task padded with `Missing` to `max_trials`.
    pub fn padded(&self, task: &TaskResult) -> Vec<Outcome> {
        (0..self.max_trials).map(|i| task.outcome(i)).collect()
    }

    /// Column labels: `Task Id` followed by one label per trial index.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["Task Id".to_string()];
        header.extend((0..self.max_trials).map(|i| format!("Trial {} Success", i)));
        header
    }

    /// Rows of rendered cells, each `1 + max_trials` long.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.tasks
            .iter()
            .map(|task| {
                let mut row = vec![task.task_id.clone()];
                row.extend(self.padded(task).iter().map(|o| o.to_string()));
                row
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Per-trial-index counts across all tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialSummary {
    pub successes: Vec<usize>,
    pub failures: Vec<usize>,
    pub missing: Vec<usize>,
}

impl TrialSummary {
    /// Column-wise sum of the three counts. Always equals the task count.
    pub fn totals(&self) -> Vec<usize> {
        self.successes
            .iter()
            .zip(&self.failures)
            .zip(&self.missing)
            .map(|((s, f), m)| s + f + m)
            .collect()
    }

    /// Labelled footer rows in table order.
    pub fn footer_rows(&self) -> Vec<(&'static str, Vec<usize>)> {
        vec![
            ("Successes", self.successes.clone()),
            ("Failures", self.failures.clone()),
            ("Missing", self.missing.clone()),
            ("Total", self.totals()),
        ]
    }
}
