//! Outcome aggregation and statistics.
//!
//! Counts are taken over the padded matrix, so a trial index a task
//! never reached counts as `Missing` for that task.

use crate::models::{Outcome, ResultMatrix, TrialSummary};

/// Number of tasks whose outcome at `trial` equals `outcome`.
pub fn count_outcome(matrix: &ResultMatrix, outcome: Outcome, trial: usize) -> usize {
    matrix
        .tasks
        .iter()
        .filter(|task| task.outcome(trial) == outcome)
        .count()
}

/// Per-trial footer counts for the whole matrix.
pub fn summarize(matrix: &ResultMatrix) -> TrialSummary {
    let per_trial = |outcome: Outcome| -> Vec<usize> {
        (0..matrix.max_trials)
            .map(|trial| count_outcome(matrix, outcome, trial))
            .collect()
    };

    TrialSummary {
        successes: per_trial(Outcome::Success),
        failures: per_trial(Outcome::Failure),
        missing: per_trial(Outcome::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskResult;

    fn scenario() -> ResultMatrix {
        ResultMatrix::new(vec![
            TaskResult::new("taskA", vec![Outcome::Success, Outcome::Success]),
            TaskResult::new("taskB", vec![Outcome::Failure, Outcome::Missing]),
        ])
    }

    #[test]
    fn test_scenario_footer() {
        let summary = summarize(&scenario());
        assert_eq!(summary.successes, vec![1, 1]);
        assert_eq!(summary.failures, vec![1, 0]);
        assert_eq!(summary.missing, vec![0, 1]);
        assert_eq!(summary.totals(), vec![2, 2]);
    }

    #[test]
    fn test_uneven_trials_count_padding_as_missing() {
        let matrix = ResultMatrix::new(vec![
            TaskResult::new("a", vec![Outcome::Success, Outcome::Failure, Outcome::Success]),
            TaskResult::new("b", vec![Outcome::Missing]),
            TaskResult::new("c", Vec::new()),
        ]);
        let summary = summarize(&matrix);

        assert_eq!(summary.successes, vec![1, 0, 1]);
        assert_eq!(summary.failures, vec![0, 1, 0]);
        assert_eq!(summary.missing, vec![2, 2, 2]);
        assert!(summary.totals().iter().all(|&t| t == matrix.tasks.len()));
    }

    #[test]
    fn test_empty_matrix_has_empty_footer() {
        let summary = summarize(&ResultMatrix::default());
        assert!(summary.successes.is_empty());
        assert!(summary.totals().is_empty());
    }
}
