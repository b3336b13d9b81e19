//! Tabulation output generation.
//!
//! This module renders a [`ResultMatrix`] as a console table with a
//! per-trial footer, as CSV, or as JSON. All three carry the same cells.

use crate::analysis::summarize;
use crate::models::{Outcome, ResultMatrix, TrialSummary};
use anyhow::Result;
use serde::Serialize;
use std::time::UNIX_EPOCH;

const COLUMN_GAP: &str = "  ";

/// Generate CSV output, one line per task after the header.
pub fn generate_csv(matrix: &ResultMatrix) -> String {
    let mut output = String::new();

    output.push_str(&csv_line(&matrix.header()));
    for row in matrix.rows() {
        output.push_str(&csv_line(&row));
    }

    output
}

fn csv_line(cells: &[String]) -> String {
    let fields: Vec<String> = cells.iter().map(|c| csv_field(c)).collect();
    format!("{}\n", fields.join(","))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Generate the console table: header, task rows, then the footer
/// counts below a separating rule.
pub fn generate_table(matrix: &ResultMatrix) -> String {
    let summary = summarize(matrix);

    let header_top: Vec<String> = std::iter::once(String::new())
        .chain((0..matrix.max_trials).map(|i| format!("Trial {}", i)))
        .collect();
    let header_bottom: Vec<String> = std::iter::once("Task Id".to_string())
        .chain((0..matrix.max_trials).map(|_| "Success".to_string()))
        .collect();

    let body = matrix.rows();
    let footer = footer_cells(&summary);

    let columns = 1 + matrix.max_trials;
    let mut widths = vec![0usize; columns];
    for row in [&header_top, &header_bottom]
        .into_iter()
        .chain(body.iter())
        .chain(footer.iter())
    {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut output = String::new();
    output.push_str(&table_line(&header_top, &widths));
    output.push_str(&table_line(&header_bottom, &widths));
    output.push_str(&table_line(&rule, &widths));
    for row in &body {
        output.push_str(&table_line(row, &widths));
    }
    output.push_str(&table_line(&rule, &widths));
    for row in &footer {
        output.push_str(&table_line(row, &widths));
    }

    output
}

fn footer_cells(summary: &TrialSummary) -> Vec<Vec<String>> {
    summary
        .footer_rows()
        .into_iter()
        .map(|(label, counts)| {
            std::iter::once(label.to_string())
                .chain(counts.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect()
}

/// Task ids are left-aligned, trial columns right-aligned.
fn table_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, width))| {
            if i == 0 {
                format!("{:<width$}", cell, width = width)
            } else {
                format!("{:>width$}", cell, width = width)
            }
        })
        .collect();

    format!("{}\n", padded.join(COLUMN_GAP).trim_end())
}

#[derive(Serialize)]
struct JsonTask<'a> {
    task_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified_unix: Option<u64>,
    trials: Vec<Outcome>,
}

#[derive(Serialize)]
struct JsonSummary {
    successes: Vec<usize>,
    failures: Vec<usize>,
    missing: Vec<usize>,
    total: Vec<usize>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    max_trials: usize,
    tasks: Vec<JsonTask<'a>>,
    summary: JsonSummary,
}

/// Generate a JSON report with padded trials and the footer counts.
pub fn generate_json(matrix: &ResultMatrix) -> Result<String> {
    let summary = summarize(matrix);
    let report = JsonReport {
        max_trials: matrix.max_trials,
        tasks: matrix
            .tasks
            .iter()
            .map(|task| JsonTask {
                task_id: &task.task_id,
                modified_unix: task
                    .modified
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs()),
                trials: matrix.padded(task),
            })
            .collect(),
        summary: JsonSummary {
            total: summary.totals(),
            successes: summary.successes,
            failures: summary.failures,
            missing: summary.missing,
        },
    };

    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}
