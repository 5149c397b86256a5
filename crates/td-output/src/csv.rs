//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `assignments.csv` — one row per resolved request (`outcome` is
//!   `assigned` or `dropped`; `taxi_id` is empty for dropped requests)
//! - `completions.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::EventWriter;
use crate::{AssignmentRow, CompletionRow, OutputResult, TickSummaryRow};

/// Writes dispatch events to three CSV files.
pub struct CsvEventWriter {
    assignments: Writer<File>,
    completions: Writer<File>,
    summaries:   Writer<File>,
    finished:    bool,
}

impl CsvEventWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut assignments = Writer::from_path(dir.join("assignments.csv"))?;
        assignments.write_record([
            "tick", "sim_time_ms", "request_id", "taxi_id", "outcome", "start_x", "start_y", "end_x", "end_y",
        ])?;

        let mut completions = Writer::from_path(dir.join("completions.csv"))?;
        completions.write_record(["tick", "sim_time_ms", "request_id", "taxi_id", "credit"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record([
            "tick", "sim_time_ms", "open_requests", "registered", "assigned", "dropped", "completed", "moved",
            "blocked",
        ])?;

        log::debug!("writing dispatch events to {}", dir.display());
        Ok(Self {
            assignments,
            completions,
            summaries,
            finished: false,
        })
    }
}

impl EventWriter for CsvEventWriter {
    fn write_assignment(&mut self, row: &AssignmentRow) -> OutputResult<()> {
        let (taxi, outcome) = match row.taxi_id {
            Some(id) => (id.to_string(), "assigned"),
            None => (String::new(), "dropped"),
        };
        self.assignments.write_record(&[
            row.tick.to_string(),
            row.sim_time_ms.to_string(),
            row.request_id.to_string(),
            taxi,
            outcome.to_owned(),
            row.start_x.to_string(),
            row.start_y.to_string(),
            row.end_x.to_string(),
            row.end_y.to_string(),
        ])?;
        Ok(())
    }

    fn write_completion(&mut self, row: &CompletionRow) -> OutputResult<()> {
        self.completions.write_record(&[
            row.tick.to_string(),
            row.sim_time_ms.to_string(),
            row.request_id.to_string(),
            row.taxi_id.to_string(),
            row.credit.to_string(),
        ])?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.sim_time_ms.to_string(),
            row.open_requests.to_string(),
            row.registered.to_string(),
            row.assigned.to_string(),
            row.dropped.to_string(),
            row.completed.to_string(),
            row.moved.to_string(),
            row.blocked.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.assignments.flush()?;
        self.completions.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
