//! `td-output` — dispatch event export.
//!
//! | File                 | One row per                                        |
//! |----------------------|----------------------------------------------------|
//! | `assignments.csv`    | request whose window closed (assigned or dropped)  |
//! | `completions.csv`    | finished ride                                      |
//! | `tick_summaries.csv` | tick                                               |
//!
//! Backends implement [`EventWriter`] and are driven by [`OutputObserver`],
//! which implements `td_sim::DispatchObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use td_output::{CsvEventObserver, CsvEventWriter};
//!
//! let writer = CsvEventWriter::new(Path::new("./output"))?;
//! let stepper = Scheduler::spawn(Arc::clone(&world), CsvEventObserver::new(writer))?;
//! // ...
//! stepper.stop()?.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use self::csv::CsvEventWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{CsvEventObserver, OutputObserver};
pub use row::{AssignmentRow, CompletionRow, TickSummaryRow};
pub use writer::EventWriter;
