// src/progress.rs
use crate::calendar::CalendarMonth;
use crate::data::Record;
use crate::error::SkipReason;
use crate::runner::RunSummary;

/// Lightweight progress reporting for a run.
/// Frontends implement this to surface per-month status to users.
pub trait Progress {
    /// Called at the start with the number of months in range.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A month produced a new record.
    fn item_done(&mut self, _record: &Record) {}

    /// A month was dropped for this run.
    fn item_skipped(&mut self, _month: CalendarMonth, _reason: &SkipReason) {}

    /// Called once the dataset has been written.
    fn finish(&mut self, _summary: &RunSummary) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
