// src/data.rs
//
// Records and the dataset that accumulates them across runs.
//
// - Record:  one bulletin month, its priority date, and the gap between them.
//            The gap is computed at construction and never stored independently.
// - Dataset: records keyed by calendar month. Keys are unique and iteration is
//            ascending, so the on-disk order falls out of the map itself.

use std::collections::BTreeMap;

use crate::calendar::{elapsed_months, CalendarMonth};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    calendar: CalendarMonth,
    priority_date: CalendarMonth,
    elapsed_months: i32,
}

impl Record {
    pub fn new(calendar: CalendarMonth, priority_date: CalendarMonth) -> Self {
        Self { calendar, priority_date, elapsed_months: elapsed_months(calendar, priority_date) }
    }

    /// Rebuild a persisted record; the stored gap must agree with the dates.
    pub fn from_parts(
        calendar: CalendarMonth,
        priority_date: CalendarMonth,
        elapsed: i32,
    ) -> Result<Self, String> {
        let rec = Self::new(calendar, priority_date);
        if rec.elapsed_months != elapsed {
            return Err(format!(
                "time difference {elapsed} does not match {calendar} - {priority_date} = {}",
                rec.elapsed_months
            ));
        }
        Ok(rec)
    }

    pub fn calendar(&self) -> CalendarMonth { self.calendar }
    pub fn priority_date(&self) -> CalendarMonth { self.priority_date }
    pub fn elapsed_months(&self) -> i32 { self.elapsed_months }

    /// `[Calendar Date, PD Date, Time Difference (months)]`
    pub fn to_row(&self) -> [String; 3] {
        [
            self.calendar.to_string(),
            self.priority_date.to_string(),
            self.elapsed_months.to_string(),
        ]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    /// Fresh records whose month was already known. Kept out; existing wins.
    pub ignored: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    records: BTreeMap<CalendarMonth, Record>,
}

impl Dataset {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn contains(&self, month: CalendarMonth) -> bool {
        self.records.contains_key(&month)
    }

    pub fn get(&self, month: CalendarMonth) -> Option<&Record> {
        self.records.get(&month)
    }

    /// Ascending by calendar month.
    pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
        self.records.values()
    }

    /// Insert unless the month is already present. Returns whether it was added.
    pub fn insert_new(&mut self, record: Record) -> bool {
        use std::collections::btree_map::Entry;
        match self.records.entry(record.calendar) {
            Entry::Vacant(slot) => { slot.insert(record); true }
            Entry::Occupied(_) => false,
        }
    }

    /// Add every fresh record for a month not already present. Existing
    /// records are never replaced, so merging the same batch twice is a no-op.
    pub fn merge<I: IntoIterator<Item = Record>>(&mut self, fresh: I) -> MergeStats {
        let mut stats = MergeStats::default();
        for rec in fresh {
            if self.insert_new(rec) { stats.added += 1; } else { stats.ignored += 1; }
        }
        stats
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::collections::btree_map::Values<'a, CalendarMonth, Record>;

    fn into_iter(self) -> Self::IntoIter { self.records.values() }
}
