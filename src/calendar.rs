// src/calendar.rs
//! Calendar months: the key every page, record and chart point hangs off.

use std::{fmt, str::FromStr};

pub const MONTH_NAMES: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Years that survive a `YYYY-MM` round trip.
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// A `(year, month)` pair, year in `MIN_YEAR..=MAX_YEAR`, month in `1..=12`.
/// Orders chronologically and renders as `YYYY-MM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// `None` when `month` is outside `1..=12` or `year` has more than four digits.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let ok = (MIN_YEAR..=MAX_YEAR).contains(&year) && (1..=12).contains(&month);
        ok.then_some(Self { year, month })
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u32 { self.month }

    /// Lowercase English month name, e.g. `"november"`.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// Months since year 0; only differences of this are meaningful.
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(n: i64) -> Self {
        Self { year: n.div_euclid(12) as i32, month: n.rem_euclid(12) as u32 + 1 }
    }

    /// Every month from January of `start_year` through December of `end_year`.
    /// Empty when `start_year > end_year`; years are clamped to `MIN_YEAR..=MAX_YEAR`.
    pub fn range(start_year: i32, end_year: i32) -> MonthRange {
        let start_year = start_year.clamp(MIN_YEAR, MAX_YEAR);
        let end_year = end_year.clamp(MIN_YEAR - 1, MAX_YEAR);
        let next = Self { year: start_year, month: 1 }.ordinal();
        let end = Self { year: end_year, month: 12 }.ordinal() + 1;
        MonthRange { next, end: end.max(next) }
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected YYYY-MM, got '{0}'")]
pub struct ParseMonthError(pub String);

impl FromStr for CalendarMonth {
    type Err = ParseMonthError;

    /// Strict `YYYY-MM`: four digit year, dash, two digit month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s!(s));
        let (y, m) = s.split_once('-').ok_or_else(err)?;
        if y.len() != 4 || m.len() != 2
            || !y.bytes().all(|b| b.is_ascii_digit())
            || !m.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let year: i32 = y.parse().map_err(|_| err())?;
        let month: u32 = m.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

/// Signed month gap `current - reference`. Negative when the reference lies
/// in the future.
pub fn elapsed_months(current: CalendarMonth, reference: CalendarMonth) -> i32 {
    (current.year - reference.year) * 12 + (current.month as i32 - reference.month as i32)
}

/// Lazy ascending month sequence. Clone it to restart.
#[derive(Clone, Debug)]
pub struct MonthRange {
    next: i64,
    end: i64,
}

impl Iterator for MonthRange {
    type Item = CalendarMonth;

    fn next(&mut self) -> Option<CalendarMonth> {
        if self.next >= self.end { return None; }
        let m = CalendarMonth::from_ordinal(self.next);
        self.next += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = (self.end - self.next) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for MonthRange {}
