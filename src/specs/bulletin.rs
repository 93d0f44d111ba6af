// src/specs/bulletin.rs
//! Where one monthly visa bulletin lives and how to read its priority date.
//!
//! - URLs are filed under the State Department fiscal year, which starts in
//!   October: the October, November and December bulletins of year `Y` live
//!   in folder `Y + 1`.
//! - The date sits in the employment-based final action table, at the row of
//!   the configured preference and the column of the configured chargeability
//!   area.
//! - Dates are printed as `DDMMMYY` (`01OCT13`).

use chrono::{Datelike, NaiveDate};
use scraper::Selector;

use crate::cache::CacheKey;
use crate::calendar::CalendarMonth;
use crate::config::options::{Category, ScrapeOptions};
use crate::core::html;
use crate::error::{Error, MalformedDate};

/// Path from `<body>` down to the employment-based table. `div table` rather
/// than `div > p > table`: the HTML5 tree builder closes an open `<p>` when a
/// `<table>` starts, so the table may or may not end up inside the paragraph.
const EB_TABLE_PATH: &str = "body > div.tsg-rwd-body-frame-row > div.contentbody \
    > div.tsg-rwd-main-copy-frame > div.tsg-rwd-main-copy-body-frame.withrail \
    > div.tsg-rwd-content-page-parsysxxx.parsys > div:nth-child(5) > div table";

pub fn fiscal_year(month: CalendarMonth) -> i32 {
    if month.month() >= 10 { month.year() + 1 } else { month.year() }
}

/// Where one month's bulletin lives, remotely and in the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocator {
    pub month: CalendarMonth,
    pub url: String,
    pub cache_key: CacheKey,
}

impl SourceLocator {
    pub fn new(base_url: &str, month: CalendarMonth) -> Self {
        let url = format!(
            "{}/{}/visa-bulletin-for-{}-{}.html",
            base_url.trim_end_matches('/'),
            fiscal_year(month),
            month.month_name(),
            month.year(),
        );
        Self { month, url, cache_key: CacheKey::for_month(month) }
    }
}

/// CSS selector for the category's cell.
pub fn selector_for(category: Category) -> String {
    format!(
        "{EB_TABLE_PATH} > tbody > tr:nth-child({}) > td:nth-child({})",
        category.preference.row(),
        category.chargeability.column(),
    )
}

/// Locates the priority date cell in a bulletin page.
#[derive(Clone, Debug)]
pub struct FieldExtractor {
    selector: Selector,
}

impl FieldExtractor {
    pub fn new(css: &str) -> Result<Self, Error> {
        let selector = html::compile_selector(css)
            .map_err(|e| Error::Config(format!("invalid field selector '{css}': {e}")))?;
        Ok(Self { selector })
    }

    /// Override selector if one is configured, else the category's cell.
    pub fn from_options(opts: &ScrapeOptions) -> Result<Self, Error> {
        match &opts.selector_override {
            Some(css) => Self::new(css),
            None => Self::new(&selector_for(opts.category)),
        }
    }

    /// Trimmed cell text; `None` when the layout doesn't match or the cell is blank.
    pub fn extract(&self, doc: &str) -> Option<String> {
        html::select_first_text(doc, &self.selector).filter(|t| !t.is_empty())
    }
}

/// `DDMMMYY` → `20YY-MM`. Anything else, including status codes like `C`
/// (current) or `U` (unavailable), is malformed.
///
/// Two-digit years always expand into the 2000s; bulletins before 2000 are
/// out of reach.
pub fn parse_priority_date(text: &str) -> Result<CalendarMonth, MalformedDate> {
    let malformed = || MalformedDate { raw: s!(text) };

    let t = text.trim();
    let b = t.as_bytes();
    let shape_ok = b.len() == 7
        && b[..2].iter().all(u8::is_ascii_digit)
        && b[2..5].iter().all(u8::is_ascii_alphabetic)
        && b[5..].iter().all(u8::is_ascii_digit);
    if !shape_ok {
        return Err(malformed());
    }

    // Validates the abbreviation and that the day exists in that month.
    let date = NaiveDate::parse_from_str(t, "%d%b%y").map_err(|_| malformed())?;
    let yy: i32 = t[5..].parse().map_err(|_| malformed())?;
    let year = 2000 + yy;
    if NaiveDate::from_ymd_opt(year, date.month(), date.day()).is_none() {
        return Err(malformed());
    }
    CalendarMonth::new(year, date.month()).ok_or_else(malformed)
}
