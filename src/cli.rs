// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::calendar::CalendarMonth;
use crate::config::options::{AppOptions, Chargeability, Preference};
use crate::core::net::{Fetch, HttpFetcher, OfflineFetcher};
use crate::data::Record;
use crate::error::{Error, SkipReason};
use crate::progress::Progress;
use crate::runner::{Pipeline, RunSummary};

/// Track one visa bulletin priority date over time.
///
/// Fetches every monthly bulletin from the start year on (cached on disk),
/// appends the new months to a CSV history and redraws the chart.
#[derive(Parser, Debug)]
#[command(name = "bulletin_scrape", version, about)]
pub struct Cli {
    /// First calendar year to scan.
    #[arg(long)]
    pub start_year: Option<i32>,
    /// Last calendar year to scan (default: this year).
    #[arg(long)]
    pub end_year: Option<i32>,
    /// Bulletin root; fiscal-year folders hang off it.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Persisted CSV dataset.
    #[arg(long)]
    pub dataset: Option<PathBuf>,
    /// Directory holding cached bulletin pages.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,
    /// Chart output (PNG).
    #[arg(long)]
    pub chart: Option<PathBuf>,
    /// Skip rendering the chart.
    #[arg(long)]
    pub no_chart: bool,
    /// Show every N-th calendar label on the chart.
    #[arg(long)]
    pub label_every: Option<usize>,
    /// Employment-based preference row.
    #[arg(long, value_enum)]
    pub preference: Option<Preference>,
    /// Chargeability area column.
    #[arg(long, value_enum)]
    pub chargeability: Option<Chargeability>,
    /// Full CSS selector for the date cell (overrides preference/chargeability).
    #[arg(long)]
    pub selector: Option<String>,
    /// Per-request HTTP timeout.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Pause after each network fetch.
    #[arg(long)]
    pub pause_ms: Option<u64>,
    /// Use cached pages only; never hit the network.
    #[arg(long)]
    pub offline: bool,
    /// Missing-date-cell count that triggers the layout-change warning (0 = never).
    #[arg(long)]
    pub structure_warn_threshold: Option<usize>,
    /// More log output on stderr (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Defaults with every given flag applied on top.
    pub fn to_options(&self) -> AppOptions {
        let mut o = AppOptions::default();
        let s = &mut o.scrape;
        if let Some(v) = self.start_year { s.start_year = v; }
        if let Some(v) = self.end_year { s.end_year = v; }
        if let Some(v) = &self.base_url { s.base_url = v.clone(); }
        if let Some(v) = self.preference { s.category.preference = v; }
        if let Some(v) = self.chargeability { s.category.chargeability = v; }
        if let Some(v) = &self.selector { s.selector_override = Some(v.clone()); }
        if let Some(v) = self.timeout_secs { s.timeout = Duration::from_secs(v); }
        if let Some(v) = self.pause_ms { s.request_pause = Duration::from_millis(v); }
        if let Some(v) = self.structure_warn_threshold { s.structure_warn_threshold = v; }
        s.offline = self.offline;

        if let Some(v) = &self.dataset { o.store.dataset_path = v.clone(); }
        if let Some(v) = &self.cache_dir { o.store.cache_dir = v.clone(); }

        if let Some(v) = &self.chart { o.chart.path = v.clone(); }
        if let Some(v) = self.label_every { o.chart.label_every = v; }
        o.chart.enabled = !self.no_chart;
        o
    }
}

/// Prints per-month status and the final summary to stdout.
pub struct CliProgress {
    category: String,
}

impl CliProgress {
    pub fn new(category: String) -> Self { Self { category } }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        println!("Checking {total} bulletin months for {}", self.category);
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, record: &Record) {
        println!(
            "{}: {} PD date {} (time difference {} months)",
            record.calendar(),
            self.category,
            record.priority_date(),
            record.elapsed_months(),
        );
    }

    fn item_skipped(&mut self, month: CalendarMonth, reason: &SkipReason) {
        println!("Skipping {month}: {reason}");
    }

    fn finish(&mut self, s: &RunSummary) {
        println!("Existing records: {}", s.existing);
        println!("Newly parsed records: {}", s.parsed);
        println!("Total records: {}", s.total);
        if s.skipped.total() > 0 {
            println!(
                "Skipped: {} download, {} layout, {} date format",
                s.skipped.fetch, s.skipped.field_not_found, s.skipped.malformed_date
            );
        }
        println!(
            "Pages: {} from cache, {} downloaded, {} failed requests",
            s.cache.hits, s.cache.fetches, s.cache.failed
        );
        println!("Data written to {}", s.dataset_path.display());
        if let Some(p) = &s.chart_path {
            println!("Plot saved as {}", p.display());
        }
        if s.layout_warning {
            println!(
                "WARNING: {} pages had no priority date cell. The bulletin layout may have changed; check --selector.",
                s.skipped.field_not_found
            );
        }
    }
}

/// Build the pipeline from parsed flags and run it once.
pub fn run(cli: &Cli) -> Result<RunSummary, Error> {
    let opts = cli.to_options();
    let fetcher: Box<dyn Fetch> = if opts.scrape.offline {
        Box::new(OfflineFetcher)
    } else {
        Box::new(
            HttpFetcher::new(opts.scrape.timeout)
                .map_err(|e| Error::Config(format!("HTTP client: {e}")))?,
        )
    };

    let mut progress = CliProgress::new(opts.scrape.category.label());
    let pipeline = Pipeline::new(opts, fetcher)?;
    pipeline.run(Some(&mut progress))
}
