// src/runner.rs
//! Pipeline driver.
//!
//! Per calendar month, strictly one after another:
//!
//! ```text
//! Pending → Fetched → Extracted → Normalized → Computed → Merged
//!    └──────────┴──────────┴───────────┴──────────→ Skipped
//! ```
//!
//! Months already in the persisted dataset never enter the pipeline, which is
//! what makes a rerun with nothing new a byte-for-byte no-op. The dataset file
//! is only replaced after the whole range has been walked and merged.

use std::path::PathBuf;
use std::thread;

use tracing::{debug, info, warn};

use crate::cache::{CacheStats, PageCache};
use crate::calendar::CalendarMonth;
use crate::chart;
use crate::config::options::AppOptions;
use crate::core::net::Fetch;
use crate::data::Record;
use crate::error::{Error, SkipKind, SkipReason};
use crate::progress::Progress;
use crate::specs::bulletin::{parse_priority_date, FieldExtractor, SourceLocator};
use crate::store;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub fetch: usize,
    pub field_not_found: usize,
    pub malformed_date: usize,
}

impl SkipCounts {
    fn bump(&mut self, kind: SkipKind) {
        match kind {
            SkipKind::Fetch => self.fetch += 1,
            SkipKind::FieldNotFound => self.field_not_found += 1,
            SkipKind::MalformedDate => self.malformed_date += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.fetch + self.field_not_found + self.malformed_date
    }
}

/// Summary of what a run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Records loaded from disk.
    pub existing: usize,
    /// Records added this run.
    pub parsed: usize,
    pub total: usize,
    /// Months passed over because the dataset already had them.
    pub already_known: usize,
    pub skipped: SkipCounts,
    pub cache: CacheStats,
    pub dataset_path: PathBuf,
    pub chart_path: Option<PathBuf>,
    /// Enough pages missed the date cell that the layout has likely changed.
    pub layout_warning: bool,
}

pub struct Pipeline<F> {
    opts: AppOptions,
    cache: PageCache<F>,
    extractor: FieldExtractor,
}

impl<F: Fetch> Pipeline<F> {
    /// Validates options and compiles the field selector up front, so a bad
    /// configuration fails before anything is read or fetched.
    pub fn new(opts: AppOptions, fetcher: F) -> Result<Self, Error> {
        opts.validate()?;
        let extractor = FieldExtractor::from_options(&opts.scrape)?;
        let cache = PageCache::new(opts.store.cache_dir.clone(), fetcher);
        Ok(Self { opts, cache, extractor })
    }

    /// Cumulative over every run of this pipeline.
    pub fn cache_stats(&self) -> CacheStats { self.cache.stats() }

    /// Run the full range once. Per-month failures are reported through
    /// `progress` and counted; only dataset, chart and config errors return `Err`.
    pub fn run(&self, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary, Error> {
        let scrape = &self.opts.scrape;
        let dataset_path = &self.opts.store.dataset_path;
        let stats_before = self.cache.stats();

        let mut dataset = store::load_dataset(dataset_path)?;
        let existing = dataset.len();
        info!(existing, path = %dataset_path.display(), "loaded dataset");
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Loaded {existing} existing records from {}", dataset_path.display()));
        }

        let months = CalendarMonth::range(scrape.start_year, scrape.end_year);
        if let Some(p) = progress.as_deref_mut() {
            p.begin(months.len());
        }

        let mut fresh: Vec<Record> = Vec::new();
        let mut skipped = SkipCounts::default();
        let mut already_known = 0usize;

        for month in months {
            if dataset.contains(month) {
                already_known += 1;
                debug!(%month, "already parsed");
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Skipping {month} - already parsed"));
                }
                continue;
            }

            match self.process_month(month) {
                Ok(rec) => {
                    info!(%month, pd = %rec.priority_date(), gap = rec.elapsed_months(), "parsed");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(&rec);
                    }
                    fresh.push(rec);
                }
                Err(reason) => {
                    warn!(%month, %reason, "skipping month");
                    skipped.bump(reason.kind());
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_skipped(month, &reason);
                    }
                }
            }
        }

        let merged = dataset.merge(fresh);
        if merged.ignored > 0 {
            warn!(ignored = merged.ignored, "fresh records for known months were dropped");
        }
        store::save_dataset(dataset_path, &dataset)?;
        info!(added = merged.added, total = dataset.len(), "dataset written");

        let chart_path = if !self.opts.chart.enabled {
            None
        } else if dataset.is_empty() {
            info!("dataset is empty, no chart");
            None
        } else {
            chart::render(&dataset, &self.opts.chart)?;
            Some(self.opts.chart.path.clone())
        };

        let threshold = scrape.structure_warn_threshold;
        let layout_warning = threshold > 0 && skipped.field_not_found >= threshold;
        if layout_warning {
            warn!(
                missing = skipped.field_not_found,
                "priority date cell missing on many pages; the bulletin layout may have changed"
            );
        }

        let after = self.cache.stats();
        let summary = RunSummary {
            existing,
            parsed: merged.added,
            total: dataset.len(),
            already_known,
            skipped,
            cache: CacheStats {
                hits: after.hits - stats_before.hits,
                fetches: after.fetches - stats_before.fetches,
                failed: after.failed - stats_before.failed,
            },
            dataset_path: dataset_path.clone(),
            chart_path,
            layout_warning,
        };

        if let Some(p) = progress.as_deref_mut() {
            p.finish(&summary);
        }
        Ok(summary)
    }

    /// Fetch → extract → normalize → compute for one month.
    pub fn process_month(&self, month: CalendarMonth) -> Result<Record, SkipReason> {
        let locator = SourceLocator::new(&self.opts.scrape.base_url, month);
        debug!(%month, url = %locator.url, "processing");

        let before = self.cache.stats().network_attempts();
        let page = self.cache.fetch_or_get(&locator);
        if self.cache.stats().network_attempts() > before {
            self.pause();
        }
        let page = page?;

        debug!(%month, source = ?page.source, "page ready");
        let text = self.extractor.extract(&page.body).ok_or(SkipReason::FieldNotFound)?;
        let pd = parse_priority_date(&text)?;
        Ok(Record::new(month, pd))
    }

    /// Be polite after every request that reached the server, 404s included.
    fn pause(&self) {
        let scrape = &self.opts.scrape;
        if !scrape.offline && !scrape.request_pause.is_zero() {
            thread::sleep(scrape.request_pause);
        }
    }
}
