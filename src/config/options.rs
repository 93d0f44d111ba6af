// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use chrono::Datelike;
use clap::ValueEnum;

use super::consts::*;
use crate::calendar::{MAX_YEAR, MIN_YEAR};
use crate::error::Error;

/// Everything one run needs. Built once (defaults + CLI overrides) and handed
/// to the pipeline; nothing reads configuration from anywhere else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub store: StoreOptions,
    pub chart: ChartOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            scrape: ScrapeOptions::default(),
            store: StoreOptions::default(),
            chart: ChartOptions::default(),
        }
    }
}

impl AppOptions {
    pub fn validate(&self) -> Result<(), Error> {
        let s = &self.scrape;
        for year in [s.start_year, s.end_year] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(Error::Config(format!(
                    "year {year} is outside {MIN_YEAR}..={MAX_YEAR}"
                )));
            }
        }
        if s.start_year > s.end_year {
            return Err(Error::Config(format!(
                "start year {} is after end year {}", s.start_year, s.end_year
            )));
        }
        if s.base_url.trim().is_empty() {
            return Err(Error::Config(s!("base URL is empty")));
        }
        if self.chart.label_every == 0 {
            return Err(Error::Config(s!("chart label interval must be at least 1")));
        }
        Ok(())
    }
}

/// Employment-based preference row in the bulletin's final action table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preference {
    First,
    Second,
    Third,
    OtherWorkers,
    Fourth,
}

impl Preference {
    /// 1-based `<tr>` position; row 1 is the header.
    pub fn row(self) -> usize {
        match self {
            Preference::First => 2,
            Preference::Second => 3,
            Preference::Third => 4,
            Preference::OtherWorkers => 5,
            Preference::Fourth => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preference::First => "EB1",
            Preference::Second => "EB2",
            Preference::Third => "EB3",
            Preference::OtherWorkers => "EB3 Other Workers",
            Preference::Fourth => "EB4",
        }
    }
}

/// Chargeability column in the same table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Chargeability {
    AllAreas,
    ChinaMainland,
    India,
    Mexico,
    Philippines,
}

impl Chargeability {
    /// 1-based `<td>` position; column 1 holds the preference name.
    pub fn column(self) -> usize {
        match self {
            Chargeability::AllAreas => 2,
            Chargeability::ChinaMainland => 3,
            Chargeability::India => 4,
            Chargeability::Mexico => 5,
            Chargeability::Philippines => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Chargeability::AllAreas => "All Chargeability Areas",
            Chargeability::ChinaMainland => "China Mainland",
            Chargeability::India => "India",
            Chargeability::Mexico => "Mexico",
            Chargeability::Philippines => "Philippines",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    pub preference: Preference,
    pub chargeability: Chargeability,
}

impl Default for Category {
    fn default() -> Self {
        Self { preference: Preference::Third, chargeability: Chargeability::ChinaMainland }
    }
}

impl Category {
    pub fn label(&self) -> String {
        join!(self.preference.label(), " ", self.chargeability.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub start_year: i32,
    /// Inclusive; defaults to the current local year.
    pub end_year: i32,
    pub base_url: String,
    pub category: Category,
    /// Full CSS selector replacing the one derived from `category`.
    pub selector_override: Option<String>,
    pub timeout: Duration,
    /// Sleep after each network fetch. Cache hits never sleep.
    pub request_pause: Duration,
    /// Serve from cache only; never touch the network.
    pub offline: bool,
    pub structure_warn_threshold: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            start_year: START_YEAR,
            end_year: chrono::Local::now().year(),
            base_url: s!(BASE_URL),
            category: Category::default(),
            selector_override: None,
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            request_pause: Duration::from_millis(REQUEST_PAUSE_MS),
            offline: false,
            structure_warn_threshold: STRUCTURE_WARN_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    pub dataset_path: PathBuf,
    pub cache_dir: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DATASET_FILE),
            cache_dir: PathBuf::from(CACHE_DIR),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartOptions {
    pub enabled: bool,
    pub path: PathBuf,
    /// Show every N-th x label.
    pub label_every: usize,
    /// Minimum canvas size; width grows with the series.
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(CHART_FILE),
            label_every: CHART_LABEL_EVERY,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        }
    }
}
