// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://travel.state.gov/content/travel/en/legal/visa-law0/visa-bulletin";
pub const USER_AGENT: &str = concat!("bulletin_scrape/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Range
pub const START_YEAR: i32 = 2016;

// Local cache
pub const CACHE_DIR: &str = "visa_bulletin_pages";
pub const CACHE_EXT: &str = "html";

// Dataset
pub const DATASET_FILE: &str = "data/visa_bulletin_dates.csv";
pub const DATASET_HEADERS: [&str; 3] = ["Calendar Date", "PD Date", "Time Difference (months)"];
pub const DATASET_SEP: char = ',';

// Chart
pub const CHART_FILE: &str = "data/visa_bulletin_plot.png";
pub const CHART_LABEL_EVERY: usize = 3;
pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 600;

// Pacing
pub const REQUEST_PAUSE_MS: u64 = 250; // be polite

// Warn loudly once this many pages miss the date cell
pub const STRUCTURE_WARN_THRESHOLD: usize = 3;
