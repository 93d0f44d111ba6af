// tests/common/mod.rs
//
// Shared fixtures: synthetic bulletin pages, a canned fetcher, option builders.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use bulletin_scrape::cache::PageCache;
use bulletin_scrape::calendar::CalendarMonth;
use bulletin_scrape::config::options::AppOptions;
use bulletin_scrape::core::net::Fetch;
use bulletin_scrape::error::FetchError;
use bulletin_scrape::specs::bulletin::SourceLocator;

pub const BASE_URL: &str = "https://bulletins.test/visa-bulletin";

pub fn month(y: i32, m: u32) -> CalendarMonth {
    CalendarMonth::new(y, m).unwrap()
}

/// A page shaped like a real bulletin. The employment-based table is the only
/// table in the 5th content block; `eb3_china` lands in row 4, column 3.
pub fn bulletin_page(eb3_china: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Visa Bulletin</title></head>
<body>
<div class="tsg-rwd-body-frame-row">
  <div class="contentbody">
    <div class="tsg-rwd-main-copy-frame">
      <div class="tsg-rwd-main-copy-body-frame withrail">
        <div class="tsg-rwd-content-page-parsysxxx parsys">
          <div class="text"><p>Number 12, Volume X</p></div>
          <div class="text"><p>A. Statutory numbers</p></div>
          <div class="text"><p>Family-sponsored table</p></div>
          <div class="text"><p>Notes</p></div>
          <div class="text"><div><p>
            <table>
              <tbody>
                <tr><td>Employment-based</td><td>All Chargeability Areas Except Those Listed</td><td>CHINA-mainland born</td><td>INDIA</td><td>MEXICO</td><td>PHILIPPINES</td></tr>
                <tr><td>1st</td><td>C</td><td>01FEB20</td><td>01JAN19</td><td>C</td><td>C</td></tr>
                <tr><td>2nd</td><td>01MAR21</td><td>01APR18</td><td>15SEP11</td><td>01MAR21</td><td>01MAR21</td></tr>
                <tr><td>3rd</td><td>01JUN21</td><td>
                  {eb3_china}
                </td><td>01JUN12</td><td>01JUN21</td><td>01JUN21</td></tr>
                <tr><td>Other Workers</td><td>01JAN20</td><td>01JAN15</td><td>01JUN12</td><td>01JAN20</td><td>01JAN20</td></tr>
              </tbody>
            </table>
          </p></div></div>
        </div>
      </div>
    </div>
  </div>
</div>
</body>
</html>
"#
    )
}

/// What an error page or a redesigned bulletin looks like to the extractor.
pub fn unrelated_page() -> String {
    "<!DOCTYPE html><html><body><h1>Page Not Found</h1><p>Sorry.</p></body></html>".to_string()
}

/// In-memory fetcher: known URLs return their body, everything else is a 404.
/// Records every URL asked for.
#[derive(Default)]
pub struct MapFetcher {
    pages: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self { Self::default() }

    pub fn with_page(mut self, m: CalendarMonth, body: String) -> Self {
        self.pages.insert(SourceLocator::new(BASE_URL, m).url, body);
        self
    }

    pub fn calls(&self) -> Vec<String> { self.calls.borrow().clone() }
    pub fn call_count(&self) -> usize { self.calls.borrow().len() }
}

impl Fetch for MapFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status { url: url.to_string(), status: 404 })
    }
}

/// Populate the page cache through its own interface.
pub fn seed_cache(cache_dir: &Path, pages: &[(CalendarMonth, String)]) {
    let mut fetcher = MapFetcher::new();
    for (m, body) in pages {
        fetcher = fetcher.with_page(*m, body.clone());
    }
    let cache = PageCache::new(cache_dir, &fetcher);
    for (m, _) in pages {
        cache.fetch_or_get(&SourceLocator::new(BASE_URL, *m)).unwrap();
    }
}

/// Options rooted in a scratch dir, no politeness pause, chart off.
pub fn options(root: &Path, start_year: i32, end_year: i32) -> AppOptions {
    let mut o = AppOptions::default();
    o.scrape.start_year = start_year;
    o.scrape.end_year = end_year;
    o.scrape.base_url = BASE_URL.to_string();
    o.scrape.request_pause = Duration::ZERO;
    o.store.dataset_path = root.join("data").join("visa_bulletin_dates.csv");
    o.store.cache_dir = root.join("visa_bulletin_pages");
    o.chart.enabled = false;
    o.chart.path = root.join("data").join("visa_bulletin_plot.png");
    o
}
