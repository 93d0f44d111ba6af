// src/cache.rs
//! On-disk page cache.
//!
//! Bulletins never change once published, so a cached page is authoritative:
//! no expiry, no revalidation. Only successful fetches are written; a 404 for
//! a month that isn't out yet leaves nothing behind and is retried next run.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::calendar::CalendarMonth;
use crate::config::consts::CACHE_EXT;
use crate::core::net::Fetch;
use crate::core::sanitize::sanitize_file_stem;
use crate::error::FetchError;
use crate::file::{ensure_directory, write_atomic};
use crate::specs::bulletin::SourceLocator;

/// `{month_name}_{calendar_year}`, e.g. `november_2022`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_month(month: CalendarMonth) -> Self {
        Self(format!("{}_{}", month.month_name(), month.year()))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSource {
    Cache,
    Network,
}

#[derive(Clone, Debug)]
pub struct CachedPage {
    pub body: String,
    pub source: PageSource,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub fetches: usize,
    /// Network requests that came back with an error.
    pub failed: usize,
}

impl CacheStats {
    /// Requests that went to the fetcher, successful or not.
    pub fn network_attempts(&self) -> usize {
        self.fetches + self.failed
    }
}

/// Fetch-or-reuse in front of a [`Fetch`] implementation.
pub struct PageCache<F> {
    dir: PathBuf,
    fetcher: F,
    stats: Cell<CacheStats>,
}

impl<F: Fetch> PageCache<F> {
    pub fn new(dir: impl Into<PathBuf>, fetcher: F) -> Self {
        Self { dir: dir.into(), fetcher, stats: Cell::new(CacheStats::default()) }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn stats(&self) -> CacheStats { self.stats.get() }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(join!(&sanitize_file_stem(key.as_str()), ".", CACHE_EXT))
    }

    /// Whether a page for `key` is already on disk.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Cached body if present, else fetch and persist. Failed fetches write nothing.
    pub fn fetch_or_get(&self, locator: &SourceLocator) -> Result<CachedPage, FetchError> {
        let path = self.path_for(&locator.cache_key);

        if path.is_file() {
            match fs::read_to_string(&path) {
                Ok(body) => {
                    debug!(path = %path.display(), "cache hit");
                    self.bump(|s| s.hits += 1);
                    return Ok(CachedPage { body, source: PageSource::Cache });
                }
                Err(e) => warn!(path = %path.display(), error = %e, "unreadable cache file, refetching"),
            }
        }

        let body = match self.fetcher.fetch(&locator.url) {
            Ok(body) => body,
            Err(e) => {
                self.bump(|s| s.failed += 1);
                return Err(e);
            }
        };
        self.bump(|s| s.fetches += 1);

        // A failed write only costs a refetch next run.
        if let Err(e) = ensure_directory(&self.dir).and_then(|_| write_atomic(&path, body.as_bytes())) {
            warn!(path = %path.display(), error = %e, "could not cache page");
        }
        Ok(CachedPage { body, source: PageSource::Network })
    }

    fn bump(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut s = self.stats.get();
        f(&mut s);
        self.stats.set(s);
    }
}
