// tests/page_cache.rs
mod common;

use bulletin_scrape::cache::{PageCache, PageSource};
use bulletin_scrape::core::net::OfflineFetcher;
use bulletin_scrape::error::FetchError;
use bulletin_scrape::specs::bulletin::SourceLocator;
use common::{bulletin_page, month, seed_cache, MapFetcher, BASE_URL};
use tempfile::tempdir;

#[test]
fn miss_fetches_and_persists_then_hits() {
    let tmp = tempdir().unwrap();
    let m = month(2017, 1);
    let fetcher = MapFetcher::new().with_page(m, bulletin_page("01MAY15"));
    let cache = PageCache::new(tmp.path().join("pages"), &fetcher);
    let loc = SourceLocator::new(BASE_URL, m);

    assert!(!cache.contains(&loc.cache_key));
    let first = cache.fetch_or_get(&loc).unwrap();
    assert_eq!(first.source, PageSource::Network);
    assert!(cache.contains(&loc.cache_key));
    // Created on demand, one file per month.
    assert_eq!(std::fs::read_dir(cache.dir()).unwrap().count(), 1);

    let second = cache.fetch_or_get(&loc).unwrap();
    assert_eq!(second.source, PageSource::Cache);
    assert_eq!(second.body, first.body);

    assert_eq!(fetcher.call_count(), 1);
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.fetches), (1, 1));
}

#[test]
fn cached_page_is_authoritative() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("pages");
    let m = month(2017, 2);
    seed_cache(&dir, &[(m, bulletin_page("01JUN15"))]);

    // A fetcher that would serve something else is never asked.
    let fetcher = MapFetcher::new().with_page(m, bulletin_page("01JAN01"));
    let cache = PageCache::new(&dir, &fetcher);
    let page = cache.fetch_or_get(&SourceLocator::new(BASE_URL, m)).unwrap();
    assert!(page.body.contains("01JUN15"));
    assert_eq!(fetcher.call_count(), 0);
}

#[test]
fn failed_fetch_writes_nothing() {
    let tmp = tempdir().unwrap();
    let fetcher = MapFetcher::new();
    let cache = PageCache::new(tmp.path().join("pages"), &fetcher);
    let loc = SourceLocator::new(BASE_URL, month(2030, 5));

    let err = cache.fetch_or_get(&loc).unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert!(!cache.contains(&loc.cache_key));

    // Nothing cached, so the next attempt goes back to the network.
    let _ = cache.fetch_or_get(&loc);
    assert_eq!(fetcher.call_count(), 2);
    let stats = cache.stats();
    assert_eq!((stats.fetches, stats.failed), (0, 2));
}

#[test]
fn offline_serves_cache_only() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("pages");
    let cached = month(2017, 3);
    seed_cache(&dir, &[(cached, bulletin_page("01JUL15"))]);

    let cache = PageCache::new(&dir, OfflineFetcher);
    assert!(cache.fetch_or_get(&SourceLocator::new(BASE_URL, cached)).is_ok());
    let err = cache.fetch_or_get(&SourceLocator::new(BASE_URL, month(2017, 4))).unwrap_err();
    assert!(matches!(err, FetchError::Offline { .. }));
}
