//! Response cache for release list requests
//!
//! Entries are keyed by request URL and stay fresh for the window the server
//! dictated through `Cache-Control: max-age`, or a fallback TTL when it sent none.

use crate::domain::RawRelease;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CachedResponse {
    releases: Vec<RawRelease>,
    stored_at: Instant,
    max_age: Duration,
}

/// Thread-safe URL-keyed cache of parsed release lists
#[derive(Debug)]
pub struct ResponseCache {
    fallback_ttl: Duration,
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    /// Create a cache using `fallback_ttl` when a response carries no `max-age`
    pub fn new(fallback_ttl: Duration) -> Self {
        ResponseCache {
            fallback_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh releases stored for `url`, if any
    pub fn get(&self, url: &str) -> Option<Vec<RawRelease>> {
        self.get_at(url, Instant::now())
    }

    /// Store releases fetched from `url`
    ///
    /// `max_age` is the server's freshness window; `Some(Duration::ZERO)`
    /// (e.g. `no-store`) means the response is not cached at all.
    pub fn store(&self, url: &str, releases: Vec<RawRelease>, max_age: Option<Duration>) {
        self.store_at(url, releases, max_age, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn get_at(&self, url: &str, now: Instant) -> Option<Vec<RawRelease>> {
        let mut entries = self.entries.lock();
        let fresh = entries
            .get(url)
            .map(|entry| now.saturating_duration_since(entry.stored_at) < entry.max_age)?;

        if fresh {
            entries.get(url).map(|entry| entry.releases.clone())
        } else {
            entries.remove(url);
            None
        }
    }

    fn store_at(
        &self,
        url: &str,
        releases: Vec<RawRelease>,
        max_age: Option<Duration>,
        now: Instant,
    ) {
        let max_age = max_age.unwrap_or(self.fallback_ttl);
        if max_age.is_zero() {
            return;
        }

        self.entries.lock().insert(
            url.to_string(),
            CachedResponse {
                releases,
                stored_at: now,
                max_age,
            },
        );
    }
}

/// Read the freshness window out of a `Cache-Control` header value
///
/// # Returns
/// * `Some(Duration)` - From `max-age=N`; zero for `no-store` / `no-cache`
/// * `None` - If the header says nothing about freshness
pub fn parse_max_age(header: &str) -> Option<Duration> {
    let mut max_age = None;

    for directive in header.split(',').map(str::trim) {
        let lowered = directive.to_ascii_lowercase();
        if lowered == "no-store" || lowered == "no-cache" {
            return Some(Duration::ZERO);
        }
        if let Some(seconds) = lowered.strip_prefix("max-age=") {
            max_age = seconds
                .trim_matches('"')
                .parse::<u64>()
                .ok()
                .map(Duration::from_secs);
        }
    }

    max_age
}
