use crate::domain::{Asset, RawRelease};
use crate::error::{Result, UpgradeError};
use crate::source::ReleaseSource;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Failure a [MockSource] reports instead of its releases
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    NoReleases,
    Remote(String),
}

/// Mock release source for testing without network access
#[derive(Debug, Default)]
pub struct MockSource {
    releases: Vec<RawRelease>,
    failure: Option<MockFailure>,
    fetches: AtomicUsize,
}

impl MockSource {
    /// Create a new empty mock source
    pub fn new() -> Self {
        MockSource::default()
    }

    /// Create a source publishing `tags`, each with one asset and no prerelease flag
    pub fn with_tags(tags: &[&str]) -> Self {
        let mut source = MockSource::new();
        for tag in tags {
            source.add_tag(tag);
        }
        source
    }

    /// Create a source that fails every fetch
    pub fn failing(failure: MockFailure) -> Self {
        MockSource {
            failure: Some(failure),
            ..MockSource::default()
        }
    }

    /// Add a release with a single asset
    pub fn add_tag(&mut self, tag: &str) {
        let asset = Asset::from_url(format!("https://downloads.example.com/{}/tool", tag));
        self.releases.push(RawRelease::new(tag, vec![asset], false));
    }

    /// Add a fully specified release record
    pub fn add_release(&mut self, release: RawRelease) {
        self.releases.push(release);
    }

    /// Number of fetches served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ReleaseSource for MockSource {
    fn fetch_releases(&self, _repository: &str, _user_agent: &str) -> Result<Vec<RawRelease>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        match &self.failure {
            Some(MockFailure::NoReleases) => Err(UpgradeError::NoReleasesFound),
            Some(MockFailure::Remote(msg)) => Err(UpgradeError::remote(msg.clone())),
            None => Ok(self.releases.clone()),
        }
    }
}
