//! Release catalog: normalized, de-duplicated releases in descending version order

use crate::domain::{normalize_tag, RawRelease, Release};
use crate::error::{Result, UpgradeError};
use crate::skip::SkipReason;
use semver::Version;
use std::collections::BTreeMap;
use tracing::debug;

/// Releases of one resolution call, newest first
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    releases: Vec<Release>,
    skipped: Vec<SkipReason>,
}

impl Catalog {
    /// Build a catalog from raw release records.
    ///
    /// Tags that do not normalize are skipped, not reported as errors. When
    /// several tags normalize to the same version the one seen last is kept.
    ///
    /// # Returns
    /// * `Ok(Catalog)` - Possibly empty if no tag normalized
    /// * `Err(UpgradeError::NoReleasesFound)` - If `raw` itself is empty
    pub fn build(raw: Vec<RawRelease>) -> Result<Self> {
        if raw.is_empty() {
            return Err(UpgradeError::NoReleasesFound);
        }

        let mut by_version: BTreeMap<Version, Release> = BTreeMap::new();
        let mut skipped = Vec::new();

        for record in raw {
            let Some(version) = normalize_tag(&record.tag) else {
                let reason = SkipReason::UnparsableTag { tag: record.tag };
                debug!(%reason, "skipping release");
                skipped.push(reason);
                continue;
            };

            let release = Release::new(record, version.clone());
            if let Some(previous) = by_version.insert(version, release) {
                debug!(tag = %previous.raw_tag, "replaced by a later tag with the same version");
            }
        }

        Ok(Catalog {
            releases: by_version.into_values().rev().collect(),
            skipped,
        })
    }

    /// Releases in strictly descending version order
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    /// Tags dropped because they did not normalize
    pub fn skipped(&self) -> &[SkipReason] {
        &self.skipped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Release> {
        self.releases.iter()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Highest version regardless of policy
    pub fn newest(&self) -> Option<&Release> {
        self.releases.first()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Release;
    type IntoIter = std::slice::Iter<'a, Release>;

    fn into_iter(self) -> Self::IntoIter {
        self.releases.iter()
    }
}
