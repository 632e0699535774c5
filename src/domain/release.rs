use crate::domain::stability::Stability;
use semver::Version;

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub url: String,
}

impl Asset {
    /// Create a new asset
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Asset {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Create an asset named after the last path segment of its URL
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let name = url
            .split(|c: char| c == '?' || c == '#')
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string();
        Asset { name, url }
    }
}

/// A release record exactly as the fetch side reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelease {
    pub tag: String,
    pub assets: Vec<Asset>,
    pub prerelease: bool,
}

impl RawRelease {
    /// Create a new raw release record
    pub fn new(tag: impl Into<String>, assets: Vec<Asset>, prerelease: bool) -> Self {
        RawRelease {
            tag: tag.into(),
            assets,
            prerelease,
        }
    }
}

/// A release whose tag normalized to a semantic version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag as published, e.g. "v2.3.0-beta1"
    pub raw_tag: String,
    /// Normalized version, build metadata removed
    pub version: Version,
    /// Publisher's own prerelease flag, independent of the tag text
    pub is_prerelease: bool,
    pub assets: Vec<Asset>,
}

impl Release {
    /// Pair a raw record with the version its tag normalized to
    pub fn new(raw: RawRelease, version: Version) -> Self {
        Release {
            raw_tag: raw.tag,
            version,
            is_prerelease: raw.prerelease,
            assets: raw.assets,
        }
    }

    /// Stability computed from the version string
    pub fn stability(&self) -> Stability {
        Stability::of(&self.version)
    }

    /// First asset, the one that gets installed
    pub fn primary_asset(&self) -> Option<&Asset> {
        self.assets.first()
    }
}

/// The single release chosen for installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub version: Version,
    /// Original tag, for user-facing messages
    pub display_tag: String,
    pub download_url: String,
    pub asset_name: String,
}

impl ResolvedRelease {
    /// Build from a release, or `None` if it has nothing to download
    pub fn from_release(release: &Release) -> Option<Self> {
        let asset = release.primary_asset()?;
        Some(ResolvedRelease {
            version: release.version.clone(),
            display_tag: release.raw_tag.clone(),
            download_url: asset.url.clone(),
            asset_name: asset.name.clone(),
        })
    }
}
