use crate::config::SourceConfig;
use crate::domain::{Asset, RawRelease};
use crate::error::{Result, UpgradeError};
use crate::source::cache::{parse_max_age, ResponseCache};
use crate::source::ReleaseSource;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    assets: Vec<GitHubAsset>,
}

#[derive(Debug, Deserialize)]
struct GitHubAsset {
    name: String,
    browser_download_url: String,
}

/// Release source backed by the GitHub releases API
pub struct GitHubSource {
    api_base: String,
    agent: ureq::Agent,
    cache: ResponseCache,
}

impl GitHubSource {
    /// Create a source talking to `api_base` (e.g. "https://api.github.com")
    pub fn new(api_base: impl Into<String>, timeout: Duration, fallback_ttl: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(15).min(timeout))
            .timeout(timeout)
            .build();

        GitHubSource {
            api_base: api_base.into(),
            agent,
            cache: ResponseCache::new(fallback_ttl),
        }
    }

    /// Create a source from the `[source]` configuration table
    pub fn from_config(config: &SourceConfig) -> Self {
        GitHubSource::new(
            config.api_base.clone(),
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    /// URL of the release list for `repository`
    pub fn releases_url(&self, repository: &str) -> String {
        format!(
            "{}/repos/{}/releases?per_page=100",
            self.api_base.trim_end_matches('/'),
            repository.trim_matches('/')
        )
    }

    /// The cache in front of this source
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

impl ReleaseSource for GitHubSource {
    fn fetch_releases(&self, repository: &str, user_agent: &str) -> Result<Vec<RawRelease>> {
        let url = self.releases_url(repository);

        if let Some(releases) = self.cache.get(&url) {
            debug!(%url, "release list served from cache");
            return Ok(releases);
        }

        debug!(%url, "fetching release list");
        let response = match self
            .agent
            .get(&url)
            .set("User-Agent", user_agent)
            .set("Accept", "application/vnd.github+json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Err(UpgradeError::NoReleasesFound),
            Err(ureq::Error::Status(code, response)) => {
                return Err(UpgradeError::remote(format!(
                    "{} returned HTTP {} {}",
                    url,
                    code,
                    response.status_text()
                )))
            }
            Err(e) => return Err(UpgradeError::remote(format!("{}: {}", url, e))),
        };

        let max_age = response.header("Cache-Control").and_then(parse_max_age);
        let releases = parse_release_list(response.into_reader())?;

        if releases.is_empty() {
            return Err(UpgradeError::NoReleasesFound);
        }

        self.cache.store(&url, releases.clone(), max_age);
        Ok(releases)
    }
}

/// Parse a GitHub release list body, dropping drafts
fn parse_release_list(reader: impl std::io::Read) -> Result<Vec<RawRelease>> {
    let body: Vec<GitHubRelease> = serde_json::from_reader(reader)
        .map_err(|e| UpgradeError::remote(format!("Malformed release list: {}", e)))?;

    Ok(body
        .into_iter()
        .filter(|release| !release.draft)
        .map(|release| {
            let assets = release
                .assets
                .into_iter()
                .map(|asset| Asset::new(asset.name, asset.browser_download_url))
                .collect();
            RawRelease::new(release.tag_name, assets, release.prerelease)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
        {
            "tag_name": "v2.0.0-beta1",
            "prerelease": true,
            "draft": false,
            "assets": [
                {"name": "tool-linux.tar.gz", "browser_download_url": "https://github.com/o/t/releases/download/v2.0.0-beta1/tool-linux.tar.gz", "size": 10}
            ]
        },
        {
            "tag_name": "v1.9.0",
            "prerelease": false,
            "draft": false,
            "assets": []
        },
        {
            "tag_name": "v3.0.0",
            "prerelease": false,
            "draft": true,
            "assets": []
        }
    ]"#;

    #[test]
    fn test_parse_release_list() {
        let releases = parse_release_list(BODY.as_bytes()).unwrap();
        assert_eq!(releases.len(), 2);

        assert_eq!(releases[0].tag, "v2.0.0-beta1");
        assert!(releases[0].prerelease);
        assert_eq!(releases[0].assets[0].name, "tool-linux.tar.gz");
        assert!(releases[0].assets[0].url.ends_with("/tool-linux.tar.gz"));

        assert_eq!(releases[1].tag, "v1.9.0");
        assert!(releases[1].assets.is_empty());
    }

    #[test]
    fn test_parse_release_list_rejects_garbage() {
        let err = parse_release_list(r#"{"message": "Not Found"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, UpgradeError::RemoteUnavailable(_)));
    }

    #[test]
    fn test_parse_release_list_missing_optional_fields() {
        let releases = parse_release_list(r#"[{"tag_name": "1.0.0"}]"#.as_bytes()).unwrap();
        assert_eq!(releases, vec![RawRelease::new("1.0.0", vec![], false)]);
    }

    #[test]
    fn test_releases_url() {
        let source = GitHubSource::new(
            "https://api.github.com/",
            Duration::from_secs(5),
            Duration::from_secs(60),
        );
        assert_eq!(
            source.releases_url("owner/tool"),
            "https://api.github.com/repos/owner/tool/releases?per_page=100"
        );
    }

    #[test]
    fn test_cached_list_skips_network() {
        let source = GitHubSource::new(
            "http://127.0.0.1:9",
            Duration::from_secs(1),
            Duration::from_secs(60),
        );
        let url = source.releases_url("owner/tool");
        let cached = vec![RawRelease::new("v1.0.0", vec![], false)];
        source.cache().store(&url, cached.clone(), None);

        let releases = source.fetch_releases("owner/tool", "test").unwrap();
        assert_eq!(releases, cached);
    }
}
