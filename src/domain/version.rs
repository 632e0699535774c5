use crate::error::{Result, UpgradeError};
use regex::Regex;
use semver::{BuildMetadata, Version};

/// Normalize a release tag into a canonical semantic version.
///
/// Accepts the tag conventions seen in the wild:
/// - an optional leading `v` or `V` (`v1.2.3`)
/// - missing minor/patch components, padded with zeros (`v2` -> `2.0.0`, `1.4` -> `1.4.0`)
/// - pre-release suffixes (`2.3.0-beta1`, `1.0-rc.2`)
/// - build metadata (`1.2.3+linux`), which is dropped because it never takes
///   part in precedence
///
/// Returns `None` for anything else (`nightly`, `latest`, `1.2.3.4`, leading zeros).
pub fn normalize_tag(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let clean = trimmed
        .strip_prefix(|c: char| c == 'v' || c == 'V')
        .unwrap_or(trimmed);

    let captures = Regex::new(
        r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?((?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$",
    )
    .ok()
    .and_then(|re| re.captures(clean))?;

    let component = |index: usize| captures.get(index).map_or("0", |m| m.as_str());
    let suffix = captures.get(4).map_or("", |m| m.as_str());
    let candidate = format!(
        "{}.{}.{}{}",
        component(1),
        component(2),
        component(3),
        suffix
    );

    let mut version = Version::parse(&candidate).ok()?;
    version.build = BuildMetadata::EMPTY;
    Some(version)
}

/// Parse a version the caller supplies (typically the running binary's own
/// version), using the same normalization as release tags.
pub fn parse_version(raw: &str) -> Result<Version> {
    normalize_tag(raw).ok_or_else(|| {
        UpgradeError::version(format!(
            "Invalid version '{}' - expected a semantic version such as 1.2.3",
            raw
        ))
    })
}

/// Extract the leading major component of a version string (`^v?(\d+)`).
///
/// Works on the raw string rather than a parsed [`Version`] so that a current
/// version such as `2-dev` still yields a major number.
pub fn leading_major(raw: &str) -> Option<u64> {
    Regex::new(r"^v?(\d+)")
        .ok()
        .and_then(|re| re.captures(raw.trim()))
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_normalize_plain() {
        assert_eq!(normalize_tag("1.2.3"), Some(v("1.2.3")));
    }

    #[test]
    fn test_normalize_with_v_prefix() {
        assert_eq!(normalize_tag("v1.2.3"), Some(v("1.2.3")));
        assert_eq!(normalize_tag("V0.1.0"), Some(v("0.1.0")));
    }

    #[test]
    fn test_normalize_pads_missing_components() {
        assert_eq!(normalize_tag("v2"), Some(v("2.0.0")));
        assert_eq!(normalize_tag("1.4"), Some(v("1.4.0")));
        assert_eq!(normalize_tag("1.4-rc.2"), Some(v("1.4.0-rc.2")));
    }

    #[test]
    fn test_normalize_prerelease() {
        let version = normalize_tag("v2.3.0-beta1").unwrap();
        assert_eq!(version.to_string(), "2.3.0-beta1");
        assert!(!version.pre.is_empty());
    }

    #[test]
    fn test_normalize_drops_build_metadata() {
        let version = normalize_tag("1.2.3+linux.amd64").unwrap();
        assert_eq!(version.to_string(), "1.2.3");
        assert_eq!(normalize_tag("1.2.3+a"), normalize_tag("1.2.3+b"));
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_tag("  v1.0.0\n"), Some(v("1.0.0")));
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        for tag in [
            "nightly",
            "latest",
            "",
            "v",
            "1.2.3.4",
            "vv1.2.3",
            "01.2.3",
            "1.2.x",
            "release-1.0.0",
        ] {
            assert_eq!(normalize_tag(tag), None, "tag {:?} should not normalize", tag);
        }
    }

    #[test]
    fn test_normalize_rejects_bad_prerelease() {
        assert_eq!(normalize_tag("1.0.0-"), None);
        assert_eq!(normalize_tag("1.0.0-beta..1"), None);
        assert_eq!(normalize_tag("1.0.0-01"), None);
    }

    #[test]
    fn test_parse_version_error() {
        let err = parse_version("not-a-version").unwrap_err();
        assert!(err.to_string().contains("not-a-version"));
    }

    #[test]
    fn test_leading_major() {
        assert_eq!(leading_major("2.5.0"), Some(2));
        assert_eq!(leading_major("v10.0.1"), Some(10));
        assert_eq!(leading_major("3-dev"), Some(3));
        assert_eq!(leading_major("dev-main"), None);
        assert_eq!(leading_major(""), None);
    }
}
