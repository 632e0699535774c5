//! Release stability derived from a version's pre-release component
//!
//! A version is stable exactly when it carries no pre-release identifiers
//! (https://semver.org/#spec-item-9). The finer levels only serve display.

use semver::Version;
use std::fmt;

/// Stability level, ordered from least to most stable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stability {
    /// Development snapshot or an unrecognised pre-release label
    Dev,
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
    /// No pre-release component
    Stable,
}

impl Stability {
    /// Classify a parsed version
    ///
    /// # Examples
    /// - `1.0.0` -> Stable
    /// - `1.0.0-beta1`, `1.0.0-beta.2`, `1.0.0-b3` -> Beta
    /// - `1.0.0-rc.1` -> ReleaseCandidate
    /// - `1.0.0-snapshot` -> Dev
    pub fn of(version: &Version) -> Self {
        if version.pre.is_empty() {
            return Stability::Stable;
        }

        let first = version.pre.as_str().split('.').next().unwrap_or_default();
        Stability::from_label(first)
    }

    /// Map a pre-release label such as `beta1` or `RC` to a stability level.
    /// A label never maps to [`Stability::Stable`].
    pub fn from_label(label: &str) -> Self {
        let lowered = label.to_lowercase();
        let word = lowered.trim_end_matches(|c: char| c.is_ascii_digit() || c == '-');

        match word {
            "alpha" | "a" => Stability::Alpha,
            "beta" | "b" => Stability::Beta,
            "rc" | "c" => Stability::ReleaseCandidate,
            _ => Stability::Dev,
        }
    }

    /// Whether this is a stable release
    pub fn is_stable(&self) -> bool {
        *self == Stability::Stable
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Dev => write!(f, "dev"),
            Stability::Alpha => write!(f, "alpha"),
            Stability::Beta => write!(f, "beta"),
            Stability::ReleaseCandidate => write!(f, "rc"),
            Stability::Stable => write!(f, "stable"),
        }
    }
}
