//! Version range constraints
//!
//! Wraps [`semver::VersionReq`] but evaluates comparators by plain precedence.
//! `semver`'s own matching refuses pre-release versions unless a comparator
//! names the same `major.minor.patch`, which would hide `2.1.0-beta1` from
//! `^2` even when previews are requested. Stability is a separate policy
//! predicate, so here a pre-release satisfies a range when its precedence
//! falls inside it. Upper bounds are exclusive on the release triple, so
//! `3.0.0-alpha` stays outside `^2`.

use crate::error::{Result, UpgradeError};
use semver::{BuildMetadata, Comparator, Op, Version, VersionReq};
use std::fmt;
use std::str::FromStr;

/// A parsed range expression such as `>=1.2, <2.0` or `^1.4 || ^2.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    source: String,
    alternatives: Vec<VersionReq>,
}

impl VersionConstraint {
    /// Parse a constraint expression.
    ///
    /// Comma-separated comparators must all hold; `||` separates alternatives
    /// of which any one may hold.
    pub fn parse(expr: &str) -> Result<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(UpgradeError::constraint("empty expression"));
        }

        let alternatives = trimmed
            .split("||")
            .map(str::trim)
            .map(|part| {
                if part.is_empty() {
                    return Err(UpgradeError::constraint(format!(
                        "'{}': empty alternative",
                        trimmed
                    )));
                }
                VersionReq::parse(part)
                    .map_err(|e| UpgradeError::constraint(format!("'{}': {}", trimmed, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(VersionConstraint {
            source: trimmed.to_string(),
            alternatives,
        })
    }

    /// Whether `version` satisfies the constraint. Build metadata is ignored.
    pub fn matches(&self, version: &Version) -> bool {
        let version = Version {
            build: BuildMetadata::EMPTY,
            ..version.clone()
        };

        self.alternatives.iter().any(|req| {
            req.comparators
                .iter()
                .all(|cmp| comparator_matches(cmp, &version))
        })
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for VersionConstraint {
    type Err = UpgradeError;

    fn from_str(s: &str) -> Result<Self> {
        VersionConstraint::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

type Triple = (u64, u64, u64);

fn comparator_matches(cmp: &Comparator, version: &Version) -> bool {
    let floor = Version {
        major: cmp.major,
        minor: cmp.minor.unwrap_or(0),
        patch: cmp.patch.unwrap_or(0),
        pre: cmp.pre.clone(),
        build: BuildMetadata::EMPTY,
    };
    let fully_specified = cmp.minor.is_some() && cmp.patch.is_some();

    match cmp.op {
        Op::Exact | Op::Wildcard if fully_specified => *version == floor,
        Op::Exact | Op::Wildcard => *version >= floor && below(version, partial_ceiling(cmp)),
        Op::Greater if fully_specified => *version > floor,
        Op::Greater => {
            let (major, minor, patch) = partial_ceiling(cmp);
            *version >= Version::new(major, minor, patch)
        }
        Op::GreaterEq => *version >= floor,
        Op::Less => *version < floor,
        Op::LessEq if fully_specified => *version <= floor,
        Op::LessEq => below(version, partial_ceiling(cmp)),
        Op::Tilde => *version >= floor && below(version, tilde_ceiling(cmp)),
        Op::Caret => *version >= floor && below(version, caret_ceiling(cmp)),
        _ => cmp.matches(version),
    }
}

/// Exclusive upper bound compared on the release triple only
fn below(version: &Version, ceiling: Triple) -> bool {
    (version.major, version.minor, version.patch) < ceiling
}

/// First version past a partial comparator: `1` -> 2.0.0, `1.2` -> 1.3.0
fn partial_ceiling(cmp: &Comparator) -> Triple {
    match (cmp.minor, cmp.patch) {
        (None, _) => (cmp.major.saturating_add(1), 0, 0),
        (Some(minor), None) => (cmp.major, minor.saturating_add(1), 0),
        (Some(minor), Some(patch)) => (cmp.major, minor, patch.saturating_add(1)),
    }
}

fn tilde_ceiling(cmp: &Comparator) -> Triple {
    match cmp.minor {
        Some(minor) => (cmp.major, minor.saturating_add(1), 0),
        None => (cmp.major.saturating_add(1), 0, 0),
    }
}

fn caret_ceiling(cmp: &Comparator) -> Triple {
    match (cmp.major, cmp.minor, cmp.patch) {
        (0, None, _) => (1, 0, 0),
        (0, Some(0), None) => (0, 1, 0),
        (0, Some(0), Some(patch)) => (0, 0, patch.saturating_add(1)),
        (0, Some(minor), _) => (0, minor.saturating_add(1), 0),
        (major, _, _) => (major.saturating_add(1), 0, 0),
    }
}
