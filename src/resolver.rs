//! Release resolution: pick the one release that should be installed
//!
//! [select_candidate] and [decide] are pure functions over a [Catalog];
//! [ReleaseResolver] wires them to a [ReleaseSource] and the running version.
//! Nothing is cached between calls.

use crate::catalog::Catalog;
use crate::domain::{leading_major, parse_version, Release, ResolvedRelease, VersionConstraint};
use crate::error::Result;
use crate::skip::SkipReason;
use crate::source::ReleaseSource;
use semver::Version;
use tracing::{debug, info, warn};

/// Policy applied when choosing a release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOptions {
    /// Consider pre-release versions and releases flagged as prereleases
    pub preview: bool,
    /// Only consider releases sharing the running major version
    pub compatible: bool,
    /// Explicit range releases must satisfy
    pub version_constraint: Option<VersionConstraint>,
}

impl ResolutionOptions {
    pub fn new() -> Self {
        ResolutionOptions::default()
    }

    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn compatible(mut self, compatible: bool) -> Self {
        self.compatible = compatible;
        self
    }

    pub fn constraint(mut self, constraint: VersionConstraint) -> Self {
        self.version_constraint = Some(constraint);
        self
    }

    /// Set the constraint from an expression; blank means no constraint
    pub fn constraint_expr(mut self, expr: &str) -> Result<Self> {
        self.version_constraint = if expr.trim().is_empty() {
            None
        } else {
            Some(VersionConstraint::parse(expr)?)
        };
        Ok(self)
    }
}

/// Outcome of comparing the resolved candidate with the running version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// No eligible release is newer than the running version
    UpToDate,
    /// This release should be installed
    Available(ResolvedRelease),
}

impl UpdateStatus {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, UpdateStatus::UpToDate)
    }

    /// The release to install, if any
    pub fn release(&self) -> Option<&ResolvedRelease> {
        match self {
            UpdateStatus::UpToDate => None,
            UpdateStatus::Available(release) => Some(release),
        }
    }
}

/// Select the newest release passing every active predicate.
///
/// Predicates run in order and stop at the first failure for each release:
/// 1. At least one asset (the first one is what gets downloaded)
/// 2. With `compatible`: has the major read from `current_version` with
///    `^v?(\d+)`, pre-releases included. If no major can be read the filter is off.
/// 3. With a constraint: satisfies it
/// 4. Without `preview`: no pre-release component and no publisher prerelease flag
///
/// # Returns
/// * `Some(ResolvedRelease)` - The first release in catalog order passing all predicates
/// * `None` - If no release passes; this is not an error
pub fn select_candidate(
    catalog: &Catalog,
    options: &ResolutionOptions,
    current_version: &str,
) -> Option<ResolvedRelease> {
    let major = compatible_major(options, current_version);

    for release in catalog {
        match evaluate(release, options, major) {
            Ok(resolved) => {
                info!(tag = %resolved.display_tag, version = %resolved.version, "resolved release");
                return Some(resolved);
            }
            Err(reason) => debug!(%reason, "skipping release"),
        }
    }

    None
}

/// Why each release that policy rejects was passed over, newest first
pub fn rejections(
    catalog: &Catalog,
    options: &ResolutionOptions,
    current_version: &str,
) -> Vec<SkipReason> {
    let major = compatible_major(options, current_version);
    catalog
        .iter()
        .filter_map(|release| evaluate(release, options, major).err())
        .collect()
}

/// The running major version when the compatible filter is active
fn compatible_major(options: &ResolutionOptions, current_version: &str) -> Option<u64> {
    if !options.compatible {
        return None;
    }

    let major = leading_major(current_version);
    if major.is_none() {
        warn!(
            current = current_version,
            "cannot read a major version, compatible filter disabled"
        );
    }
    major
}

/// Check one release against the policy; `major` is the running major version
/// when the compatible filter is active
pub fn evaluate(
    release: &Release,
    options: &ResolutionOptions,
    major: Option<u64>,
) -> std::result::Result<ResolvedRelease, SkipReason> {
    let tag = || release.raw_tag.clone();

    let resolved = ResolvedRelease::from_release(release).ok_or_else(|| SkipReason::NoAssets {
        tag: tag(),
    })?;

    if let Some(major) = major {
        if release.version.major != major {
            return Err(SkipReason::IncompatibleMajor { tag: tag(), major });
        }
    }

    if let Some(constraint) = &options.version_constraint {
        if !constraint.matches(&release.version) {
            return Err(SkipReason::OutsideConstraint {
                tag: tag(),
                constraint: constraint.to_string(),
            });
        }
    }

    if !options.preview {
        if !release.stability().is_stable() {
            return Err(SkipReason::Unstable {
                tag: tag(),
                flagged: false,
            });
        }
        if release.is_prerelease {
            return Err(SkipReason::Unstable {
                tag: tag(),
                flagged: true,
            });
        }
    }

    Ok(resolved)
}

/// Compare a candidate with the running version.
///
/// Up to date when there is no candidate or `current >= candidate`.
pub fn decide(candidate: Option<ResolvedRelease>, current: &Version) -> UpdateStatus {
    match candidate {
        Some(release) if release.version > *current => UpdateStatus::Available(release),
        _ => UpdateStatus::UpToDate,
    }
}

/// Resolves releases of one repository for the running binary
pub struct ReleaseResolver<'a, S: ReleaseSource + ?Sized> {
    source: &'a S,
    repository: String,
    user_agent: String,
    current: Version,
}

impl<'a, S: ReleaseSource + ?Sized> ReleaseResolver<'a, S> {
    /// Create a resolver
    ///
    /// # Arguments
    /// * `source` - Where release lists are fetched from
    /// * `repository` - Repository identifier, e.g. "owner/tool"
    /// * `user_agent` - Sent with every fetch
    /// * `current_version` - Version of the running binary, e.g. "2.0.0" or "v2.0.0"
    ///
    /// # Returns
    /// * `Err` - If `current_version` is not a semantic version
    pub fn new(
        source: &'a S,
        repository: impl Into<String>,
        user_agent: impl Into<String>,
        current_version: &str,
    ) -> Result<Self> {
        let current = parse_version(current_version)?;

        Ok(ReleaseResolver {
            source,
            repository: repository.into(),
            user_agent: user_agent.into(),
            current,
        })
    }

    /// The running version, normalized
    pub fn current_version(&self) -> &Version {
        &self.current
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Fetch and build a fresh catalog
    pub fn catalog(&self) -> Result<Catalog> {
        let raw = self
            .source
            .fetch_releases(&self.repository, &self.user_agent)?;
        Catalog::build(raw)
    }

    /// The release that policy selects, regardless of the running version
    pub fn resolve_latest(&self, options: &ResolutionOptions) -> Result<Option<ResolvedRelease>> {
        let catalog = self.catalog()?;
        Ok(select_candidate(&catalog, options, &self.current.to_string()))
    }

    /// Whether an update is available, and which
    pub fn check(&self, options: &ResolutionOptions) -> Result<UpdateStatus> {
        let candidate = self.resolve_latest(options)?;
        Ok(decide(candidate, &self.current))
    }

    /// Convenience over [Self::check]
    pub fn is_up_to_date(&self, options: &ResolutionOptions) -> Result<bool> {
        Ok(self.check(options)?.is_up_to_date())
    }
}
