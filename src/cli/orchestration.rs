//! Upgrade workflow orchestration logic
//!
//! Merges command-line flags with the configuration file, validates the
//! combination, and runs the resolver. Kept apart from `main.rs` so the
//! workflow can be driven programmatically without clap.

use semver::Version;

use crate::config::Config;
use crate::domain::ResolvedRelease;
use crate::error::{Result, UpgradeError};
use crate::resolver::{ReleaseResolver, ResolutionOptions, UpdateStatus};
use crate::source::ReleaseSource;

/// Arguments for the upgrade workflow
///
/// Mirrors the CLI Args in a form suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpgradeWorkflowArgs {
    /// Repository overriding `[source] repository`
    pub repository: Option<String>,

    /// Consider pre-release versions
    pub preview: bool,

    /// Only stable versions, even if the config enables previews
    pub stable: bool,

    /// Stay on the running major version
    pub compatible: bool,

    /// Range expression overriding `[policy] version_constraint`
    pub constraint: Option<String>,
}

/// Result of planning an upgrade
#[derive(Debug, Clone, PartialEq)]
pub enum UpgradePlan {
    /// Nothing to install
    UpToDate { current: Version },
    /// `release` should replace the running `current` version
    Available {
        current: Version,
        release: ResolvedRelease,
    },
}

impl UpgradePlan {
    pub fn current(&self) -> &Version {
        match self {
            UpgradePlan::UpToDate { current } | UpgradePlan::Available { current, .. } => current,
        }
    }
}

/// Repository to query, from the flags or the config file
pub fn effective_repository(args: &UpgradeWorkflowArgs, config: &Config) -> Result<String> {
    args.repository
        .clone()
        .or_else(|| config.source.repository.clone())
        .map(|repo| repo.trim().to_string())
        .filter(|repo| !repo.is_empty())
        .ok_or_else(|| {
            UpgradeError::config("No repository configured; pass --repo or set [source] repository")
        })
}

/// Build resolution options from flags layered over the config's `[policy]`.
///
/// `--preview` and `--stable` are mutually exclusive. `--stable` turns
/// previews off even when the config turns them on.
pub fn resolution_options(
    args: &UpgradeWorkflowArgs,
    config: &Config,
) -> Result<ResolutionOptions> {
    if args.preview && args.stable {
        return Err(UpgradeError::config(
            "--preview and --stable cannot be used together",
        ));
    }

    let preview = if args.stable {
        false
    } else {
        args.preview || config.policy.preview
    };

    let constraint = args
        .constraint
        .as_deref()
        .or(config.policy.version_constraint.as_deref())
        .unwrap_or_default();

    ResolutionOptions::new()
        .preview(preview)
        .compatible(args.compatible || config.policy.compatible)
        .constraint_expr(constraint)
}

/// Main upgrade planning workflow
///
/// 1. Validate flags and merge them with the config
/// 2. Fetch the release list through `source`
/// 3. Resolve the candidate and compare it with `current_version`
///
/// # Returns
/// * `Ok(UpgradePlan)` - What should happen
/// * `Err` - On invalid flags/config, or when the release list is unavailable
pub fn plan_upgrade<S: ReleaseSource + ?Sized>(
    args: &UpgradeWorkflowArgs,
    config: &Config,
    source: &S,
    current_version: &str,
) -> Result<UpgradePlan> {
    let options = resolution_options(args, config)?;
    let repository = effective_repository(args, config)?;

    let resolver = ReleaseResolver::new(
        source,
        repository,
        config.source.user_agent.clone(),
        current_version,
    )?;
    let current = resolver.current_version().clone();

    Ok(match resolver.check(&options)? {
        UpdateStatus::UpToDate => UpgradePlan::UpToDate { current },
        UpdateStatus::Available(release) => UpgradePlan::Available { current, release },
    })
}
