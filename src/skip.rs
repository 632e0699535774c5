use std::fmt;

/// Reasons a published release is passed over during resolution.
/// None of these are errors; they are logged and shown by `--list`.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Tag cannot be normalized to a semantic version
    UnparsableTag { tag: String },
    /// Release has nothing to download
    NoAssets { tag: String },
    /// Release leaves the major version of the running binary
    IncompatibleMajor { tag: String, major: u64 },
    /// Release falls outside the requested version constraint
    OutsideConstraint { tag: String, constraint: String },
    /// Release is a preview while only stable releases are wanted
    Unstable { tag: String, flagged: bool },
}

impl SkipReason {
    /// The tag this notice is about
    pub fn tag(&self) -> &str {
        match self {
            SkipReason::UnparsableTag { tag }
            | SkipReason::NoAssets { tag }
            | SkipReason::IncompatibleMajor { tag, .. }
            | SkipReason::OutsideConstraint { tag, .. }
            | SkipReason::Unstable { tag, .. } => tag,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnparsableTag { tag } => {
                write!(f, "Cannot parse tag '{}' as a version", tag)
            }
            SkipReason::NoAssets { tag } => {
                write!(f, "Release '{}' has no downloadable assets", tag)
            }
            SkipReason::IncompatibleMajor { tag, major } => {
                write!(
                    f,
                    "Release '{}' is not compatible with major version {}",
                    tag, major
                )
            }
            SkipReason::OutsideConstraint { tag, constraint } => {
                write!(f, "Release '{}' does not satisfy '{}'", tag, constraint)
            }
            SkipReason::Unstable { tag, flagged } => {
                if *flagged {
                    write!(f, "Release '{}' is marked as a prerelease", tag)
                } else {
                    write!(f, "Release '{}' is not a stable version", tag)
                }
            }
        }
    }
}
