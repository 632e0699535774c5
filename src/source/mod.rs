//! Release source abstraction layer
//!
//! The resolver never talks to the network itself. It asks a [ReleaseSource]
//! for the raw release list of a repository and works on the result in memory.
//!
//! - [github::GitHubSource]: the GitHub releases API, with a response cache
//! - [mock::MockSource]: an in-memory list for tests
//!
//! ```rust
//! # use self_upgrade::source::{MockSource, ReleaseSource};
//! let source = MockSource::with_tags(&["v1.0.0", "v1.1.0"]);
//! let releases = source.fetch_releases("owner/tool", "tool/1.0.0").unwrap();
//! assert_eq!(releases.len(), 2);
//! ```

pub mod cache;
pub mod github;
pub mod mock;

pub use cache::ResponseCache;
pub use github::GitHubSource;
pub use mock::MockSource;

use crate::domain::RawRelease;
use crate::error::Result;

/// Where raw release records come from
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`; a single source (and its cache) may be
/// shared by resolutions running on different threads.
///
/// ## Error Handling
///
/// * [crate::error::UpgradeError::NoReleasesFound] - The repository publishes no releases
/// * [crate::error::UpgradeError::RemoteUnavailable] - The list could not be retrieved
pub trait ReleaseSource: Send + Sync {
    /// Fetch every published release of `repository` (`owner/name`)
    ///
    /// # Arguments
    /// * `repository` - Repository identifier, e.g. "owner/tool"
    /// * `user_agent` - Value of the `User-Agent` header sent upstream
    fn fetch_releases(&self, repository: &str, user_agent: &str) -> Result<Vec<RawRelease>>;
}

impl<S: ReleaseSource + ?Sized> ReleaseSource for &S {
    fn fetch_releases(&self, repository: &str, user_agent: &str) -> Result<Vec<RawRelease>> {
        (**self).fetch_releases(repository, user_agent)
    }
}

impl<S: ReleaseSource + ?Sized> ReleaseSource for Box<S> {
    fn fetch_releases(&self, repository: &str, user_agent: &str) -> Result<Vec<RawRelease>> {
        (**self).fetch_releases(repository, user_agent)
    }
}
