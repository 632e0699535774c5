//! Domain logic - pure version and release rules, no network or filesystem access

pub mod constraint;
pub mod release;
pub mod stability;
pub mod version;

pub use constraint::VersionConstraint;
pub use release::{Asset, RawRelease, Release, ResolvedRelease};
pub use stability::Stability;
pub use version::{leading_major, normalize_tag, parse_version};
