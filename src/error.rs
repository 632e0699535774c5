use thiserror::Error;

/// Unified error type for self-upgrade operations
#[derive(Error, Debug)]
pub enum UpgradeError {
    #[error("No releases found")]
    NoReleasesFound,

    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid version constraint: {0}")]
    Constraint(String),

    #[error("Install failed: {0}")]
    Install(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFormat(#[from] toml::de::Error),
}

/// Convenience type alias for Results in self-upgrade
pub type Result<T> = std::result::Result<T, UpgradeError>;

impl UpgradeError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        UpgradeError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        UpgradeError::Version(msg.into())
    }

    /// Create a constraint error with context
    pub fn constraint(msg: impl Into<String>) -> Self {
        UpgradeError::Constraint(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        UpgradeError::RemoteUnavailable(msg.into())
    }

    /// Create an install error with context
    pub fn install(msg: impl Into<String>) -> Self {
        UpgradeError::Install(msg.into())
    }
}
