use thiserror::Error;

/// Unified error type for conventional-release operations
///
/// Commit parsing and bump recommendation never fail. Only the version
/// applier produces `InvalidVersion` and `InvalidBump`; `Config` and `Io`
/// come from configuration loading.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Invalid bump: {0}")]
    InvalidBump(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in conventional-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    /// Create an invalid bump error with context
    pub fn invalid_bump(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidBump(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }
}
