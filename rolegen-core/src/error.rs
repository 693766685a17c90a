//! Error types for role generation.

use thiserror::Error;

/// Result type for rolegen operations.
pub type RolegenResult<T> = Result<T, RolegenError>;

/// Errors that can occur while loading a security matrix or writing role artifacts.
#[derive(Error, Debug)]
pub enum RolegenError {
    /// Filesystem error while writing artifacts.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The security matrix could not be loaded.
    #[error("load error: {0}")]
    Load(String),

    /// A role was requested that does not appear in the matrix.
    #[error("role '{0}' not found in security matrix")]
    UnknownRole(String),
}

impl RolegenError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    /// Create an unknown role error.
    pub fn unknown_role(role: impl Into<String>) -> Self {
        Self::UnknownRole(role.into())
    }

    /// Check if this error happened while loading the matrix.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Load(_))
    }
}
