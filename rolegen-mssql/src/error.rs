//! Error types for SQL Server matrix loading.

use rolegen_core::RolegenError;
use thiserror::Error;

/// Result type for MSSQL operations.
pub type MssqlResult<T> = Result<T, MssqlError>;

/// Errors that can occur while reading the security matrix from SQL Server.
#[derive(Error, Debug)]
pub enum MssqlError {
    /// Connection pool error.
    #[error("pool error: {0}")]
    Pool(String),

    /// Tiberius/SQL Server error.
    #[error("sql server error: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Row deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Timeout error.
    #[error("operation timed out after {0}ms")]
    Timeout(u64),
}

impl MssqlError {
    /// Create a pool error.
    pub fn pool(message: impl Into<String>) -> Self {
        Self::Pool(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization(message.into())
    }
}

impl From<MssqlError> for RolegenError {
    fn from(err: MssqlError) -> Self {
        match err {
            MssqlError::Config(msg) => RolegenError::Config(msg),
            other => RolegenError::Load(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MssqlError::config("database name is required");
        assert!(matches!(err, MssqlError::Config(_)));

        let err = MssqlError::pool("exhausted");
        assert_eq!(err.to_string(), "pool error: exhausted");
    }

    #[test]
    fn test_into_rolegen_error() {
        let err: RolegenError = MssqlError::config("missing host").into();
        assert!(matches!(err, RolegenError::Config(_)));

        let err: RolegenError = MssqlError::Timeout(1000).into();
        assert!(err.is_load_error());
        assert_eq!(err.to_string(), "load error: operation timed out after 1000ms");
    }

    #[test]
    fn test_error_display() {
        let err = MssqlError::deserialization("column 'SecurityRole' is null");
        assert_eq!(
            err.to_string(),
            "deserialization error: column 'SecurityRole' is null"
        );
    }
}
