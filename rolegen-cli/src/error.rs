//! CLI error types and result alias.

use miette::Diagnostic;
use rolegen_core::RolegenError;
use rolegen_mssql::MssqlError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(rolegen::io))]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(rolegen::config),
        help("set it in rolegen.toml, the environment, or a .env file")
    )]
    Config(String),

    /// Matrix source error
    #[error("Source error: {0}")]
    #[diagnostic(code(rolegen::source))]
    Source(String),

    /// Role lookup error
    #[error("Role error: {0}")]
    #[diagnostic(code(rolegen::role))]
    Role(String),

    /// Artifact output error
    #[error("Output error: {0}")]
    #[diagnostic(code(rolegen::output))]
    Output(String),
}

impl From<RolegenError> for CliError {
    fn from(err: RolegenError) -> Self {
        match err {
            RolegenError::Io(e) => CliError::Io(e),
            RolegenError::Json(e) => CliError::Output(e.to_string()),
            RolegenError::Config(msg) => CliError::Config(msg),
            RolegenError::Load(msg) => CliError::Source(msg),
            RolegenError::UnknownRole(role) => {
                CliError::Role(format!("'{}' not found in security matrix", role))
            }
        }
    }
}

impl From<MssqlError> for CliError {
    fn from(err: MssqlError) -> Self {
        match err {
            MssqlError::Config(msg) => CliError::Config(msg),
            other => CliError::Source(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(format!("Failed to parse TOML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rolegen_error() {
        let err: CliError = RolegenError::unknown_role("Ghost").into();
        assert_eq!(
            err.to_string(),
            "Role error: 'Ghost' not found in security matrix"
        );

        let err: CliError = RolegenError::load("timeout").into();
        assert!(matches!(err, CliError::Source(_)));
    }

    #[test]
    fn test_from_mssql_error() {
        let err: CliError = MssqlError::config("server is required").into();
        assert_eq!(err.to_string(), "Configuration error: server is required");
    }
}
