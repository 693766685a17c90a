//! Matrix source selection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rolegen_core::{MatrixLoader, RolegenError, RolegenResult, SecurityRecord};
use rolegen_mssql::{MssqlConfig, MssqlMatrixLoader};
use tracing::debug;

use crate::cli::SourceArgs;
use crate::config::Config;
use crate::error::{CliError, CliResult};

/// Loads the matrix from a JSON array of records.
///
/// Each element uses the source table's column names:
///
/// ```json
/// [{ "SecurityRole": "RoleA", "RestrictedTable": "T1", "RestrictedColumn": "ColX", "RestrictedData": null }]
/// ```
#[derive(Debug, Clone)]
pub struct JsonMatrixLoader {
    path: PathBuf,
}

impl JsonMatrixLoader {
    /// Create a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The input file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MatrixLoader for JsonMatrixLoader {
    async fn load(&self) -> RolegenResult<Vec<SecurityRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RolegenError::load(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            RolegenError::load(format!("invalid matrix file {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick the matrix loader from flags, environment and config.
///
/// A JSON input file wins over any database setting.
pub fn resolve_loader(args: &SourceArgs, config: &Config) -> CliResult<Box<dyn MatrixLoader>> {
    let source = &config.source;

    if let Some(input) = args.input.as_ref().or(source.input.as_ref()) {
        return Ok(Box::new(JsonMatrixLoader::new(input)));
    }

    if let Some(driver) = &args.driver {
        debug!(driver = %driver, "ODBC driver setting ignored, connecting over TDS");
    }

    let table = args
        .table
        .as_deref()
        .or(source.table.as_deref())
        .ok_or_else(|| {
            CliError::Config(
                "security matrix table is required (--table or TABLE_SECURITY_ROLES_NAME)"
                    .to_string(),
            )
        })?;

    let mssql = mssql_config(args, config)?;
    Ok(Box::new(MssqlMatrixLoader::new(mssql, table)?))
}

fn mssql_config(args: &SourceArgs, config: &Config) -> CliResult<MssqlConfig> {
    let source = &config.source;
    let trust_cert = args.trust_cert || source.trust_cert;

    let connection_string = args
        .connection_string
        .as_deref()
        .or(source.connection_string.as_deref());
    if let Some(conn_str) = connection_string {
        let mssql = MssqlConfig::from_connection_string(conn_str)?;
        return Ok(if trust_cert {
            mssql.with_trust_cert(true)
        } else {
            mssql
        });
    }

    let server = args.server.as_deref().or(source.server.as_deref());
    let database = args.database.as_deref().or(source.database.as_deref());
    let (Some(server), Some(database)) = (server, database) else {
        return Err(CliError::Config(
            "no matrix source: pass --input, a connection string, or --server and --database \
             (SERVER_NAME / DATABASE_NAME)"
                .to_string(),
        ));
    };

    let username = args.username.as_deref().or(source.username.as_deref());
    let password = args.password.as_deref().or(source.password.as_deref());

    Ok(MssqlConfig::from_parts(server, database, username, password)?.with_trust_cert(trust_cert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_input_wins() {
        let args = SourceArgs {
            input: Some(PathBuf::from("matrix.json")),
            server: Some("sql01".into()),
            ..SourceArgs::default()
        };
        let loader = resolve_loader(&args, &Config::default()).unwrap();
        assert_eq!(loader.describe(), "matrix.json");
    }

    #[test]
    fn test_mssql_from_parts() {
        let args = SourceArgs {
            server: Some("sql01".into()),
            database: Some("Security".into()),
            username: Some("reader".into()),
            password: Some("pw".into()),
            table: Some("dbo.Matrix".into()),
            ..SourceArgs::default()
        };
        let loader = resolve_loader(&args, &Config::default()).unwrap();
        assert_eq!(loader.describe(), "[dbo].[Matrix] on sql01/Security");
    }

    #[test]
    fn test_mssql_from_config_file() {
        let config = Config::parse(
            r#"
            [source]
            connection_string = "Server=db,1500;Database=Sec;User Id=u;Password=p"
            table = "Matrix"
            "#,
        )
        .unwrap();
        let loader = resolve_loader(&SourceArgs::default(), &config).unwrap();
        assert_eq!(loader.describe(), "[Matrix] on db,1500/Sec");
    }

    #[test]
    fn test_missing_table() {
        let args = SourceArgs {
            server: Some("sql01".into()),
            database: Some("Security".into()),
            ..SourceArgs::default()
        };
        let err = resolve_loader(&args, &Config::default()).err().unwrap();
        assert!(err.to_string().contains("table is required"));
    }

    #[test]
    fn test_missing_server() {
        let args = SourceArgs {
            table: Some("Matrix".into()),
            ..SourceArgs::default()
        };
        let err = resolve_loader(&args, &Config::default()).err().unwrap();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[tokio::test]
    async fn test_json_loader() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.json");
        std::fs::write(
            &path,
            r#"[
                {"SecurityRole": "RoleA", "RestrictedTable": "T1", "RestrictedColumn": "ColX", "RestrictedData": null},
                {"SecurityRole": "RoleB", "RestrictedTable": null, "RestrictedColumn": null, "RestrictedData": null}
            ]"#,
        )
        .unwrap();

        let records = JsonMatrixLoader::new(&path).load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hidden_column(), Some("ColX"));
    }

    #[tokio::test]
    async fn test_json_loader_bad_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matrix.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonMatrixLoader::new(&path).load().await.unwrap_err();
        assert!(err.is_load_error());
    }
}
