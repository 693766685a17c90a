//! Security matrix loader for SQL Server.
//!
//! The source table name comes from trusted configuration but is still
//! spliced into the query text, so it is checked to be a plain one- or
//! two-part identifier and bracket-quoted.

use async_trait::async_trait;
use rolegen_core::{MatrixLoader, RolegenResult, SecurityRecord};
use tracing::info;

use crate::config::MssqlConfig;
use crate::error::{MssqlError, MssqlResult};
use crate::pool::MssqlPool;
use crate::row::{columns, decode_rows};

/// A validated `[schema].[table]` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixTable {
    schema: Option<String>,
    table: String,
}

impl MatrixTable {
    /// Parse `table`, `schema.table`, or their bracketed forms.
    pub fn parse(name: &str) -> MssqlResult<Self> {
        let parts: Vec<&str> = name.trim().split('.').collect();
        let parts: Vec<String> = parts
            .into_iter()
            .map(unbracket)
            .collect::<MssqlResult<_>>()?;

        match parts.as_slice() {
            [table] => Ok(Self {
                schema: None,
                table: table.clone(),
            }),
            [schema, table] => Ok(Self {
                schema: Some(schema.clone()),
                table: table.clone(),
            }),
            _ => Err(MssqlError::config(format!(
                "invalid security matrix table name: '{}'",
                name
            ))),
        }
    }

    /// The quoted name, e.g. `[dbo].[SecurityMatrix]`.
    pub fn quoted(&self) -> String {
        match &self.schema {
            Some(schema) => format!("[{}].[{}]", schema, self.table),
            None => format!("[{}]", self.table),
        }
    }
}

impl std::fmt::Display for MatrixTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.quoted())
    }
}

fn unbracket(part: &str) -> MssqlResult<String> {
    let part = part.trim();
    let inner = part
        .strip_prefix('[')
        .and_then(|p| p.strip_suffix(']'))
        .unwrap_or(part);

    let valid = !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ' ' || c == '$' || c == '#');
    if !valid {
        return Err(MssqlError::config(format!(
            "invalid identifier in security matrix table name: '{}'",
            part
        )));
    }
    Ok(inner.to_string())
}

/// Build the matrix query for a table.
pub fn matrix_query(table: &MatrixTable) -> String {
    let select: Vec<String> = columns::ALL.iter().map(|c| format!("[{}]", c)).collect();
    format!("SELECT {} FROM {}", select.join(", "), table.quoted())
}

/// Loads the security matrix from a SQL Server table.
#[derive(Debug, Clone)]
pub struct MssqlMatrixLoader {
    config: MssqlConfig,
    table: MatrixTable,
}

impl MssqlMatrixLoader {
    /// Create a loader for `table` on the server described by `config`.
    pub fn new(config: MssqlConfig, table: &str) -> MssqlResult<Self> {
        Ok(Self {
            config,
            table: MatrixTable::parse(table)?,
        })
    }

    /// The source table.
    pub fn table(&self) -> &MatrixTable {
        &self.table
    }

    /// Connect and read every matrix row.
    pub async fn fetch(&self) -> MssqlResult<Vec<SecurityRecord>> {
        let pool = MssqlPool::connect(self.config.clone()).await?;
        let mut conn = pool.get().await?;

        let rows = conn.query(&matrix_query(&self.table), &[]).await?;
        let records = decode_rows(&rows)?;

        info!(table = %self.table, records = records.len(), "Security matrix fetched");
        Ok(records)
    }
}

#[async_trait]
impl MatrixLoader for MssqlMatrixLoader {
    async fn load(&self) -> RolegenResult<Vec<SecurityRecord>> {
        Ok(self.fetch().await?)
    }

    fn describe(&self) -> String {
        format!(
            "{} on {}/{}",
            self.table,
            self.config.server_display(),
            self.config.database
        )
    }
}
