//! SQL Server connection wrapper.

use bb8::PooledConnection;
use bb8_tiberius::ConnectionManager;
use tiberius::Row;
use tracing::debug;

use crate::error::MssqlResult;

/// A pooled SQL Server connection.
pub struct MssqlConnection<'a> {
    client: PooledConnection<'a, ConnectionManager>,
}

impl<'a> MssqlConnection<'a> {
    pub(crate) fn new(client: PooledConnection<'a, ConnectionManager>) -> Self {
        Self { client }
    }

    /// Execute a query and return the rows of its first result set.
    pub async fn query(
        &mut self,
        sql: &str,
        params: &[&dyn tiberius::ToSql],
    ) -> MssqlResult<Vec<Row>> {
        debug!(sql = %sql, "Executing query");

        let stream = self.client.query(sql, params).await?;
        let rows = stream.into_first_result().await?;

        debug!(rows = rows.len(), "Query finished");
        Ok(rows)
    }
}
