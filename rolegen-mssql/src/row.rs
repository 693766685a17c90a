//! SQL Server row decoding.

use rolegen_core::SecurityRecord;
use tiberius::Row;

use crate::error::{MssqlError, MssqlResult};

/// Security matrix column names.
pub mod columns {
    /// Role name column.
    pub const ROLE: &str = "SecurityRole";
    /// Table name column.
    pub const TABLE: &str = "RestrictedTable";
    /// Column name column.
    pub const COLUMN: &str = "RestrictedColumn";
    /// Permitted value column.
    pub const DATA: &str = "RestrictedData";

    /// All matrix columns, in select order.
    pub const ALL: [&str; 4] = [ROLE, TABLE, COLUMN, DATA];
}

/// Extension trait for typed column access by name.
pub trait MssqlRow {
    /// Get a nullable column value.
    fn get_opt<'a, T>(&'a self, column: &str) -> MssqlResult<Option<T>>
    where
        T: tiberius::FromSql<'a>;
}

impl MssqlRow for Row {
    fn get_opt<'a, T>(&'a self, column: &str) -> MssqlResult<Option<T>>
    where
        T: tiberius::FromSql<'a>,
    {
        self.try_get(column).map_err(|e| {
            MssqlError::deserialization(format!("failed to get column '{}': {}", column, e))
        })
    }
}

/// Decode a SQL Server row into a value.
pub trait FromMssqlRow: Sized {
    /// Decode from a row.
    fn from_row(row: &Row) -> MssqlResult<Self>;
}

impl FromMssqlRow for SecurityRecord {
    fn from_row(row: &Row) -> MssqlResult<Self> {
        record_from_fields(
            row.get_opt(columns::ROLE)?,
            row.get_opt(columns::TABLE)?,
            row.get_opt(columns::COLUMN)?,
            row.get_opt(columns::DATA)?,
        )
    }
}

/// Build a record from the four matrix fields. The role must be non-null;
/// empty strings are kept as they are.
pub fn record_from_fields(
    role: Option<&str>,
    table: Option<&str>,
    column: Option<&str>,
    value: Option<&str>,
) -> MssqlResult<SecurityRecord> {
    let role = role.ok_or_else(|| {
        MssqlError::deserialization(format!("column '{}' is null", columns::ROLE))
    })?;
    Ok(SecurityRecord::new(role, table, column, value))
}

/// Decode every row, reporting the index of the first bad one.
pub fn decode_rows<T: FromMssqlRow>(rows: &[Row]) -> MssqlResult<Vec<T>> {
    decode_indexed(rows, T::from_row)
}

fn decode_indexed<R, T>(
    rows: impl IntoIterator<Item = R>,
    mut decode: impl FnMut(R) -> MssqlResult<T>,
) -> MssqlResult<Vec<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            decode(row).map_err(|e| match e {
                MssqlError::Deserialization(msg) => {
                    MssqlError::deserialization(format!("row {}: {}", i, msg))
                }
                other => MssqlError::deserialization(format!("row {}: {}", i, other)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(
            columns::ALL,
            [
                "SecurityRole",
                "RestrictedTable",
                "RestrictedColumn",
                "RestrictedData"
            ]
        );
    }

    #[test]
    fn test_record_from_fields() {
        let record = record_from_fields(Some("RoleA"), Some("T1"), Some(""), None).unwrap();
        assert_eq!(record, SecurityRecord::new("RoleA", Some("T1"), Some(""), None));
    }

    #[test]
    fn test_null_role_is_an_error() {
        let err = record_from_fields(None, Some("T1"), Some("ColX"), None).unwrap_err();
        assert!(matches!(err, MssqlError::Deserialization(_)));
        assert_eq!(
            err.to_string(),
            "deserialization error: column 'SecurityRole' is null"
        );
    }

    #[test]
    fn test_decode_reports_row_index() {
        let rows = [
            (Some("RoleA"), Some("T1")),
            (Some("RoleB"), None),
            (None, Some("T2")),
        ];
        let err = decode_indexed(rows, |(role, table)| {
            record_from_fields(role, table, None, None)
        })
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "deserialization error: row 2: column 'SecurityRole' is null"
        );
    }

    #[test]
    fn test_decode_keeps_row_order() {
        let rows = [(Some("RoleB"), Some("T2")), (Some("RoleA"), None)];
        let records =
            decode_indexed(rows, |(role, table)| record_from_fields(role, table, None, None))
                .unwrap();

        assert_eq!(records[0].role, "RoleB");
        assert_eq!(records[1].table, None);
    }

    #[test]
    fn test_decode_no_rows() {
        let records: Vec<SecurityRecord> = decode_rows(&[]).unwrap();
        assert!(records.is_empty());
    }
}
