//! Security matrix records.

use serde::{Deserialize, Serialize};

/// One row of the security matrix.
///
/// The field names on the wire match the source table columns
/// (`SecurityRole`, `RestrictedTable`, `RestrictedColumn`, `RestrictedData`).
///
/// How a record is interpreted:
///
/// | `table` | `column` | `value` | Meaning                                   |
/// |---------|----------|---------|-------------------------------------------|
/// | `None`  | any      | any     | no table restriction                      |
/// | `Some`  | `None`   | any     | table listed, no restriction (value ignored) |
/// | `Some`  | `Some`   | `None`  | hide the column (OLS)                     |
/// | `Some`  | `Some`   | `Some`  | row filter `[column] == "value"` (RLS)    |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRecord {
    /// Security role name.
    #[serde(rename = "SecurityRole", alias = "role")]
    pub role: String,
    /// Restricted table, if any.
    #[serde(rename = "RestrictedTable", alias = "table", default)]
    pub table: Option<String>,
    /// Restricted column, if any.
    #[serde(rename = "RestrictedColumn", alias = "column", default)]
    pub column: Option<String>,
    /// Permitted value for a row filter, if any.
    #[serde(rename = "RestrictedData", alias = "value", default)]
    pub value: Option<String>,
}

impl SecurityRecord {
    /// Create a record from its four matrix fields.
    pub fn new(
        role: impl Into<String>,
        table: Option<&str>,
        column: Option<&str>,
        value: Option<&str>,
    ) -> Self {
        Self {
            role: role.into(),
            table: table.map(String::from),
            column: column.map(String::from),
            value: value.map(String::from),
        }
    }

    /// Whether this record belongs to the given table.
    pub fn is_for_table(&self, table: &str) -> bool {
        self.table.as_deref() == Some(table)
    }

    /// The column this record hides, if it is a column-hiding rule.
    pub fn hidden_column(&self) -> Option<&str> {
        match (&self.column, &self.value) {
            (Some(column), None) => Some(column),
            _ => None,
        }
    }

    /// The `(column, value)` pair, if this record is a row filter.
    pub fn row_filter(&self) -> Option<(&str, &str)> {
        match (&self.column, &self.value) {
            (Some(column), Some(value)) => Some((column, value)),
            _ => None,
        }
    }
}
