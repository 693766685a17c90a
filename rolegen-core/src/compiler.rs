//! Permission compiler.
//!
//! Turns the security matrix records of one role into a [`RolePermission`].
//! Compilation is a pure function of its inputs and never fails: malformed
//! records fall through to whichever rule their `column`/`value` pair selects.
//!
//! ## Table rules
//!
//! For one table, with the role's records filtered to that table:
//!
//! 1. No record names a column: the table is [`TableAccess::Unrestricted`]
//!    (`metadataPermission: "none"`).
//! 2. Otherwise the table is restricted (`metadataPermission: "read"`):
//!    - every `(column, no value)` record hides that column;
//!    - every `(column, value)` record adds the predicate `[column] == "value"`.
//!
//! [`TableAccess::Unrestricted`]: crate::permission::TableAccess::Unrestricted

use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::permission::{RolePermission, TablePermission};
use crate::record::SecurityRecord;

/// Default provenance tag written to the `created_by` annotation.
pub const DEFAULT_CREATED_BY: &str = "rolegen";

/// How row filter predicates are combined into a filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterSemantics {
    /// AND every predicate, including several values of the same column.
    ///
    /// Two values for one column yield an unsatisfiable filter; this is the
    /// historical output of the matrix format and stays the default.
    #[default]
    AndAll,
    /// OR the values of a column together, then AND across columns.
    OrWithinColumn,
}

impl FilterSemantics {
    /// Get the kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AndAll => "and-all",
            Self::OrWithinColumn => "or-within-column",
        }
    }
}

impl FromStr for FilterSemantics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "and-all" | "and" => Ok(Self::AndAll),
            "or-within-column" | "or" => Ok(Self::OrWithinColumn),
            other => Err(format!("unknown filter semantics: {other}")),
        }
    }
}

/// Order in which roles and tables are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableOrder {
    /// Lexicographic by name, stable across runs.
    #[default]
    Sorted,
    /// Order of first appearance in the matrix.
    FirstSeen,
}

impl TableOrder {
    /// Get the kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sorted => "sorted",
            Self::FirstSeen => "first-seen",
        }
    }

    /// Apply this order to a list of names collected in first-seen order.
    pub fn arrange(&self, mut names: Vec<String>) -> Vec<String> {
        if *self == Self::Sorted {
            names.sort();
        }
        names
    }
}

impl FromStr for TableOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "sorted" => Ok(Self::Sorted),
            "first-seen" | "matrix" => Ok(Self::FirstSeen),
            other => Err(format!("unknown table order: {other}")),
        }
    }
}

/// Options controlling compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Filter combination semantics.
    pub semantics: FilterSemantics,
    /// Emission order for roles and tables.
    pub order: TableOrder,
    /// Emit each hidden column once even if the matrix repeats it.
    pub dedupe_column_hides: bool,
    /// Value of the `created_by` annotation.
    pub created_by: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            semantics: FilterSemantics::default(),
            order: TableOrder::default(),
            dedupe_column_hides: false,
            created_by: DEFAULT_CREATED_BY.to_string(),
        }
    }
}

impl CompileOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter semantics.
    pub fn semantics(mut self, semantics: FilterSemantics) -> Self {
        self.semantics = semantics;
        self
    }

    /// Set the emission order.
    pub fn order(mut self, order: TableOrder) -> Self {
        self.order = order;
        self
    }

    /// Deduplicate hidden columns.
    pub fn dedupe_column_hides(mut self, dedupe: bool) -> Self {
        self.dedupe_column_hides = dedupe;
        self
    }

    /// Set the provenance tag.
    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }
}

/// Row filter predicates of one table, grouped by column in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    columns: IndexMap<String, Vec<String>>,
}

impl RowFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `[column] == "value"` predicate.
    pub fn push(&mut self, column: &str, value: &str) {
        self.columns
            .entry(column.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Whether no predicate has been added.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Total number of predicates.
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Render the filter expression, or `None` if there are no predicates.
    pub fn render(&self, semantics: FilterSemantics) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let clauses: Vec<String> = match semantics {
            FilterSemantics::AndAll => self
                .columns
                .iter()
                .flat_map(|(column, values)| values.iter().map(move |v| predicate(column, v)))
                .collect(),
            FilterSemantics::OrWithinColumn => self
                .columns
                .iter()
                .map(|(column, values)| match values.as_slice() {
                    [single] => predicate(column, single),
                    many => {
                        let alternatives: Vec<String> =
                            many.iter().map(|v| predicate(column, v)).collect();
                        format!("({})", alternatives.join(" || "))
                    }
                })
                .collect(),
        };

        Some(clauses.join(" && "))
    }
}

/// Build a single equality predicate.
///
/// `]` in column names and `"` in values are doubled, which is how the
/// expression language escapes them inside brackets and string literals.
fn predicate(column: &str, value: &str) -> String {
    format!(
        "[{}] == \"{}\"",
        column.replace(']', "]]"),
        value.replace('"', "\"\"")
    )
}

/// Compile the permission of one role on one table.
///
/// `records` may contain rows for other tables (and other roles); only rows
/// whose table equals `table_name` are considered.
pub fn compile_table(
    table_name: &str,
    records: &[SecurityRecord],
    options: &CompileOptions,
) -> TablePermission {
    let rows: Vec<&SecurityRecord> = records
        .iter()
        .filter(|r| r.is_for_table(table_name))
        .collect();

    if rows.iter().all(|r| r.column.is_none()) {
        debug!(table = %table_name, "Table unrestricted");
        return TablePermission::unrestricted(table_name);
    }

    let mut column_hides: Vec<String> = Vec::new();
    let mut row_filter = RowFilter::new();

    for record in &rows {
        if let Some(column) = record.hidden_column() {
            if options.dedupe_column_hides && column_hides.iter().any(|c| c == column) {
                continue;
            }
            column_hides.push(column.to_string());
        } else if let Some((column, value)) = record.row_filter() {
            row_filter.push(column, value);
        }
    }

    debug!(
        table = %table_name,
        hidden_columns = column_hides.len(),
        predicates = row_filter.len(),
        "Table restricted"
    );

    TablePermission::restricted(
        table_name,
        column_hides,
        row_filter.render(options.semantics),
    )
}

/// Distinct table names of the given records, arranged by `order`.
pub fn table_names(records: &[SecurityRecord], order: TableOrder) -> Vec<String> {
    let names: IndexSet<&str> = records.iter().filter_map(|r| r.table.as_deref()).collect();
    order.arrange(names.into_iter().map(String::from).collect())
}

/// Compile the permission descriptor of one role.
///
/// Tables mentioned for the role without any column are kept as explicit
/// `"none"` entries. Tables never mentioned are simply absent, which the
/// model reads as full access.
pub fn compile_role(
    role_name: &str,
    records: &[SecurityRecord],
    options: &CompileOptions,
) -> RolePermission {
    let role_records: Vec<SecurityRecord> = records
        .iter()
        .filter(|r| r.role == role_name)
        .cloned()
        .collect();

    let tables: Vec<TablePermission> = table_names(&role_records, options.order)
        .iter()
        .map(|table| compile_table(table, &role_records, options))
        .collect();

    debug!(role = %role_name, tables = tables.len(), "Role compiled");

    RolePermission::new(role_name, tables, options.created_by.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::MetadataPermission;
    use pretty_assertions::assert_eq;

    fn rec(role: &str, table: &str, column: Option<&str>, value: Option<&str>) -> SecurityRecord {
        SecurityRecord::new(role, Some(table), column, value)
    }

    #[test]
    fn test_mixed_ols_and_rls() {
        let records = vec![
            rec("RoleA", "T1", Some("ColX"), None),
            rec("RoleA", "T1", Some("ColY"), Some("5")),
        ];
        let table = compile_table("T1", &records, &CompileOptions::default());

        assert_eq!(table.metadata_permission(), MetadataPermission::Read);
        assert_eq!(table.column_hides(), ["ColX".to_string()]);
        assert_eq!(table.filter_expression(), Some("[ColY] == \"5\""));
    }

    #[test]
    fn test_table_without_columns_is_unrestricted() {
        let records = vec![
            rec("RoleB", "T2", None, None),
            rec("RoleB", "T2", None, Some("ignored")),
        ];
        let table = compile_table("T2", &records, &CompileOptions::default());
        assert_eq!(table, TablePermission::unrestricted("T2"));
    }

    #[test]
    fn test_compile_table_filters_other_tables() {
        let records = vec![
            rec("RoleA", "Other", Some("Secret"), None),
            rec("RoleA", "T1", None, None),
        ];
        let table = compile_table("T1", &records, &CompileOptions::default());
        assert!(!table.is_restricted());
    }

    #[test]
    fn test_repeated_hides_are_kept_by_default() {
        let records = vec![
            rec("R", "T", Some("Salary"), None),
            rec("R", "T", Some("Salary"), None),
        ];
        let table = compile_table("T", &records, &CompileOptions::default());
        assert_eq!(table.column_hides().len(), 2);

        let options = CompileOptions::new().dedupe_column_hides(true);
        let table = compile_table("T", &records, &options);
        assert_eq!(table.column_hides(), ["Salary".to_string()]);
    }

    #[test]
    fn test_and_all_joins_in_encounter_order() {
        let records = vec![
            rec("R", "T", Some("Region"), Some("EU")),
            rec("R", "T", Some("Channel"), Some("Retail")),
        ];
        let table = compile_table("T", &records, &CompileOptions::default());
        assert_eq!(
            table.filter_expression(),
            Some("[Region] == \"EU\" && [Channel] == \"Retail\"")
        );
        assert!(table.column_hides().is_empty());
    }

    #[test]
    fn test_and_all_keeps_same_column_values() {
        let records = vec![
            rec("R", "T", Some("Region"), Some("EU")),
            rec("R", "T", Some("Region"), Some("US")),
        ];
        let table = compile_table("T", &records, &CompileOptions::default());
        assert_eq!(
            table.filter_expression(),
            Some("[Region] == \"EU\" && [Region] == \"US\"")
        );
    }

    #[test]
    fn test_or_within_column() {
        let records = vec![
            rec("R", "T", Some("c"), Some("a")),
            rec("R", "T", Some("d"), Some("x")),
            rec("R", "T", Some("c"), Some("b")),
        ];
        let options = CompileOptions::new().semantics(FilterSemantics::OrWithinColumn);
        let table = compile_table("T", &records, &options);
        assert_eq!(
            table.filter_expression(),
            Some("([c] == \"a\" || [c] == \"b\") && [d] == \"x\"")
        );
    }

    #[test]
    fn test_predicate_escaping() {
        assert_eq!(predicate("Name", "O\"Brien"), "[Name] == \"O\"\"Brien\"");
        assert_eq!(predicate("a]b", "1"), "[a]]b] == \"1\"");
    }

    #[test]
    fn test_plain_inputs_render_literally() {
        let cases = [
            ("Region", "EMEA"),
            ("Cost Center", "4200"),
            ("Ville", "Zürich"),
            ("[Key", "O'Brien"),
            ("Code", ""),
            ("Path", "a\\b && c"),
        ];
        for (column, value) in cases {
            assert_eq!(predicate(column, value), format!("[{}] == \"{}\"", column, value));
        }

        let records = vec![
            rec("R", "T", Some("Cost Center"), Some("4200")),
            rec("R", "T", Some("Ville"), Some("Zürich")),
        ];
        let table = compile_table("T", &records, &CompileOptions::default());
        assert_eq!(
            table.filter_expression(),
            Some("[Cost Center] == \"4200\" && [Ville] == \"Zürich\"")
        );
    }

    #[test]
    fn test_empty_row_filter_renders_nothing() {
        let filter = RowFilter::new();
        assert_eq!(filter.render(FilterSemantics::AndAll), None);
        assert_eq!(filter.render(FilterSemantics::OrWithinColumn), None);
    }

    #[test]
    fn test_compile_role_keeps_unrestricted_tables() {
        let records = vec![
            rec("RoleA", "Sales", Some("Region"), Some("EU")),
            rec("RoleA", "Dates", None, None),
            rec("RoleB", "Sales", Some("Margin"), None),
            SecurityRecord::new("RoleA", None, None, None),
        ];
        let role = compile_role("RoleA", &records, &CompileOptions::default());

        assert_eq!(role.name, "RoleA");
        assert_eq!(role.model_permission, MetadataPermission::Read);
        let names: Vec<&str> = role.table_permissions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Dates", "Sales"]);
        assert!(!role.table("Dates").unwrap().is_restricted());
        assert_eq!(
            role.table("Sales").unwrap().filter_expression(),
            Some("[Region] == \"EU\"")
        );
    }

    #[test]
    fn test_compile_role_first_seen_order() {
        let records = vec![
            rec("R", "Zeta", None, None),
            rec("R", "Alpha", None, None),
            rec("R", "Zeta", Some("c"), None),
        ];
        let options = CompileOptions::new().order(TableOrder::FirstSeen);
        let names: Vec<String> = compile_role("R", &records, &options)
            .table_permissions
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Zeta".to_string(), "Alpha".to_string()]);
    }

    #[test]
    fn test_compile_role_without_tables() {
        let records = vec![SecurityRecord::new("Viewer", None, None, None)];
        let role = compile_role("Viewer", &records, &CompileOptions::new().created_by("ci"));
        assert!(role.table_permissions.is_empty());
        assert_eq!(role.annotations[0].value, "ci");
    }

    #[test]
    fn test_options_from_str() {
        assert_eq!(
            "or-within-column".parse::<FilterSemantics>(),
            Ok(FilterSemantics::OrWithinColumn)
        );
        assert_eq!("AND_ALL".parse::<FilterSemantics>(), Ok(FilterSemantics::AndAll));
        assert_eq!("first-seen".parse::<TableOrder>(), Ok(TableOrder::FirstSeen));
        assert!("random".parse::<TableOrder>().is_err());
    }
}
