//! Role and table permission descriptors.
//!
//! These types serialize to the `role` object of a tabular model
//! `createOrReplace` command:
//!
//! ```json
//! {
//!     "name": "RoleA",
//!     "modelPermission": "read",
//!     "tablePermissions": [
//!         {
//!             "name": "T1",
//!             "metadataPermission": "read",
//!             "columnPermissions": [{ "name": "ColX", "metadataPermission": "none" }],
//!             "filterExpression": "[ColY] == \"5\""
//!         }
//!     ],
//!     "annotations": [{ "name": "created_by", "value": "rolegen" }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Annotation name used to tag generated roles.
pub const CREATED_BY_ANNOTATION: &str = "created_by";

/// Metadata permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataPermission {
    /// Object is readable.
    #[serde(rename = "read")]
    Read,
    /// No permission on the object.
    #[serde(rename = "none")]
    Hidden,
}

impl MetadataPermission {
    /// Get the wire name of this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Hidden => "none",
        }
    }
}

impl std::fmt::Display for MetadataPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access a role has to a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAccess {
    /// The table is listed in the matrix but nothing in it is restricted.
    Unrestricted,
    /// Columns are hidden and/or rows are filtered.
    Restricted {
        /// Columns hidden from the role, in matrix order.
        column_hides: Vec<String>,
        /// Rendered row filter, if any row filter applies.
        filter_expression: Option<String>,
    },
}

impl TableAccess {
    /// The metadata permission this access serializes to.
    pub fn metadata_permission(&self) -> MetadataPermission {
        match self {
            Self::Unrestricted => MetadataPermission::Hidden,
            Self::Restricted { .. } => MetadataPermission::Read,
        }
    }
}

/// Permission on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnPermission {
    /// Column name.
    pub name: String,
    /// Metadata permission for the column.
    pub metadata_permission: MetadataPermission,
}

impl ColumnPermission {
    /// A permission that hides the column.
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata_permission: MetadataPermission::Hidden,
        }
    }
}

/// Permission of one role on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TablePermissionRepr", from = "TablePermissionRepr")]
pub struct TablePermission {
    /// Table name.
    pub name: String,
    /// What the role may see of the table.
    pub access: TableAccess,
}

impl TablePermission {
    /// A table the role sees in full.
    pub fn unrestricted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: TableAccess::Unrestricted,
        }
    }

    /// A table with hidden columns and/or a row filter.
    pub fn restricted(
        name: impl Into<String>,
        column_hides: Vec<String>,
        filter_expression: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            access: TableAccess::Restricted {
                column_hides,
                filter_expression,
            },
        }
    }

    /// The serialized metadata permission.
    pub fn metadata_permission(&self) -> MetadataPermission {
        self.access.metadata_permission()
    }

    /// Columns hidden from the role.
    pub fn column_hides(&self) -> &[String] {
        match &self.access {
            TableAccess::Restricted { column_hides, .. } => column_hides,
            TableAccess::Unrestricted => &[],
        }
    }

    /// The row filter expression, if any.
    pub fn filter_expression(&self) -> Option<&str> {
        match &self.access {
            TableAccess::Restricted {
                filter_expression, ..
            } => filter_expression.as_deref(),
            TableAccess::Unrestricted => None,
        }
    }

    /// Whether any restriction applies.
    pub fn is_restricted(&self) -> bool {
        matches!(self.access, TableAccess::Restricted { .. })
    }
}

/// Flat wire form of [`TablePermission`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TablePermissionRepr {
    name: String,
    metadata_permission: MetadataPermission,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    column_permissions: Vec<ColumnPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter_expression: Option<String>,
}

impl From<TablePermission> for TablePermissionRepr {
    fn from(table: TablePermission) -> Self {
        let metadata_permission = table.metadata_permission();
        match table.access {
            TableAccess::Unrestricted => Self {
                name: table.name,
                metadata_permission,
                column_permissions: Vec::new(),
                filter_expression: None,
            },
            TableAccess::Restricted {
                column_hides,
                filter_expression,
            } => Self {
                name: table.name,
                metadata_permission,
                column_permissions: column_hides
                    .into_iter()
                    .map(ColumnPermission::hidden)
                    .collect(),
                filter_expression,
            },
        }
    }
}

impl From<TablePermissionRepr> for TablePermission {
    fn from(repr: TablePermissionRepr) -> Self {
        match repr.metadata_permission {
            MetadataPermission::Hidden => Self::unrestricted(repr.name),
            MetadataPermission::Read => Self::restricted(
                repr.name,
                repr.column_permissions
                    .into_iter()
                    .filter(|c| c.metadata_permission == MetadataPermission::Hidden)
                    .map(|c| c.name)
                    .collect(),
                repr.filter_expression,
            ),
        }
    }
}

/// A name/value annotation attached to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name.
    pub name: String,
    /// Annotation value.
    pub value: String,
}

impl Annotation {
    /// The provenance annotation for generated roles.
    pub fn created_by(value: impl Into<String>) -> Self {
        Self {
            name: CREATED_BY_ANNOTATION.to_string(),
            value: value.into(),
        }
    }
}

/// Permissions of one role on the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
    /// Role name.
    pub name: String,
    /// Model-level permission, always `read`.
    pub model_permission: MetadataPermission,
    /// Per-table permissions. Omitted when empty: tables absent here are fully visible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_permissions: Vec<TablePermission>,
    /// Provenance annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl RolePermission {
    /// Create a read-only role with the given table permissions.
    pub fn new(
        name: impl Into<String>,
        table_permissions: Vec<TablePermission>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model_permission: MetadataPermission::Read,
            table_permissions,
            annotations: vec![Annotation::created_by(created_by)],
        }
    }

    /// Look up the permission for a table.
    pub fn table(&self, name: &str) -> Option<&TablePermission> {
        self.table_permissions.iter().find(|t| t.name == name)
    }

    /// Number of tables with an actual restriction.
    pub fn restricted_table_count(&self) -> usize {
        self.table_permissions
            .iter()
            .filter(|t| t.is_restricted())
            .count()
    }
}
