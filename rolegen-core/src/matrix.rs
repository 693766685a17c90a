//! The security matrix: all records, grouped by role.

use indexmap::IndexMap;
use tracing::info;

use crate::compiler::{self, CompileOptions};
use crate::deployment::DeploymentDescriptor;
use crate::error::{RolegenError, RolegenResult};
use crate::permission::RolePermission;
use crate::record::SecurityRecord;

/// A loaded security matrix.
#[derive(Debug, Clone, Default)]
pub struct SecurityMatrix {
    by_role: IndexMap<String, Vec<SecurityRecord>>,
    len: usize,
}

impl SecurityMatrix {
    /// Group records by role, keeping input order within each role.
    pub fn new(records: impl IntoIterator<Item = SecurityRecord>) -> Self {
        let mut by_role: IndexMap<String, Vec<SecurityRecord>> = IndexMap::new();
        let mut len = 0;
        for record in records {
            len += 1;
            by_role.entry(record.role.clone()).or_default().push(record);
        }
        Self { by_role, len }
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the matrix has no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct roles.
    pub fn role_count(&self) -> usize {
        self.by_role.len()
    }

    /// Distinct role names, in the given options' order.
    pub fn roles(&self, options: &CompileOptions) -> Vec<String> {
        options.order.arrange(self.by_role.keys().cloned().collect())
    }

    /// Records of one role, in input order.
    pub fn records_for(&self, role: &str) -> &[SecurityRecord] {
        self.by_role.get(role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the role appears in the matrix.
    pub fn contains_role(&self, role: &str) -> bool {
        self.by_role.contains_key(role)
    }

    /// Compile one role.
    pub fn compile_role(&self, role: &str, options: &CompileOptions) -> RolegenResult<RolePermission> {
        if !self.contains_role(role) {
            return Err(RolegenError::unknown_role(role));
        }
        Ok(compiler::compile_role(role, self.records_for(role), options))
    }

    /// Compile every role.
    pub fn compile(&self, options: &CompileOptions) -> Vec<RolePermission> {
        let roles: Vec<RolePermission> = self
            .roles(options)
            .iter()
            .map(|role| compiler::compile_role(role, self.records_for(role), options))
            .collect();

        info!(
            records = self.len,
            roles = roles.len(),
            "Security matrix compiled"
        );

        roles
    }

    /// Compile every role into a deployment descriptor for `dataset`.
    pub fn deployments(&self, dataset: &str, options: &CompileOptions) -> Vec<DeploymentDescriptor> {
        self.compile(options)
            .into_iter()
            .map(|role| DeploymentDescriptor::create_or_replace(dataset, role))
            .collect()
    }
}

impl FromIterator<SecurityRecord> for SecurityMatrix {
    fn from_iter<I: IntoIterator<Item = SecurityRecord>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::TableOrder;

    fn matrix() -> SecurityMatrix {
        vec![
            SecurityRecord::new("Sales EU", Some("Sales"), Some("Region"), Some("EU")),
            SecurityRecord::new("Auditors", None, None, None),
            SecurityRecord::new("Sales EU", Some("Employees"), Some("Salary"), None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_grouping() {
        let matrix = matrix();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.role_count(), 2);
        assert_eq!(matrix.records_for("Sales EU").len(), 2);
        assert!(matrix.records_for("Nobody").is_empty());
    }

    #[test]
    fn test_role_order() {
        let matrix = matrix();
        assert_eq!(
            matrix.roles(&CompileOptions::default()),
            vec!["Auditors".to_string(), "Sales EU".to_string()]
        );
        assert_eq!(
            matrix.roles(&CompileOptions::new().order(TableOrder::FirstSeen)),
            vec!["Sales EU".to_string(), "Auditors".to_string()]
        );
    }

    #[test]
    fn test_compile_unknown_role() {
        let err = matrix()
            .compile_role("Nobody", &CompileOptions::default())
            .unwrap_err();
        assert!(matches!(err, RolegenError::UnknownRole(_)));
    }

    #[test]
    fn test_deployments_one_per_role() {
        let deployments = matrix().deployments("Sales Model", &CompileOptions::default());
        assert_eq!(deployments.len(), 2);
        assert_eq!(deployments[0].role_name(), "Auditors");
        assert_eq!(deployments[1].create_or_replace.object.database, "Sales Model");
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = SecurityMatrix::default();
        assert!(matrix.is_empty());
        assert!(matrix.compile(&CompileOptions::default()).is_empty());
    }
}
