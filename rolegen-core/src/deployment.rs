//! `createOrReplace` deployment descriptors.

use serde::{Deserialize, Serialize};

use crate::permission::RolePermission;

/// A deployment script that creates or replaces one role on a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    /// The `createOrReplace` command.
    pub create_or_replace: CreateOrReplace,
}

/// Body of a `createOrReplace` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrReplace {
    /// Path of the object being replaced.
    pub object: RoleObject,
    /// Definition of the role.
    pub role: RolePermission,
}

/// Object path of a role inside a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleObject {
    /// Target dataset (database) name.
    pub database: String,
    /// Role name.
    pub role: String,
}

impl DeploymentDescriptor {
    /// Wrap a role into a `createOrReplace` command for `dataset`.
    pub fn create_or_replace(dataset: impl Into<String>, role: RolePermission) -> Self {
        Self {
            create_or_replace: CreateOrReplace {
                object: RoleObject {
                    database: dataset.into(),
                    role: role.name.clone(),
                },
                role,
            },
        }
    }

    /// Name of the role being deployed.
    pub fn role_name(&self) -> &str {
        &self.create_or_replace.role.name
    }

    /// Target dataset.
    pub fn dataset(&self) -> &str {
        &self.create_or_replace.object.database
    }

    /// The role definition.
    pub fn role(&self) -> &RolePermission {
        &self.create_or_replace.role
    }
}
