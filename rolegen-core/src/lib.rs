//! # rolegen-core
//!
//! Compiles a tabular security matrix into per-role row-level (RLS) and
//! object-level (OLS) security descriptors for a BI semantic model.
//!
//! This crate provides:
//! - The matrix record type and role grouping
//! - The table and role permission compiler
//! - `createOrReplace` deployment descriptors and their JSON artifacts
//! - The [`MatrixLoader`] trait implemented by database and file sources
//!
//! ## Example
//!
//! ```rust
//! use rolegen_core::prelude::*;
//!
//! let matrix = SecurityMatrix::new(vec![
//!     SecurityRecord::new("RoleA", Some("T1"), Some("ColX"), None),
//!     SecurityRecord::new("RoleA", Some("T1"), Some("ColY"), Some("5")),
//! ]);
//!
//! let role = matrix.compile_role("RoleA", &CompileOptions::default()).unwrap();
//! let table = role.table("T1").unwrap();
//! assert_eq!(table.filter_expression(), Some("[ColY] == \"5\""));
//! ```

pub mod compiler;
pub mod deployment;
pub mod error;
pub mod loader;
pub mod logging;
pub mod matrix;
pub mod permission;
pub mod record;
pub mod writer;

pub use compiler::{
    CompileOptions, FilterSemantics, RowFilter, TableOrder, compile_role, compile_table,
};
pub use deployment::DeploymentDescriptor;
pub use error::{RolegenError, RolegenResult};
pub use loader::{MatrixLoader, StaticLoader};
pub use matrix::SecurityMatrix;
pub use permission::{
    Annotation, ColumnPermission, MetadataPermission, RolePermission, TableAccess, TablePermission,
};
pub use record::SecurityRecord;
pub use writer::ArtifactWriter;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::compiler::{
        CompileOptions, FilterSemantics, TableOrder, compile_role, compile_table,
    };
    pub use crate::deployment::DeploymentDescriptor;
    pub use crate::error::{RolegenError, RolegenResult};
    pub use crate::loader::MatrixLoader;
    pub use crate::matrix::SecurityMatrix;
    pub use crate::permission::{MetadataPermission, RolePermission, TableAccess, TablePermission};
    pub use crate::record::SecurityRecord;
    pub use crate::writer::ArtifactWriter;
}
