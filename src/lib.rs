//! # rolegen
//!
//! Generates row-level (RLS) and object-level (OLS) security role scripts for
//! a BI semantic model from a tabular security matrix.
//!
//! rolegen provides:
//! - A security matrix model and per-role permission compiler
//! - `createOrReplace` deployment descriptors, one JSON file per role
//! - A SQL Server matrix loader (feature `mssql`)
//! - The `rolegen` command-line tool (crate `rolegen-cli`)
//!
//! ## Quick Start
//!
//! ```rust
//! use rolegen::prelude::*;
//!
//! let matrix = SecurityMatrix::new(vec![
//!     SecurityRecord::new("Sales", Some("Orders"), Some("Region"), Some("EMEA")),
//!     SecurityRecord::new("Sales", Some("Customers"), Some("Email"), None),
//! ]);
//!
//! let deployments = matrix.deployments("Finance", &CompileOptions::default());
//! assert_eq!(deployments.len(), 1);
//! assert_eq!(deployments[0].role_name(), "Sales");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Matrix model, compiler and artifact writer.
pub mod model {
    pub use rolegen_core::*;
}

/// SQL Server matrix loader.
#[cfg(feature = "mssql")]
#[cfg_attr(docsrs, doc(cfg(feature = "mssql")))]
pub mod mssql {
    pub use rolegen_mssql::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rolegen_core::prelude::*;
    pub use rolegen_core::{ArtifactWriter, CompileOptions};

    #[cfg(feature = "mssql")]
    pub use rolegen_mssql::{MssqlConfig, MssqlMatrixLoader};
}

// Re-export key types at the crate root
pub use rolegen_core::{
    ArtifactWriter, CompileOptions, DeploymentDescriptor, RolePermission, RolegenError,
    RolegenResult, SecurityMatrix, SecurityRecord,
};
