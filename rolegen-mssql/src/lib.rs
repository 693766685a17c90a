//! # rolegen-mssql
//!
//! Reads the security matrix from Microsoft SQL Server.
//!
//! This crate provides:
//! - Connection configuration from ADO.NET/ODBC strings, URLs, or server/database parts
//! - A single-connection `bb8` pool over `tiberius`
//! - Decoding of matrix rows into [`SecurityRecord`]s
//! - [`MssqlMatrixLoader`], the [`MatrixLoader`] implementation
//!
//! ## Example
//!
//! ```rust,ignore
//! use rolegen_core::prelude::*;
//! use rolegen_mssql::{MssqlConfig, MssqlMatrixLoader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MssqlConfig::from_connection_string(
//!         "Server=sql01;Database=Security;User Id=reader;Password=secret;",
//!     )?;
//!     let loader = MssqlMatrixLoader::new(config, "dbo.SecurityMatrix")?;
//!     let matrix = loader.load_matrix().await?;
//!
//!     for role in matrix.compile(&CompileOptions::default()) {
//!         println!("{}: {} tables", role.name, role.table_permissions.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`SecurityRecord`]: rolegen_core::SecurityRecord
//! [`MatrixLoader`]: rolegen_core::MatrixLoader

pub mod config;
pub mod connection;
pub mod error;
pub mod pool;
pub mod row;
pub mod source;

pub use config::{Authentication, EncryptionMode, MssqlConfig};
pub use connection::MssqlConnection;
pub use error::{MssqlError, MssqlResult};
pub use pool::MssqlPool;
pub use row::{FromMssqlRow, MssqlRow, record_from_fields};
pub use source::{MatrixTable, MssqlMatrixLoader};
