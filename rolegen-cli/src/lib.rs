//! rolegen CLI - Generate RLS/OLS role deployment scripts from a security matrix.
//!
//! The binary reads the matrix from SQL Server (or a JSON export), compiles
//! one role permission per security role, and writes `Role_<name>.json`
//! create-or-replace scripts for the target dataset.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod source;
