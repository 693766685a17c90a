//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use rolegen_core::{FilterSemantics, TableOrder};
use std::path::PathBuf;

/// rolegen - RLS/OLS role scripts from a security matrix
#[derive(Parser, Debug)]
#[command(name = "rolegen")]
#[command(version)]
#[command(
    about = "rolegen - Generate RLS/OLS role deployment scripts from a security matrix",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one deployment script per role
    Generate(GenerateArgs),

    /// Print the deployment script of a single role
    Show(ShowArgs),

    /// List the roles in the security matrix
    Roles(RolesArgs),

    /// Display version information
    Version,
}

// =============================================================================
// Shared arguments
// =============================================================================

/// Where the security matrix comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to configuration file (defaults to ./rolegen.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Read the matrix from a JSON file instead of SQL Server
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// SQL Server connection string (ADO.NET/ODBC or mssql:// URL)
    #[arg(long, env = "ROLEGEN_CONNECTION_STRING", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// SQL Server host (host, host\instance or host,port)
    #[arg(long, env = "SERVER_NAME")]
    pub server: Option<String>,

    /// Database holding the security matrix
    #[arg(long, env = "DATABASE_NAME")]
    pub database: Option<String>,

    /// SQL Server login (integrated security when omitted)
    #[arg(long, env = "DATABASE_USERNAME")]
    pub username: Option<String>,

    /// SQL Server password
    #[arg(long, env = "DATABASE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// ODBC driver name (accepted for compatibility, not used)
    #[arg(long, env = "DRIVER", hide = true)]
    pub driver: Option<String>,

    /// Security matrix table, e.g. dbo.SecurityRoles
    #[arg(short, long, env = "TABLE_SECURITY_ROLES_NAME")]
    pub table: Option<String>,

    /// Trust the server certificate
    #[arg(long)]
    pub trust_cert: bool,
}

/// How roles are compiled
#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Filter semantics: and-all (default) or or-within-column
    #[arg(long)]
    pub semantics: Option<FilterSemantics>,

    /// Table and role order: sorted (default) or first-seen
    #[arg(long)]
    pub order: Option<TableOrder>,

    /// Emit each hidden column once
    #[arg(long)]
    pub dedupe_columns: bool,

    /// Value of the created_by annotation
    #[arg(long)]
    pub created_by: Option<String>,
}

// =============================================================================
// Generate Command
// =============================================================================

/// Arguments for the `generate` command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub compile: CompileArgs,

    /// Target dataset name
    #[arg(short, long, env = "POWERBI_DATASET_NAME")]
    pub dataset: Option<String>,

    /// Output directory for role scripts
    #[arg(short, long, env = "ROLEGEN_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Compile and list files without writing them
    #[arg(long)]
    pub dry_run: bool,
}

// =============================================================================
// Show Command
// =============================================================================

/// Arguments for the `show` command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Role to print
    pub role: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub compile: CompileArgs,

    /// Target dataset name; without it only the role object is printed
    #[arg(short, long, env = "POWERBI_DATASET_NAME")]
    pub dataset: Option<String>,
}

// =============================================================================
// Roles Command
// =============================================================================

/// Arguments for the `roles` command
#[derive(Args, Debug)]
pub struct RolesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub compile: CompileArgs,
}
