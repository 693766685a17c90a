//! CLI command implementations.

pub mod generate;
pub mod roles;
pub mod show;
pub mod version;

use rolegen_core::SecurityMatrix;

use crate::cli::SourceArgs;
use crate::config::Config;
use crate::error::CliResult;
use crate::source;

/// Load the configuration and the security matrix for a command.
pub(crate) async fn load_matrix(args: &SourceArgs) -> CliResult<(Config, SecurityMatrix)> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(args.config.as_deref(), &cwd)?;
    let loader = source::resolve_loader(args, &config)?;
    let matrix = loader.load_matrix().await?;
    Ok((config, matrix))
}
