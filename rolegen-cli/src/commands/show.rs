//! `rolegen show` command - Print one role's deployment script.

use rolegen_core::DeploymentDescriptor;
use rolegen_core::writer::to_pretty_json;

use crate::cli::ShowArgs;
use crate::commands::load_matrix;
use crate::error::CliResult;
use crate::output;

/// Run the show command
pub async fn run(args: ShowArgs) -> CliResult<()> {
    let (config, matrix) = load_matrix(&args.source).await?;
    let options = config.compile_options(&args.compile);
    let role = matrix.compile_role(&args.role, &options)?;

    let json = match config.dataset(args.dataset.as_deref()) {
        Some(dataset) => to_pretty_json(&DeploymentDescriptor::create_or_replace(dataset, role))?,
        None => to_pretty_json(&role)?,
    };

    output::raw(&json);
    Ok(())
}
