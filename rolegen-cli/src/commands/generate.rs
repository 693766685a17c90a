//! `rolegen generate` command - Write one deployment script per role.

use rolegen_core::ArtifactWriter;
use rolegen_core::writer::artifact_file_name;

use crate::cli::GenerateArgs;
use crate::commands::load_matrix;
use crate::error::{CliError, CliResult};
use crate::output::{self, success, warn};

/// Run the generate command
pub async fn run(args: GenerateArgs) -> CliResult<()> {
    output::header("Generate Roles");

    output::step(1, 3, "Loading security matrix...");
    let (config, matrix) = load_matrix(&args.source).await?;

    let dataset = config.dataset(args.dataset.as_deref()).ok_or_else(|| {
        CliError::Config(
            "target dataset is required (--dataset or POWERBI_DATASET_NAME)".to_string(),
        )
    })?;
    let options = config.compile_options(&args.compile);
    let output_dir = config.output_dir(args.output.as_deref());

    output::kv("Records", &matrix.len().to_string());
    output::kv("Roles", &matrix.role_count().to_string());
    output::kv("Dataset", &dataset);
    output::kv("Semantics", options.semantics.as_str());
    output::newline();

    output::step(2, 3, "Compiling role permissions...");
    let deployments = matrix.deployments(&dataset, &options);

    if args.dry_run {
        output::step(3, 3, "Dry run, skipping write");
        output::newline();
        output::section(&format!("Would write to {}", output_dir.display()));
        for deployment in &deployments {
            output::list_item(&artifact_file_name(deployment.role_name()));
        }
        return Ok(());
    }

    output::step(3, 3, "Writing role scripts...");
    let writer = ArtifactWriter::create(&output_dir)?;

    if deployments.is_empty() {
        output::newline();
        warn("Security matrix is empty, no roles to write.");
        return Ok(());
    }

    let paths = writer.write_all(&deployments)?;

    output::newline();
    for (deployment, path) in deployments.iter().zip(&paths) {
        let role = deployment.role();
        output::list_item(&format!(
            "{} ({} tables, {} restricted)",
            path.display(),
            role.table_permissions.len(),
            role.restricted_table_count()
        ));
    }

    output::newline();
    success(&format!(
        "Wrote {} role scripts to {}",
        paths.len(),
        output_dir.display()
    ));

    Ok(())
}
