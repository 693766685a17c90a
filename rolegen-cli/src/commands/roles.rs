//! `rolegen roles` command - List roles in the security matrix.

use crate::cli::RolesArgs;
use crate::commands::load_matrix;
use crate::error::CliResult;
use crate::output::{self, info};

/// Run the roles command
pub async fn run(args: RolesArgs) -> CliResult<()> {
    output::header("Security Roles");

    let (config, matrix) = load_matrix(&args.source).await?;
    let options = config.compile_options(&args.compile);
    let roles = matrix.compile(&options);

    if roles.is_empty() {
        info("No roles found.");
        return Ok(());
    }

    for role in &roles {
        output::list_item(&format!(
            "{} ({} tables, {} restricted)",
            role.name,
            role.table_permissions.len(),
            role.restricted_table_count()
        ));
    }

    output::newline();
    output::kv("Roles", &roles.len().to_string());
    output::kv("Records", &matrix.len().to_string());

    Ok(())
}
