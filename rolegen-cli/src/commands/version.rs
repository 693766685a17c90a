//! `rolegen version` command - Display version information.

use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command
pub async fn run() -> CliResult<()> {
    output::header("rolegen");

    kv("Version", VERSION);
    kv("Binary", "rolegen");

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);

    let auth = if cfg!(all(windows, feature = "winauth")) {
        "sql login, integrated"
    } else {
        "sql login"
    };
    kv("SQL Server auth", auth);

    output::newline();
    output::section("Components");
    kv("rolegen-core", VERSION);
    kv("rolegen-mssql", VERSION);

    Ok(())
}
