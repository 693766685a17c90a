//! rolegen CLI - Generate RLS/OLS role deployment scripts.

use clap::Parser;

use rolegen_cli::cli::{Cli, Command};
use rolegen_cli::commands;
use rolegen_cli::error::CliResult;
use rolegen_cli::output;
use rolegen_core::logging;

#[tokio::main]
async fn main() {
    // Values in .env never override the real environment
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    if cli.verbose {
        logging::init_with_level("debug");
    } else {
        logging::init();
    }

    match cli.command {
        Command::Generate(args) => commands::generate::run(args).await,
        Command::Show(args) => commands::show::run(args).await,
        Command::Roles(args) => commands::roles::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
