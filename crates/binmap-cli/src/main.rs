//! binmap command line entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use binmap_cli::{Cli, CliConfig, Commands, bootstrap, exit_code_for, handlers, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("binmap: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = bootstrap(CliConfig::from_env(cli.out_dir)?);

    match cli.command {
        Commands::Rehash { refresh, dirs } => handlers::rehash::execute(&ctx, refresh, &dirs).await,
        Commands::Profiles => handlers::profiles::execute(&ctx).await,
        Commands::Which { executable, dir } => handlers::which::execute(&ctx, &executable, &dir),
        Commands::Paths => handlers::paths::execute(&ctx),
    }
}
