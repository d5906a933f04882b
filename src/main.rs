// ABOUTME: Entry point for the d2ship CLI application.
// ABOUTME: Parses arguments, loads configuration and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::BatchAction;
use d2ship::config::Config;
use d2ship::error::Result;
use d2ship::output::{Output, OutputMode};
use d2ship::usecases::App;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));

    if let Err(e) = run(cli, output.clone()).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load(path).and_then(d2ship::config::apply_env_overrides),
        None => Config::load_or_default(&env::current_dir()?),
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let config = load_config(&cli)?;
    let app = App::from_config(config.clone());

    let batch = |action, ids| commands::batch(&app, action, ids, output.clone());

    match cli.command {
        Commands::List => commands::list(&app, &output).await,
        Commands::Projects => commands::projects(&app, &output).await,
        Commands::Images { project } => commands::images(&app, &project, &output).await,
        Commands::Create(args) => commands::create(&app, args, &config, output.clone()).await,
        Commands::Start { ids } => batch(BatchAction::Start, ids).await,
        Commands::Stop { ids } => batch(BatchAction::Stop, ids).await,
        Commands::Commit { ids } => batch(BatchAction::Commit, ids).await,
        Commands::Push { ids } => batch(BatchAction::Push, ids).await,
        Commands::Pull { ids } => batch(BatchAction::Pull, ids).await,
        Commands::Rm { ids } => batch(BatchAction::Rm, ids).await,
        Commands::Logs { id, limit } => commands::logs(&app, id, limit, &output).await,
        Commands::Db { id } => commands::database(&app, id, &output).await,
    }
}
