use clap::Parser;
use miette::{IntoDiagnostic as _, Result};
use tracing_subscriber::EnvFilter;

use codereview::cli::{Cli, Commands};
use codereview::commands;
use codereview::config::{self, Environment};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };

    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let current_dir = std::env::current_dir().into_diagnostic()?;
    let env = Environment::load(&current_dir)?;
    let source = config::resolve_source(cli.config.as_deref(), &current_dir)?;
    let config = config::load(&source, &env)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, &config, &env).await,
        Commands::Analyze(args) => commands::analyze::run(args, &config, &env).await,
        Commands::Models(args) => commands::models::run(args, &config, &env).await,
        Commands::Config(args) => commands::config::run(args, &config, &source, &env),
    }
}
