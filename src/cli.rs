//! CLI parsing for codereview

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "codereview")]
#[command(about = "LLM-backed code review service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of codereview.toml discovery
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the review HTTP service
    Serve(commands::serve::Args),

    /// Review local source files and print the findings
    Analyze(commands::analyze::Args),

    /// List the models available to the configured API key
    Models(commands::models::Args),

    /// Show the effective configuration
    Config(commands::config::Args),
}
