use clap::Args as ClapArgs;
use miette::IntoDiagnostic as _;

use crate::config::{Environment, ServiceConfig};
use crate::gateway::ModelGateway as _;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Print the list as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Gemini model to report as active instead of the configured one
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(args: Args, config: &ServiceConfig, env: &Environment) -> miette::Result<()> {
    let gateway = super::build_gateway(config, env, args.model.as_deref())?;

    let models = gateway.list_models().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&models).into_diagnostic()?);
        return Ok(());
    }

    for model in &models {
        if model == gateway.model_name() {
            println!("{} (active)", model);
        } else {
            println!("{}", model);
        }
    }

    Ok(())
}
