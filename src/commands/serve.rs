use clap::Args as ClapArgs;
use std::sync::Arc;

use crate::config::{Environment, ServiceConfig};
use crate::gateway::ModelGateway;
use crate::server::{self, AppState};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Address to bind, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides `server.port` and PORT
    #[arg(long)]
    pub port: Option<u16>,

    /// Gemini model to use instead of the configured one
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(args: Args, config: &ServiceConfig, env: &Environment) -> miette::Result<()> {
    let gateway: Arc<dyn ModelGateway> =
        Arc::new(super::build_gateway(config, env, args.model.as_deref())?);

    let state = AppState::new(gateway)
        .with_snippet_context_lines(config.review.snippet_context_lines)
        .with_cache_enabled(config.review.cache_enabled);

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    server::serve(&host, port, state).await
}
