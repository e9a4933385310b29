use crate::config::{Environment, ServiceConfig};
use crate::gateway::GeminiGateway;

pub mod analyze;
pub mod config;
pub mod models;
pub mod serve;

pub(crate) fn build_gateway(
    config: &ServiceConfig,
    env: &Environment,
    model: Option<&str>,
) -> miette::Result<GeminiGateway> {
    let api_key = config.api_key(env)?;
    let gateway = GeminiGateway::new(config.gemini.settings(api_key));

    Ok(match model {
        Some(model) => gateway.with_model(model),
        None => gateway,
    })
}
