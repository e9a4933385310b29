use clap::Args as ClapArgs;
use miette::IntoDiagnostic as _;

use crate::config::{ConfigSource, Environment, ServiceConfig, mask_value};

#[derive(ClapArgs, Debug)]
pub struct Args {}

pub fn run(
    _args: Args,
    config: &ServiceConfig,
    source: &ConfigSource,
    env: &Environment,
) -> miette::Result<()> {
    print!("{}", render(config, source, env)?);
    Ok(())
}

fn render(
    config: &ServiceConfig,
    source: &ConfigSource,
    env: &Environment,
) -> miette::Result<String> {
    let api_key = match config.api_key(env) {
        Ok(key) => mask_value(&key),
        Err(_) => "not set".to_string(),
    };

    let body = toml::to_string_pretty(config).into_diagnostic()?;

    Ok(format!(
        "# source: {}\n# {}: {}\n\n{}",
        source, config.gemini.api_key_env, api_key, body
    ))
}
