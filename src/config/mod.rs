use miette::{Context as _, IntoDiagnostic as _};
use std::path::{Path, PathBuf};

pub mod convention;
pub mod env;
pub mod model;

pub use convention::*;
pub use env::{Environment, mask_value};
pub use model::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::BuiltIn => write!(f, "built-in defaults"),
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .into_diagnostic()
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> miette::Result<()> {
        let contents = toml::to_string_pretty(self).into_diagnostic()?;
        std::fs::write(path, contents).into_diagnostic()?;
        Ok(())
    }

    pub fn apply_env(&mut self, env: &Environment) -> miette::Result<()> {
        if let Some(port) = env.var(PORT_ENV) {
            self.server.port = port.trim().parse().map_err(|_| {
                miette::miette!(
                    help = "PORT must be a number between 0 and 65535",
                    "Invalid PORT value '{}'",
                    port
                )
            })?;
        }

        Ok(())
    }

    pub fn api_key(&self, env: &Environment) -> miette::Result<String> {
        match env.var(&self.gemini.api_key_env) {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => miette::bail!(
                help = format!(
                    "Set {} in the environment or in a .env file",
                    self.gemini.api_key_env
                ),
                "Missing API key environment variable '{}'",
                self.gemini.api_key_env
            ),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("codereview").join("config.toml"))
}

/// Picks the config file: an explicit path, then `codereview.toml` in `cwd`,
/// then the per-user config directory.
pub fn resolve_source(explicit: Option<&Path>, cwd: &Path) -> miette::Result<ConfigSource> {
    if let Some(path) = explicit {
        if !path.is_file() {
            miette::bail!("Config file not found: {}", path.display());
        }
        return Ok(ConfigSource::File(path.to_path_buf()));
    }

    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(ConfigSource::File(local));
    }

    match user_config_path() {
        Some(path) if path.is_file() => Ok(ConfigSource::File(path)),
        _ => Ok(ConfigSource::BuiltIn),
    }
}

pub fn load(source: &ConfigSource, env: &Environment) -> miette::Result<ServiceConfig> {
    let mut config = match source {
        ConfigSource::File(path) => ServiceConfig::load(path)?,
        ConfigSource::BuiltIn => ServiceConfig::default(),
    };

    config.apply_env(env)?;

    Ok(config)
}
