use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub generate_timeout_secs: u64,
    pub chat_timeout_secs: u64,
    pub list_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewConfig {
    pub snippet_context_lines: usize,
    pub cache_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
    pub review: ReviewConfig,
}
