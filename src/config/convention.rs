use std::time::Duration;

use crate::gateway::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, GeminiSettings, RetryPolicy, Timeouts,
};
use crate::review::parser::DEFAULT_SNIPPET_CONTEXT_LINES;

use super::model::*;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const PORT_ENV: &str = "PORT";
pub const LOCAL_CONFIG_FILE: &str = "codereview.toml";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        let timeouts = Timeouts::default();

        Self {
            base_url: crate::gateway::DEFAULT_GEMINI_BASE_URL.to_string(),
            model: crate::gateway::DEFAULT_GEMINI_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            max_retries: DEFAULT_MAX_ATTEMPTS,
            retry_delay_secs: DEFAULT_BASE_DELAY.as_secs(),
            generate_timeout_secs: timeouts.generate.as_secs(),
            chat_timeout_secs: timeouts.chat.as_secs(),
            list_timeout_secs: timeouts.list_models.as_secs(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            snippet_context_lines: DEFAULT_SNIPPET_CONTEXT_LINES,
            cache_enabled: true,
        }
    }
}

impl GeminiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            generate: Duration::from_secs(self.generate_timeout_secs),
            chat: Duration::from_secs(self.chat_timeout_secs),
            list_models: Duration::from_secs(self.list_timeout_secs),
        }
    }

    pub fn settings(&self, api_key: String) -> GeminiSettings {
        GeminiSettings {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key,
            retry: self.retry_policy(),
            timeouts: self.timeouts(),
        }
    }
}
