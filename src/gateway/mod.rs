//! Client for the text-generation provider.
//!
//! [`ModelGateway`] is the seam the rest of the service talks to. The
//! production implementation is [`GeminiGateway`], which sends requests
//! through a [`Transport`] and retries according to a [`RetryPolicy`].

mod gemini;
mod retry;
mod transport;

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::model::ChatTurn;

pub use gemini::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiGateway, GeminiSettings, Timeouts,
};
pub use retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, RetryDecision, RetryPolicy};
pub use transport::{AttemptError, HttpReply, HttpRequest, HttpTransport, Transport};

#[derive(Debug, Error, Diagnostic)]
pub enum GatewayError {
    #[error("model provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("request to model provider timed out")]
    #[diagnostic(help("The provider may be overloaded, try again later"))]
    Timeout,

    #[error("network error while contacting model provider: {0}")]
    Network(String),

    #[error("model provider returned an unexpected response payload")]
    UnexpectedPayload,

    #[error("max retries reached")]
    #[diagnostic(help("The provider kept rate limiting requests"))]
    RetriesExhausted,
}

impl From<AttemptError> for GatewayError {
    fn from(error: AttemptError) -> Self {
        match error {
            AttemptError::RateLimited => GatewayError::RetriesExhausted,
            AttemptError::Status { status, body } => GatewayError::Http { status, body },
            AttemptError::Timeout => GatewayError::Timeout,
            AttemptError::Network(detail) => GatewayError::Network(detail),
            AttemptError::UnexpectedPayload => GatewayError::UnexpectedPayload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    /// Temperature is clamped to `[0, 1]` and the token budget to at least 1.
    pub fn new(temperature: f64, max_output_tokens: u32) -> Self {
        Self {
            temperature: temperature.clamp(0.0, 1.0),
            max_output_tokens: max_output_tokens.max(1),
        }
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str, params: GenerationParams)
    -> Result<String, GatewayError>;

    async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
        context: Option<&str>,
    ) -> Result<String, GatewayError>;

    async fn list_models(&self) -> Result<Vec<String>, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_params_are_clamped() {
        let params = GenerationParams::new(1.7, 0);

        assert_eq!(params.temperature, 1.0);
        assert_eq!(params.max_output_tokens, 1);
    }

    #[test]
    fn exhausted_rate_limit_maps_to_max_retries() {
        let error = GatewayError::from(AttemptError::RateLimited);

        assert_eq!(error.to_string(), "max retries reached");
    }
}
