use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

use super::transport::{AttemptError, HttpRequest, HttpTransport, Transport};
use super::{GatewayError, GenerationParams, ModelGateway, RetryDecision, RetryPolicy};
use crate::model::ChatTurn;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";
const TOP_P: f64 = 0.8;
const TOP_K: u32 = 40;
const CHAT_TEMPERATURE: f64 = 0.7;
const CHAT_MAX_OUTPUT_TOKENS: u32 = 2048;
const CONTEXT_ACKNOWLEDGEMENT: &str = "I understand the context. How can I help?";
const MODEL_NAME_MARKER: &str = "gemini";
const MODEL_NAME_PREFIX: &str = "models/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub generate: Duration,
    pub chat: Duration,
    pub list_models: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            generate: Duration::from_secs(60),
            chat: Duration::from_secs(60),
            list_models: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub retry: RetryPolicy,
    pub timeouts: Timeouts,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            timeouts: Timeouts::default(),
        }
    }
}

pub struct GeminiGateway {
    transport: Box<dyn Transport>,
    settings: GeminiSettings,
}

impl GeminiGateway {
    pub fn new(settings: GeminiSettings) -> Self {
        Self::with_transport(HttpTransport::new(), settings)
    }

    pub fn with_transport(transport: impl Transport + 'static, settings: GeminiSettings) -> Self {
        Self {
            transport: Box::new(transport),
            settings,
        }
    }

    /// Switches the model used for subsequent requests.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = model.into();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.settings.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request.header(API_KEY_HEADER, self.settings.api_key.clone())
    }

    async fn attempt_generate(&self, payload: &Value) -> Result<String, AttemptError> {
        let request = self.authorized(HttpRequest::post_json(
            self.generate_url(),
            payload.clone(),
            self.settings.timeouts.generate,
        ));

        let reply = self.transport.send(request).await?;

        if !reply.is_ok() {
            return Err(AttemptError::from_reply(reply));
        }

        extract_candidate_text(&reply.body)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    fn model_name(&self) -> &str {
        &self.settings.model
    }

    async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, GatewayError> {
        let payload = generation_payload(prompt, params);
        let policy = self.settings.retry;
        let mut attempt = 1;

        loop {
            let error = match self.attempt_generate(&payload).await {
                Ok(text) => {
                    debug!(attempt, chars = text.len(), "model reply received");
                    return Ok(text);
                }
                Err(error) => error,
            };

            match policy.decide(attempt, &error) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        attempt,
                        max_attempts = policy.max_attempts(),
                        delay_secs = delay.as_secs_f32(),
                        %error,
                        "model call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp => {
                    warn!(attempt, %error, "model call failed, giving up");
                    return Err(error.into());
                }
            }
        }
    }

    async fn chat(
        &self,
        message: &str,
        history: &[ChatTurn],
        context: Option<&str>,
    ) -> Result<String, GatewayError> {
        let request = self.authorized(HttpRequest::post_json(
            self.generate_url(),
            chat_payload(message, history, context),
            self.settings.timeouts.chat,
        ));

        let reply = self.transport.send(request).await?;

        if !reply.is_ok() {
            return Err(GatewayError::Http {
                status: reply.status,
                body: reply.body,
            });
        }

        Ok(extract_candidate_text(&reply.body)?)
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        let request = self.authorized(HttpRequest::get(
            self.models_url(),
            self.settings.timeouts.list_models,
        ));

        let reply = self.transport.send(request).await?;

        if !reply.is_ok() {
            return Err(GatewayError::Http {
                status: reply.status,
                body: reply.body,
            });
        }

        Ok(model_names(&reply.body)?)
    }
}

fn generation_payload(prompt: &str, params: GenerationParams) -> Value {
    json!({
        "contents": [{
            "parts": [{ "text": prompt }]
        }],
        "generationConfig": {
            "temperature": params.temperature,
            "maxOutputTokens": params.max_output_tokens,
            "topP": TOP_P,
            "topK": TOP_K,
        }
    })
}

fn content_turn(role: &str, text: &str) -> Value {
    json!({
        "role": role,
        "parts": [{ "text": text }]
    })
}

fn chat_payload(message: &str, history: &[ChatTurn], context: Option<&str>) -> Value {
    let mut contents = Vec::with_capacity(history.len() + 3);

    if let Some(context) = context.filter(|value| !value.is_empty()) {
        contents.push(content_turn("user", &format!("Context:\n{}", context)));
        contents.push(content_turn("model", CONTEXT_ACKNOWLEDGEMENT));
    }

    for turn in history {
        contents.push(content_turn(turn.role.as_str(), &turn.text));
    }

    contents.push(content_turn("user", message));

    json!({
        "contents": contents,
        "generationConfig": {
            "temperature": CHAT_TEMPERATURE,
            "maxOutputTokens": CHAT_MAX_OUTPUT_TOKENS,
        }
    })
}

fn extract_candidate_text(body: &str) -> Result<String, AttemptError> {
    let parsed: Value = serde_json::from_str(body).map_err(|_| AttemptError::UnexpectedPayload)?;

    parsed
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AttemptError::UnexpectedPayload)
}

fn model_names(body: &str) -> Result<Vec<String>, AttemptError> {
    let parsed: Value = serde_json::from_str(body).map_err(|_| AttemptError::UnexpectedPayload)?;

    let names = parsed
        .get("models")
        .and_then(Value::as_array)
        .map(|models| {
            models
                .iter()
                .filter_map(|model| model.get("name").and_then(Value::as_str))
                .filter(|name| name.to_lowercase().contains(MODEL_NAME_MARKER))
                .map(|name| name.replace(MODEL_NAME_PREFIX, ""))
                .collect()
        })
        .unwrap_or_default();

    Ok(names)
}
