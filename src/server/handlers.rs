use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AppState, ServerError};
use crate::model::{AnalysisResult, ChatTurn, SourceFile};
use crate::review::ReviewError;
use crate::store::analysis_cache_key;

pub const SERVICE_NAME: &str = "codereview";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub files: Vec<SourceFile>,
    pub language: String,
    #[serde(default)]
    pub focus_areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub review_id: String,
    pub message: String,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub review_id: String,
    pub response: String,
    pub conversation_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub version: String,
    pub gemini_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        gemini_model: state.gateway.model_name().to_string(),
    })
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ServerError> {
    let Json(request) = payload?;

    if request.files.is_empty() {
        return Err(ServerError::analysis(ReviewError::NoFiles));
    }

    let key = analysis_cache_key(&request.language, &request.files);

    if state.cache_enabled {
        if let Some(cached) = state.cache.get(&key) {
            debug!(key = %key, "analysis served from cache");
            return Ok(Json(cached));
        }
    }

    let result = state
        .analyzer
        .analyze(
            &request.files,
            &request.language,
            request.focus_areas.as_deref(),
        )
        .await
        .map_err(ServerError::analysis)?;

    if state.cache_enabled {
        state.cache.put(key, result.clone());
    }

    Ok(Json(result))
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServerError> {
    let Json(request) = payload?;

    let mut history = state.sessions.get(&request.review_id).unwrap_or_default();

    let response = state
        .gateway
        .chat(&request.message, &history, request.context.as_deref())
        .await
        .map_err(ServerError::chat)?;

    history.push(ChatTurn::user(request.message));
    history.push(ChatTurn::model(response.clone()));
    state.sessions.put(request.review_id.clone(), history);

    Ok(Json(ChatResponse {
        conversation_id: request.review_id.clone(),
        review_id: request.review_id,
        response,
    }))
}

pub async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ServerError> {
    let models = state
        .gateway
        .list_models()
        .await
        .map_err(|error| ServerError::internal(error.to_string()))?;

    Ok(Json(ModelsResponse { models }))
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear();
    state.sessions.clear();

    info!("analysis cache and chat sessions cleared");

    Json(MessageResponse {
        message: "Cache cleared".to_string(),
    })
}
