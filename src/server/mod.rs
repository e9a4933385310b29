//! HTTP surface of the review service.
//!
//! Routes are thin: they translate JSON bodies into calls on the gateway and
//! the analyzer, and keep the analysis cache and chat sessions in [`Store`]s
//! owned by [`AppState`].

use axum::{
    Router,
    routing::{delete, get, post},
};
use miette::{Context as _, IntoDiagnostic as _};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::gateway::ModelGateway;
use crate::model::{AnalysisResult, ChatTurn};
use crate::review::CodeAnalyzer;
use crate::store::{MemoryStore, Store};

mod error;
pub mod handlers;

pub use error::ServerError;
pub use handlers::{
    AnalysisRequest, ChatRequest, ChatResponse, HealthResponse, MessageResponse, ModelsResponse,
};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ModelGateway>,
    pub analyzer: Arc<CodeAnalyzer>,
    pub cache: Arc<dyn Store<String, AnalysisResult>>,
    pub sessions: Arc<dyn Store<String, Vec<ChatTurn>>>,
    pub cache_enabled: bool,
}

impl AppState {
    /// State backed by in-memory stores with caching enabled.
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            analyzer: Arc::new(CodeAnalyzer::new(gateway.clone())),
            gateway,
            cache: Arc::new(MemoryStore::new()),
            sessions: Arc::new(MemoryStore::new()),
            cache_enabled: true,
        }
    }

    pub fn with_snippet_context_lines(mut self, lines: usize) -> Self {
        self.analyzer =
            Arc::new(CodeAnalyzer::new(self.gateway.clone()).with_snippet_context_lines(lines));
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/chat", post(handlers::chat))
        .route("/api/models", get(handlers::list_models))
        .route("/api/cache", delete(handlers::clear_cache))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(host: &str, port: u16, state: AppState) -> miette::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .into_diagnostic()
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    let address = listener.local_addr().into_diagnostic()?;
    info!(%address, model = state.gateway.model_name(), "review service listening");

    axum::serve(listener, router(state))
        .await
        .into_diagnostic()
        .context("Server terminated unexpectedly")
}
