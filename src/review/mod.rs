//! Issue extraction: prompt construction, the two model calls of an analysis,
//! reply parsing and summary counting.

pub mod parser;
pub mod prompt;
mod summary;

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::gateway::{GatewayError, GenerationParams, ModelGateway};
use crate::model::{AnalysisResult, SourceFile, Summary};

const ANALYSIS_TEMPERATURE: f64 = 0.4;
const ANALYSIS_MAX_TOKENS: u32 = 4096;
const ARCHITECTURE_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Error, Diagnostic)]
pub enum ReviewError {
    #[error("No files provided")]
    #[diagnostic(help("Pass at least one source file to analyze"))]
    NoFiles,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Gateway(#[from] GatewayError),
}

pub struct CodeAnalyzer {
    gateway: Arc<dyn ModelGateway>,
    snippet_context_lines: usize,
}

impl CodeAnalyzer {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            snippet_context_lines: parser::DEFAULT_SNIPPET_CONTEXT_LINES,
        }
    }

    pub fn with_snippet_context_lines(mut self, lines: usize) -> Self {
        self.snippet_context_lines = lines;
        self
    }

    /// Runs the issue-finding and architecture prompts in sequence. Any
    /// gateway failure fails the whole analysis.
    pub async fn analyze(
        &self,
        files: &[SourceFile],
        language: &str,
        focus_areas: Option<&[String]>,
    ) -> Result<AnalysisResult, ReviewError> {
        if files.is_empty() {
            return Err(ReviewError::NoFiles);
        }

        let focus_areas = match focus_areas {
            Some(areas) => areas.to_vec(),
            None => prompt::default_focus_areas(),
        };

        let context = prompt::build_context(files, language);

        info!(files = files.len(), language, "requesting issue analysis");

        let reply = self
            .gateway
            .generate(
                &prompt::analysis_prompt(&context, language, &focus_areas),
                GenerationParams::new(ANALYSIS_TEMPERATURE, ANALYSIS_MAX_TOKENS),
            )
            .await?;

        let issues = parser::parse_issues(&reply, files, self.snippet_context_lines);

        info!(issues = issues.len(), "requesting architecture review");

        let architecture_analysis = self
            .gateway
            .generate(
                &prompt::architecture_prompt(&context, language),
                GenerationParams::new(ANALYSIS_TEMPERATURE, ARCHITECTURE_MAX_TOKENS),
            )
            .await?;

        let summary = Summary::from_issues(&issues);

        Ok(AnalysisResult {
            status: "completed".to_string(),
            summary,
            issues,
            architecture_analysis,
            files_analyzed: files.len(),
            total_lines: files
                .iter()
                .map(|file| file.content.matches('\n').count())
                .sum(),
        })
    }
}
