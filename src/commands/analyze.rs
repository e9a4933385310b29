use clap::Args as ClapArgs;
use miette::{Context as _, IntoDiagnostic as _};
use std::path::PathBuf;
use std::sync::Arc;
use termimad::MadSkin;
use tracing::info;

use crate::config::{Environment, ServiceConfig};
use crate::model::{AnalysisResult, SourceFile};
use crate::review::CodeAnalyzer;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Source files to review
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Language of the submitted files
    #[arg(long, short)]
    pub language: String,

    /// Focus areas, comma separated (defaults to the built-in list)
    #[arg(long, value_delimiter = ',')]
    pub focus: Vec<String>,

    /// Emit the raw analysis result as JSON
    #[arg(long)]
    pub json: bool,

    /// Gemini model to use instead of the configured one
    #[arg(long)]
    pub model: Option<String>,
}

pub async fn run(args: Args, config: &ServiceConfig, env: &Environment) -> miette::Result<()> {
    let files = read_files(&args.paths)?;

    let gateway = super::build_gateway(config, env, args.model.as_deref())?;
    let analyzer = CodeAnalyzer::new(Arc::new(gateway))
        .with_snippet_context_lines(config.review.snippet_context_lines);

    info!(files = files.len(), language = %args.language, "running analysis");

    let focus = (!args.focus.is_empty()).then_some(args.focus.as_slice());
    let result = analyzer.analyze(&files, &args.language, focus).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        MadSkin::default().print_text(&render_markdown(&result));
    }

    Ok(())
}

fn read_files(paths: &[PathBuf]) -> miette::Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path)
                .into_diagnostic()
                .with_context(|| format!("Failed to read {}", path.display()))?;

            Ok(SourceFile::new(path.display().to_string(), content))
        })
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

fn render_markdown(result: &AnalysisResult) -> String {
    let summary = &result.summary;
    let mut out = String::new();

    out.push_str("# Code review\n\n");
    out.push_str(&format!(
        "**{}** files, **{}** lines, **{}** issues (critical {}, high {}, medium {}, low {})\n\n",
        result.files_analyzed,
        result.total_lines,
        summary.total,
        summary.critical,
        summary.high,
        summary.medium,
        summary.low,
    ));

    out.push_str("## Issues\n\n");

    for issue in &result.issues {
        out.push_str(&format!(
            "### [{}] {}\n\n`{}:{}` *{}*\n\n{}\n\n",
            issue.severity.to_uppercase(),
            issue.title,
            issue.file,
            issue.line,
            issue.issue_type,
            issue.description,
        ));

        if !issue.code_snippet.is_empty() {
            out.push_str(&format!("```\n{}\n```\n\n", issue.code_snippet));
        }

        if !issue.suggestion.is_empty() {
            out.push_str(&format!("**Suggestion:** {}\n\n", issue.suggestion));
        }
    }

    out.push_str("## Architecture\n\n");
    out.push_str(&result.architecture_analysis);
    out.push('\n');

    out
}
