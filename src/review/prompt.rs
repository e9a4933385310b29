use crate::model::SourceFile;

const ANALYSIS_PROMPT_TEMPLATE: &str = include_str!("../../templates/analysis_prompt.md");
const ARCHITECTURE_PROMPT_TEMPLATE: &str = include_str!("../../templates/architecture_prompt.md");

pub const DEFAULT_FOCUS_AREAS: &[&str] = &["security", "performance", "quality", "architecture"];

pub fn default_focus_areas() -> Vec<String> {
    DEFAULT_FOCUS_AREAS.iter().map(|area| area.to_string()).collect()
}

/// Concatenates every file into one fenced block per file.
pub fn build_context(files: &[SourceFile], language: &str) -> String {
    let mut parts = vec![format!("Language: {}\n\n", language)];

    for file in files {
        parts.push(format!("File: {}", file.path));
        parts.push(format!("```{}", language));
        parts.push(file.content.clone());
        parts.push("```\n".to_string());
    }

    parts.join("\n")
}

// The context goes in last so placeholders inside user code are left alone.
pub fn analysis_prompt(context: &str, language: &str, focus_areas: &[String]) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{{ language }}", language)
        .replace("{{ focus_areas }}", &focus_areas.join(", "))
        .replace("{{ context }}", context)
}

pub fn architecture_prompt(context: &str, language: &str) -> String {
    ARCHITECTURE_PROMPT_TEMPLATE
        .replace("{{ language }}", language)
        .replace("{{ context }}", context)
}
