//! Turns a free-text model reply into [`Issue`] records.
//!
//! The reply is expected to contain blocks of the form
//!
//! ```text
//! ---ISSUE---
//! Type: security
//! Severity: high
//! File: src/auth.rs
//! Line: 42
//! Title: ...
//! Description: ...
//! Suggestion: ...
//! Reasoning: ...
//! ---END---
//! ```
//!
//! Nothing here rejects malformed input. Truncated blocks are skipped, blocks
//! lacking a type or severity are dropped, and a reply without a single usable
//! block yields one informational issue carrying the start of the reply.

use crate::model::{Issue, SourceFile};

pub const ISSUE_START: &str = "---ISSUE---";
pub const ISSUE_END: &str = "---END---";
pub const DEFAULT_SNIPPET_CONTEXT_LINES: usize = 3;

const FALLBACK_DESCRIPTION_CHARS: usize = 500;

/// Fields of one block, as written by the model. Keys are matched
/// case-insensitively; when a key repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFields {
    pub issue_type: Option<String>,
    pub severity: Option<String>,
    pub file: Option<String>,
    pub line: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub suggestion: Option<String>,
    pub reasoning: Option<String>,
}

impl IssueFields {
    pub fn from_block(block: &str) -> Self {
        let mut fields = Self::default();

        for line in block.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            let value = Some(value.trim().to_string());

            match key.trim().to_lowercase().as_str() {
                "type" => fields.issue_type = value,
                "severity" => fields.severity = value,
                "file" => fields.file = value,
                "line" => fields.line = value,
                "title" => fields.title = value,
                "description" => fields.description = value,
                "suggestion" => fields.suggestion = value,
                "reasoning" => fields.reasoning = value,
                _ => {}
            }
        }

        fields
    }

    pub fn is_complete(&self) -> bool {
        self.issue_type.is_some() && self.severity.is_some()
    }

    pub fn line_number(&self) -> usize {
        self.line.as_deref().map(parse_line_number).unwrap_or(0)
    }

    pub fn into_issue(self, id: String, code_snippet: String) -> Issue {
        let line = self.line_number();

        Issue {
            id,
            issue_type: self.issue_type.unwrap_or_else(|| "quality".to_string()),
            severity: self.severity.unwrap_or_else(|| "medium".to_string()),
            file: self.file.unwrap_or_else(|| "unknown".to_string()),
            line,
            title: self
                .title
                .unwrap_or_else(|| "Code issue detected".to_string()),
            description: self.description.unwrap_or_default(),
            suggestion: self.suggestion.unwrap_or_default(),
            reasoning: self.reasoning.unwrap_or_default(),
            code_snippet,
        }
    }
}

/// Only all-digit values count as line numbers; anything else is 0.
pub fn parse_line_number(value: &str) -> usize {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return 0;
    }

    value.parse().unwrap_or(0)
}

/// Lines around a 1-indexed `line` of the file whose path matches exactly.
pub fn extract_snippet(
    files: &[SourceFile],
    file_path: &str,
    line: usize,
    context_lines: usize,
) -> String {
    let Some(file) = files.iter().find(|file| file.path == file_path) else {
        return String::new();
    };

    let lines = file.content.split('\n').collect::<Vec<&str>>();
    let start = line.saturating_sub(context_lines.saturating_add(1));
    let end = lines.len().min(line.saturating_add(context_lines));

    if start >= end {
        return String::new();
    }

    lines[start..end].join("\n")
}

pub fn parse_issues(reply: &str, files: &[SourceFile], context_lines: usize) -> Vec<Issue> {
    let mut issues = Vec::new();

    for segment in reply.split(ISSUE_START).skip(1) {
        let Some((block, _)) = segment.split_once(ISSUE_END) else {
            continue;
        };

        let fields = IssueFields::from_block(block.trim());

        if !fields.is_complete() {
            continue;
        }

        let snippet = extract_snippet(
            files,
            fields.file.as_deref().unwrap_or_default(),
            fields.line_number(),
            context_lines,
        );

        let id = format!("issue_{}", issues.len());
        issues.push(fields.into_issue(id, snippet));
    }

    if issues.is_empty() {
        issues.push(fallback_issue(reply));
    }

    issues
}

fn fallback_issue(reply: &str) -> Issue {
    Issue {
        id: "issue_0".to_string(),
        issue_type: "info".to_string(),
        severity: "low".to_string(),
        file: "general".to_string(),
        line: 0,
        title: "Analysis completed".to_string(),
        description: reply.chars().take(FALLBACK_DESCRIPTION_CHARS).collect(),
        suggestion: "Review the full analysis for details".to_string(),
        reasoning: "Automated analysis".to_string(),
        code_snippet: String::new(),
    }
}
