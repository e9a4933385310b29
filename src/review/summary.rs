use crate::model::{Issue, Summary};

impl Summary {
    /// Severities outside the four known buckets still count towards `total`
    /// and `by_type`.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Summary {
            total: issues.len(),
            ..Summary::default()
        };

        for issue in issues {
            match issue.severity.to_lowercase().as_str() {
                "critical" => summary.critical += 1,
                "high" => summary.high += 1,
                "medium" => summary.medium += 1,
                "low" => summary.low += 1,
                _ => {}
            }

            *summary.by_type.entry(issue.issue_type.clone()).or_insert(0) += 1;
        }

        summary
    }
}
