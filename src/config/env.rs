use miette::{Context as _, IntoDiagnostic as _};
use std::collections::BTreeMap;
use std::path::Path;

/// Snapshot of the variables the service reads.
///
/// Values from a `.env` file are loaded first; real process variables take
/// precedence over them.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn load(dir: &Path) -> miette::Result<Self> {
        let mut vars = BTreeMap::new();
        let dotenv_path = dir.join(".env");

        if dotenv_path.is_file() {
            let content = std::fs::read_to_string(&dotenv_path)
                .into_diagnostic()
                .with_context(|| format!("Failed to read env file {}", dotenv_path.display()))?;

            let parsed = dotenv_parser::parse_dotenv(&content).map_err(|e| {
                miette::miette!("Failed to parse env file {}: {}", dotenv_path.display(), e)
            })?;

            vars.extend(parsed);
        }

        vars.extend(std::env::vars());

        Ok(Self { vars })
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

pub fn mask_value(value: &str) -> String {
    let chars = value.chars().collect::<Vec<char>>();

    if chars.len() <= 8 {
        "***".to_string()
    } else {
        let first = chars[..4].iter().collect::<String>();
        let last = chars[chars.len() - 4..].iter().collect::<String>();
        format!("{}...{}", first, last)
    }
}
