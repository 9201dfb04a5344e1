use crate::error::CliError;
use engine_core::config::QueryConfig;
use std::collections::HashMap;
use std::path::Path;

/// Process environment, optionally overlaid with a `.env` file.
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load variables from a .env file; file values win over the process env.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;
        self.vars.extend(parse_env_content(&content)?);
        Ok(())
    }

    pub fn query_config(&self) -> Result<QueryConfig, CliError> {
        Ok(QueryConfig::from_vars(&self.vars)?)
    }
}

fn parse_env_content(content: &str) -> Result<Vec<(String, String)>, CliError> {
    let mut pairs = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid env file: malformed line {} (expected KEY=VALUE)",
                idx + 1
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::Config(format!(
                "Invalid env file: empty key at line {}",
                idx + 1
            )));
        }
        pairs.push((key.to_string(), unquote(value.trim()).to_string()));
    }
    Ok(pairs)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::config::{ENV_PAGE_SIZE, ENV_SELF_ID};
    use std::io::Write;

    #[test]
    fn test_parse_env_content() {
        let pairs = parse_env_content(
            r#"
# feed settings
FEEDQ_SELF_ID="@me.ed25519"
FEEDQ_PAGE_SIZE=25
        "#,
        )
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("FEEDQ_SELF_ID".to_string(), "@me.ed25519".to_string()),
                ("FEEDQ_PAGE_SIZE".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_env_format() {
        assert!(parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(parse_env_content("=value").is_err());
    }

    #[test]
    fn test_file_overrides_process_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{ENV_PAGE_SIZE}=7").unwrap();
        writeln!(file, "{ENV_SELF_ID}='@file'").unwrap();

        let mut env = EnvManager::default();
        env.vars.insert(ENV_PAGE_SIZE.to_string(), "50".to_string());
        env.load_from_file(file.path()).unwrap();

        let config = env.query_config().unwrap();
        assert_eq!(config.default_page_size.get(), 7);
        assert_eq!(config.self_id.as_deref(), Some("@file"));
    }
}
