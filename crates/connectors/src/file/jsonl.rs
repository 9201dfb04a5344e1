use crate::{error::StoreError, memory::MemoryLog};
use model::records::message::Message;
use std::path::Path;
use tracing::{info, warn};

/// Loads a message log stored as one JSON message per line.
pub async fn load_log(path: impl AsRef<Path>) -> Result<MemoryLog, StoreError> {
    let path = path.as_ref();
    let source = tokio::fs::read_to_string(path).await?;
    let messages = parse_log(&source)?;
    info!("Loaded {} messages from {}", messages.len(), path.display());
    Ok(MemoryLog::from_messages(messages))
}

pub fn parse_log(source: &str) -> Result<Vec<Message>, StoreError> {
    let mut messages = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            warn!("Skipping blank line {line_num} in message log");
            continue;
        }

        let msg = serde_json::from_str(line).map_err(|source| StoreError::Decode {
            line: line_num,
            source,
        })?;
        messages.push(msg);
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LOG: &str = r#"{"key":"%1","value":{"author":"@a","sequence":1,"timestamp":10,"content":{"type":"post"}},"timestamp":11}

{"key":"%2","value":{"author":"@a","sequence":2,"timestamp":20,"content":"Ym94.box"},"timestamp":21}
"#;

    #[test]
    fn test_parse_skips_blank_lines() {
        let messages = parse_log(LOG).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].key, "%2");
        assert!(messages[1].is_private());
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = parse_log("{\"key\":\"%1\"}\n").unwrap_err();
        assert!(matches!(err, StoreError::Decode { line: 1, .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOG.as_bytes()).unwrap();

        let log = load_log(file.path()).await.unwrap();
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let err = load_log("/definitely/not/here.jsonl").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
