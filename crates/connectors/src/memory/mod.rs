pub mod predicate;

use crate::{
    error::StoreError,
    memory::predicate::LogPredicate,
    store::{MessageStore, PredicateBuilder},
};
use async_trait::async_trait;
use model::{
    filter::condition::Condition,
    pagination::{
        cursor::Cursor,
        page::{FetchResult, PageSize},
    },
    records::message::Message,
};
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::debug;

/// Append-only message log held in memory. Scan order is append order.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: RwLock<Vec<Message>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        MemoryLog {
            entries: RwLock::new(messages),
        }
    }

    /// Appends a message and returns its offset in the log.
    pub async fn append(&self, msg: Message) -> usize {
        let mut entries = self.entries.write().await;
        entries.push(msg);
        entries.len() - 1
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl PredicateBuilder for MemoryLog {
    type Predicate = LogPredicate;

    fn condition(&self, condition: Condition) -> LogPredicate {
        LogPredicate::Condition(condition)
    }

    fn and(&self, children: Vec<LogPredicate>) -> LogPredicate {
        LogPredicate::And(children)
    }

    fn or(&self, children: Vec<LogPredicate>) -> LogPredicate {
        LogPredicate::Or(children)
    }
}

#[async_trait]
impl MessageStore for MemoryLog {
    type Record = Message;

    async fn query(&self, predicate: &LogPredicate) -> Result<Vec<Message>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|msg| predicate.eval(msg))
            .cloned()
            .collect())
    }

    async fn fetch(
        &self,
        predicate: &LogPredicate,
        page_size: PageSize,
        cursor: Cursor,
    ) -> Result<FetchResult<Message>, StoreError> {
        let start = Instant::now();
        let entries = self.entries.read().await;

        let mut pos = cursor.offset();
        if pos > entries.len() {
            return Err(StoreError::InvalidCursor(format!(
                "Cursor offset {pos} is past the end of the log ({})",
                entries.len()
            )));
        }

        let mut rows = Vec::new();
        while rows.len() < page_size.get() && pos < entries.len() {
            let msg = &entries[pos];
            pos += 1;
            if predicate.eval(msg) {
                rows.push(msg.clone());
            }
        }

        let reached_end = pos >= entries.len();
        let next_cursor = if reached_end {
            None
        } else {
            Some(Cursor::Offset { offset: pos })
        };
        let row_count = rows.len();
        let took_ms = start.elapsed().as_millis();

        debug!(?cursor, row_count, reached_end, "fetched page from memory log");

        Ok(FetchResult {
            rows,
            next_cursor,
            reached_end,
            row_count,
            took_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(seq: u64, author: &str) -> Message {
        serde_json::from_value(json!({
            "key": format!("%{seq}.sha256"),
            "value": {
                "author": author,
                "sequence": seq,
                "timestamp": seq as f64 * 10.0,
                "content": { "type": "post", "text": format!("post {seq}") }
            },
            "timestamp": seq as f64 * 10.0
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_append_returns_offsets() {
        let log = MemoryLog::new();
        assert!(log.is_empty().await);
        assert_eq!(log.append(post(1, "@a")).await, 0);
        assert_eq!(log.append(post(2, "@a")).await, 1);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_fetch_walks_the_log_in_pages() {
        let log = MemoryLog::from_messages((1..=5).map(|i| post(i, "@a")).collect());
        let all = log.and(vec![log.condition(Condition::Type("post".into()))]);
        let size = PageSize::from_usize(2).unwrap();

        let first = log.fetch(&all, size, Cursor::None).await.unwrap();
        assert_eq!(first.row_count, 2);
        assert_eq!(first.next_cursor, Some(Cursor::Offset { offset: 2 }));

        let second = log
            .fetch(&all, size, first.next_cursor.unwrap())
            .await
            .unwrap();
        assert_eq!(second.rows[0].value.sequence, 3);

        let third = log
            .fetch(&all, size, second.next_cursor.unwrap())
            .await
            .unwrap();
        assert_eq!(third.row_count, 1);
        assert!(third.is_last());
    }

    #[tokio::test]
    async fn test_fetch_skips_non_matching_entries() {
        let log = MemoryLog::from_messages(vec![post(1, "@a"), post(2, "@b"), post(3, "@a")]);
        let by_a = log.condition(Condition::Author("@a".into()));

        let page = log
            .fetch(&by_a, PageSize::from_usize(10).unwrap(), Cursor::None)
            .await
            .unwrap();
        let seqs: Vec<u64> = page.rows.iter().map(|m| m.value.sequence).collect();
        assert_eq!(seqs, vec![1, 3]);
        assert!(page.reached_end);
    }

    #[tokio::test]
    async fn test_fetch_rejects_cursor_past_end() {
        let log = MemoryLog::from_messages(vec![post(1, "@a")]);
        let pred = log.condition(Condition::IsPublic);

        let err = log
            .fetch(
                &pred,
                PageSize::from_usize(1).unwrap(),
                Cursor::Offset { offset: 5 },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCursor(_)));
    }
}
