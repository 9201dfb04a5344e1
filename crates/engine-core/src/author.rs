use crate::{
    error::QueryError,
    executor::{ExecutionMode, QueryExecutor, RecordStream},
};
use connectors::store::{MessageStore, PredicateBuilder};
use model::{filter::condition::Condition, pagination::page::PageSize};

pub const POST_TYPE: &str = "post";

/// Shortcut for "posts written by a given feed", built without going through
/// the filter compiler.
pub struct AuthorQuery<S: MessageStore> {
    executor: QueryExecutor<S>,
    page_size: PageSize,
}

impl<S: MessageStore + 'static> AuthorQuery<S> {
    pub fn new(executor: QueryExecutor<S>, page_size: PageSize) -> Self {
        Self {
            executor,
            page_size,
        }
    }

    fn predicate(&self, id: &str) -> S::Predicate {
        let store = self.executor.store();
        store.and(vec![
            store.condition(Condition::Type(POST_TYPE.to_string())),
            store.condition(Condition::Author(id.to_string())),
        ])
    }

    pub async fn posts_by_author(&self, id: &str) -> Result<Vec<S::Record>, QueryError> {
        self.executor
            .execute(&self.predicate(id), ExecutionMode::Resolve)
            .await
    }

    /// A fresh lazy feed of the author's posts. The caller owns it and stops
    /// the feed by dropping it.
    pub fn posts_by_author_stream(&self, id: &str) -> RecordStream<S::Record> {
        self.executor.records(self.predicate(id), self.page_size)
    }
}
