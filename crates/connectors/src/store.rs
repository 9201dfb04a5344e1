use crate::error::StoreError;
use async_trait::async_trait;
use model::{
    filter::condition::Condition,
    pagination::{cursor::Cursor, page::FetchResult, page::PageSize},
};
use serde::Serialize;
use std::fmt::Debug;

/// Builds a store's opaque predicates from validated leaves and combinators.
///
/// Callers never look inside `Predicate`; they only thread values through
/// `and`/`or`.
pub trait PredicateBuilder: Send + Sync {
    type Predicate: Clone + Debug + Send + Sync + 'static;

    fn condition(&self, condition: Condition) -> Self::Predicate;

    fn and(&self, children: Vec<Self::Predicate>) -> Self::Predicate;

    fn or(&self, children: Vec<Self::Predicate>) -> Self::Predicate;
}

/// Query side of a message store: resolve everything at once, or fetch one
/// page at a time from a cursor.
#[async_trait]
pub trait MessageStore: PredicateBuilder {
    type Record: Serialize + Clone + Send + Sync + 'static;

    async fn query(&self, predicate: &Self::Predicate) -> Result<Vec<Self::Record>, StoreError>;

    /// Returns up to `page_size` matching records starting at `cursor`, in the
    /// same order `query` would return them.
    async fn fetch(
        &self,
        predicate: &Self::Predicate,
        page_size: PageSize,
        cursor: Cursor,
    ) -> Result<FetchResult<Self::Record>, StoreError>;
}
