use crate::error::QueryError;
use connectors::{error::StoreError, store::MessageStore};
use futures::{
    StreamExt, TryStreamExt,
    stream::{self, BoxStream},
};
use model::pagination::{cursor::Cursor, page::PageSize};
use std::sync::Arc;
use tracing::debug;

/// Lazy sequence of pages. Each page is fetched only when polled.
pub type PageStream<R> = BoxStream<'static, Result<Vec<R>, StoreError>>;

/// Lazy sequence of individual records, paged underneath.
pub type RecordStream<R> = BoxStream<'static, Result<R, StoreError>>;

/// How a compiled predicate is run against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One store call returning the whole result set.
    Resolve,
    /// Cursor-driven page fetches, drained into one result set.
    Paginate(PageSize),
}

impl From<Option<PageSize>> for ExecutionMode {
    fn from(page_size: Option<PageSize>) -> Self {
        match page_size {
            Some(size) => ExecutionMode::Paginate(size),
            None => ExecutionMode::Resolve,
        }
    }
}

struct DrainState<S: MessageStore> {
    store: Arc<S>,
    predicate: S::Predicate,
    cursor: Option<Cursor>,
    page: usize,
}

pub struct QueryExecutor<S: MessageStore> {
    store: Arc<S>,
}

impl<S: MessageStore> Clone for QueryExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: MessageStore + 'static> QueryExecutor<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs the predicate in the given mode.
    ///
    /// Paginated execution is all-or-nothing: a failing page discards every
    /// page fetched before it.
    pub async fn execute(
        &self,
        predicate: &S::Predicate,
        mode: ExecutionMode,
    ) -> Result<Vec<S::Record>, QueryError> {
        match mode {
            ExecutionMode::Resolve => Ok(self.store.query(predicate).await?),
            ExecutionMode::Paginate(page_size) => {
                let pages = self.pages(predicate.clone(), page_size);
                Ok(drain(pages).await?)
            }
        }
    }

    /// Opens a lazy page sequence over the predicate.
    ///
    /// At most one fetch is outstanding, and nothing is fetched ahead of
    /// consumption. Dropping the stream stops further fetches.
    pub fn pages(&self, predicate: S::Predicate, page_size: PageSize) -> PageStream<S::Record> {
        let state = DrainState {
            store: Arc::clone(&self.store),
            predicate,
            cursor: Some(Cursor::None),
            page: 0,
        };

        stream::try_unfold(state, move |mut state| async move {
            let Some(cursor) = state.cursor else {
                return Ok::<_, StoreError>(None);
            };

            let result = state
                .store
                .fetch(&state.predicate, page_size, cursor)
                .await?;
            debug!(
                page = state.page,
                rows = result.row_count,
                took_ms = result.took_ms as u64,
                "fetched page"
            );

            state.cursor = if result.is_last() {
                None
            } else {
                result.next_cursor
            };
            state.page += 1;
            Ok(Some((result.rows, state)))
        })
        .boxed()
    }

    /// Same as [`pages`](Self::pages), flattened to one record per item.
    pub fn records(&self, predicate: S::Predicate, page_size: PageSize) -> RecordStream<S::Record> {
        self.pages(predicate, page_size)
            .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<_, StoreError>)))
            .try_flatten()
            .boxed()
    }
}

/// Consumes a page sequence to completion. Stops at the first error.
pub async fn drain<R>(mut pages: PageStream<R>) -> Result<Vec<R>, StoreError> {
    let mut rows = Vec::new();
    while let Some(page) = pages.try_next().await? {
        rows.extend(page);
    }
    Ok(rows)
}
