use async_trait::async_trait;
use connectors::{
    error::StoreError,
    memory::{MemoryLog, predicate::LogPredicate},
    store::{MessageStore, PredicateBuilder},
};
use model::{
    filter::{condition::Condition, error::CompileError, node::FilterInput},
    pagination::{
        cursor::Cursor,
        page::{FetchResult, PageSize},
    },
    records::message::Message,
};
use planner::{OperatorRegistry, PredicateCompiler};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

pub fn keys(msgs: &[Message]) -> Vec<String> {
    msgs.iter().map(|m| m.key.clone()).collect()
}

pub fn parse_filter(source: &str) -> FilterInput {
    serde_json::from_str(source).expect("filter json")
}

pub fn compile(store: &MemoryLog, source: &str) -> Result<LogPredicate, CompileError> {
    let registry = OperatorRegistry::new();
    PredicateCompiler::new(&registry, store).compile_input(&parse_filter(source))
}

pub async fn run(store: &MemoryLog, source: &str) -> Vec<Message> {
    let predicate = compile(store, source).expect("filter compiles");
    store.query(&predicate).await.expect("query")
}

pub fn page(size: usize) -> PageSize {
    PageSize::from_usize(size).expect("non-zero page size")
}

/// Wraps a log, counts page fetches and fails the fetch with the given
/// (zero-based) index.
pub struct FlakyStore {
    inner: Arc<MemoryLog>,
    fail_at: Option<usize>,
    fetches: AtomicUsize,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryLog>, fail_at: Option<usize>) -> Self {
        Self {
            inner,
            fail_at,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl PredicateBuilder for FlakyStore {
    type Predicate = LogPredicate;

    fn condition(&self, condition: Condition) -> LogPredicate {
        self.inner.condition(condition)
    }

    fn and(&self, children: Vec<LogPredicate>) -> LogPredicate {
        self.inner.and(children)
    }

    fn or(&self, children: Vec<LogPredicate>) -> LogPredicate {
        self.inner.or(children)
    }
}

#[async_trait]
impl MessageStore for FlakyStore {
    type Record = Message;

    async fn query(&self, predicate: &LogPredicate) -> Result<Vec<Message>, StoreError> {
        self.inner.query(predicate).await
    }

    async fn fetch(
        &self,
        predicate: &LogPredicate,
        page_size: PageSize,
        cursor: Cursor,
    ) -> Result<FetchResult<Message>, StoreError> {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(n) {
            return Err(StoreError::Fetch {
                cursor,
                message: "connection reset".into(),
            });
        }
        self.inner.fetch(predicate, page_size, cursor).await
    }
}
