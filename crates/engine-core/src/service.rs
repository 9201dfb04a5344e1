use crate::{
    author::{AuthorQuery, POST_TYPE},
    config::QueryConfig,
    error::QueryError,
    executor::{ExecutionMode, QueryExecutor, RecordStream},
};
use connectors::store::{MessageStore, PredicateBuilder};
use model::filter::{condition::Condition, node::FilterInput};
use planner::{PredicateCompiler, registry::OperatorRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const PLUGIN_NAME: &str = env!("CARGO_PKG_NAME");
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The process hosting the query service.
pub trait Host {
    type Store: MessageStore;

    /// Identity of the local feed; used when a caller omits one. Empty when
    /// the host has none, in which case `QueryConfig::self_id` applies.
    fn id(&self) -> &str;

    /// The host's queryable message store, if it has one.
    fn db(&self) -> Option<Arc<Self::Store>>;
}

/// A general filter query.
///
/// ```json
/// { "where": { "and": [ { "operator": "type", "value": "post" } ] }, "paginate": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "where")]
    pub filter: FilterInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginate: Option<usize>,
}

impl Query {
    pub fn from_json(source: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(source)?)
    }
}

pub struct QueryService<S: MessageStore> {
    self_id: String,
    registry: OperatorRegistry,
    executor: QueryExecutor<S>,
    authors: AuthorQuery<S>,
    config: QueryConfig,
}

impl<S: MessageStore + 'static> QueryService<S> {
    /// Binds the service to a host. Fails when the host has no message store.
    pub fn init<H>(host: &H, config: QueryConfig) -> Result<Self, QueryError>
    where
        H: Host<Store = S>,
    {
        info!("[{PLUGIN_NAME} v{PLUGIN_VERSION}] init");

        let store = host.db().ok_or(QueryError::UnsupportedHost {
            plugin: PLUGIN_NAME,
            version: PLUGIN_VERSION,
        })?;
        let config = config.validate()?;
        let self_id = match host.id() {
            "" => config.self_id.clone().unwrap_or_default(),
            id => id.to_string(),
        };
        let executor = QueryExecutor::new(store);
        let authors = AuthorQuery::new(executor.clone(), config.default_page_size);

        Ok(Self {
            self_id,
            registry: OperatorRegistry::new(),
            executor,
            authors,
            config,
        })
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    /// Compiles a wire-form filter against this service's store.
    pub fn compile(&self, filter: &FilterInput) -> Result<S::Predicate, QueryError> {
        let compiler = PredicateCompiler::new(&self.registry, self.executor.store());
        Ok(compiler.compile_input(filter)?)
    }

    pub async fn query_messages(&self, query: &Query) -> Result<Vec<S::Record>, QueryError> {
        let predicate = self.compile(&query.filter)?;
        self.run(&predicate, query.paginate).await
    }

    /// Like [`query_messages`](Self::query_messages), restricted to posts.
    ///
    /// The `author` operator matches every message of a feed, so a bare
    /// `{ "and": [ { "operator": "author", ... } ] }` only lines up with
    /// [`user_posts`](Self::user_posts) through this entry point.
    pub async fn query_posts(&self, query: &Query) -> Result<Vec<S::Record>, QueryError> {
        let store = self.executor.store();
        let predicate = store.and(vec![
            store.condition(Condition::Type(POST_TYPE.to_string())),
            self.compile(&query.filter)?,
        ]);
        self.run(&predicate, query.paginate).await
    }

    async fn run(
        &self,
        predicate: &S::Predicate,
        paginate: Option<usize>,
    ) -> Result<Vec<S::Record>, QueryError> {
        let mode = ExecutionMode::from(self.config.page_size(paginate)?);
        debug!(?mode, "executing filter query");
        self.executor.execute(predicate, mode).await
    }

    /// Posts by `id`, or by the local feed when `id` is omitted.
    pub async fn user_posts(&self, id: Option<&str>) -> Result<Vec<S::Record>, QueryError> {
        let id = id.unwrap_or(&self.self_id);
        self.authors.posts_by_author(id).await
    }

    pub fn user_posts_stream(&self, id: Option<&str>) -> RecordStream<S::Record> {
        let id = id.unwrap_or(&self.self_id);
        self.authors.posts_by_author_stream(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::memory::MemoryLog;
    use model::{filter::error::CompileError, records::message::Message};
    use serde_json::json;

    struct TestHost {
        id: String,
        db: Option<Arc<MemoryLog>>,
    }

    impl Host for TestHost {
        type Store = MemoryLog;

        fn id(&self) -> &str {
            &self.id
        }

        fn db(&self) -> Option<Arc<MemoryLog>> {
            self.db.clone()
        }
    }

    fn message(seq: u64, author: &str, kind: &str) -> Message {
        serde_json::from_value(json!({
            "key": format!("%{seq}"),
            "value": {
                "author": author,
                "sequence": seq,
                "timestamp": seq as f64 * 100.0,
                "content": { "type": kind }
            },
            "timestamp": seq as f64 * 100.0
        }))
        .unwrap()
    }

    fn service() -> QueryService<MemoryLog> {
        let log = MemoryLog::from_messages(vec![
            message(1, "@me", "post"),
            message(2, "@you", "post"),
            message(3, "@me", "contact"),
        ]);
        let host = TestHost {
            id: "@me".into(),
            db: Some(Arc::new(log)),
        };
        QueryService::init(&host, QueryConfig::default()).unwrap()
    }

    #[test]
    fn test_init_requires_store() {
        let host = TestHost {
            id: "@me".into(),
            db: None,
        };
        let err = QueryService::init(&host, QueryConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, QueryError::UnsupportedHost { .. }));
        assert!(err.to_string().contains(PLUGIN_NAME));
    }

    #[test]
    fn test_empty_host_id_falls_back_to_config() {
        let host = TestHost {
            id: String::new(),
            db: Some(Arc::new(MemoryLog::new())),
        };
        let config = QueryConfig::default().with_self_id("@configured");
        let svc = QueryService::init(&host, config.clone()).unwrap();
        assert_eq!(svc.self_id(), "@configured");

        let host = TestHost {
            id: "@host".into(),
            ..host
        };
        assert_eq!(QueryService::init(&host, config).unwrap().self_id(), "@host");
    }

    #[tokio::test]
    async fn test_query_posts_narrows_to_posts() {
        let svc = service();
        let query = Query::from_json(
            r#"{ "where": { "and": [ { "operator": "author", "value": "@me" } ] } }"#,
        )
        .unwrap();

        let all = svc.query_messages(&query).await.unwrap();
        assert_eq!(all.len(), 2);

        let posts = svc.query_posts(&query).await.unwrap();
        assert_eq!(posts, svc.user_posts(Some("@me")).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_posts_defaults_to_self() {
        let svc = service();
        let mine = svc.user_posts(None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].author(), "@me");

        let yours = svc.user_posts(Some("@you")).await.unwrap();
        assert_eq!(yours[0].key, "%2");
    }

    #[tokio::test]
    async fn test_query_messages_from_json() {
        let svc = service();
        let query = Query::from_json(
            r#"{ "where": { "or": [
                    { "operator": "type", "value": "contact" },
                    { "operator": "author", "value": "@you" }
                ] }, "paginate": 1 }"#,
        )
        .unwrap();

        let msgs = svc.query_messages(&query).await.unwrap();
        let keys: Vec<_> = msgs.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["%2", "%3"]);
    }

    #[tokio::test]
    async fn test_query_messages_rejects_zero_page_size() {
        let svc = service();
        let query = Query {
            filter: FilterInput {
                operator: Some("isPublic".into()),
                ..Default::default()
            },
            paginate: Some(0),
        };
        assert!(matches!(
            svc.query_messages(&query).await,
            Err(QueryError::InvalidPageSize { size: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_query_messages_surfaces_compile_errors() {
        let svc = service();
        let query = Query::from_json(r#"{ "where": { "operator": "likes", "value": 1 } }"#).unwrap();
        let err = svc.query_messages(&query).await.unwrap_err();
        assert!(matches!(
            err,
            QueryError::Compile(CompileError::UnknownOperator { .. })
        ));
    }
}
