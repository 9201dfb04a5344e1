use crate::error::QueryError;
use model::pagination::page::PageSize;
use std::num::NonZeroUsize;

pub const ENV_PAGE_SIZE: &str = "FEEDQ_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "FEEDQ_MAX_PAGE_SIZE";
pub const ENV_SELF_ID: &str = "FEEDQ_SELF_ID";

pub const DEFAULT_PAGE_SIZE: PageSize = PageSize::new(NonZeroUsize::new(100).unwrap());
pub const DEFAULT_MAX_PAGE_SIZE: PageSize = PageSize::new(NonZeroUsize::new(10_000).unwrap());

/// Settings shared by every request served by a query service.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    /// Page size used by streaming feeds
    pub default_page_size: PageSize,
    /// Largest page a request may ask for
    pub max_page_size: PageSize,
    /// Identity to use when the host reports an empty one
    pub self_id: Option<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            self_id: None,
        }
    }
}

impl QueryConfig {
    /// Reads settings from `KEY=VALUE` pairs; unknown keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value = value.as_ref().trim();
            match key.as_ref() {
                ENV_PAGE_SIZE => config.default_page_size = parse_page_size(ENV_PAGE_SIZE, value)?,
                ENV_MAX_PAGE_SIZE => {
                    config.max_page_size = parse_page_size(ENV_MAX_PAGE_SIZE, value)?
                }
                ENV_SELF_ID if !value.is_empty() => config.self_id = Some(value.to_string()),
                _ => {}
            }
        }
        config.validate()
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_self_id(mut self, id: impl Into<String>) -> Self {
        self.self_id = Some(id.into());
        self
    }

    pub fn validate(self) -> Result<Self, QueryError> {
        if self.default_page_size > self.max_page_size {
            return Err(QueryError::Config(format!(
                "default page size {} exceeds maximum {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(self)
    }

    /// Checks a request's `paginate` value. `None` means resolve eagerly.
    pub fn page_size(&self, requested: Option<usize>) -> Result<Option<PageSize>, QueryError> {
        let Some(size) = requested else {
            return Ok(None);
        };
        let page = PageSize::from_usize(size).ok_or_else(|| QueryError::InvalidPageSize {
            size,
            reason: "page size must be positive".into(),
        })?;
        if page > self.max_page_size {
            return Err(QueryError::InvalidPageSize {
                size,
                reason: format!("maximum is {}", self.max_page_size),
            });
        }
        Ok(Some(page))
    }
}

fn parse_page_size(key: &str, value: &str) -> Result<PageSize, QueryError> {
    value
        .parse::<usize>()
        .ok()
        .and_then(PageSize::from_usize)
        .ok_or_else(|| QueryError::Config(format!("{key} must be a positive integer, got '{value}'")))
}
