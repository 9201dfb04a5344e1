use crate::pagination::cursor::Cursor;
use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroUsize};

/// Requested page size for a paginated drain. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub const fn new(size: NonZeroUsize) -> Self {
        PageSize(size)
    }

    /// Returns `None` for zero.
    pub fn from_usize(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(PageSize)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page handed back by a store fetch.
#[derive(Debug, Clone)]
pub struct FetchResult<R> {
    pub rows: Vec<R>,
    /// Where the next fetch should resume; `None` once the end is reached.
    pub next_cursor: Option<Cursor>,
    pub reached_end: bool,
    pub row_count: usize,
    pub took_ms: u128,
}

impl<R> FetchResult<R> {
    pub fn is_last(&self) -> bool {
        self.reached_end || self.next_cursor.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(PageSize::from_usize(0).is_none());
        assert_eq!(PageSize::from_usize(25).map(|p| p.get()), Some(25));
    }

    #[test]
    fn test_page_size_deserializes_from_integer() {
        let size: PageSize = serde_json::from_str("50").unwrap();
        assert_eq!(size.get(), 50);
        assert!(serde_json::from_str::<PageSize>("0").is_err());
    }
}
