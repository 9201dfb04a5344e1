use thiserror::Error;

/// Why a leaf's value(s) were rejected by its operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("a value is required")]
    Missing,

    #[error("the value list must not be empty")]
    EmptyList,

    #[error("expected {expected} values, got {actual}")]
    WrongArity { expected: usize, actual: usize },

    #[error("expected {expected}, got {actual}")]
    WrongType { expected: &'static str, actual: String },
}

/// Errors raised while turning a filter tree into a store predicate.
///
/// All of these are fatal to the request: nothing is ever partially compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The node populates zero, or more than one, of `and`, `or`, `operator`.
    #[error("Filter node at {path} must set exactly one of and/or/operator, found {found}")]
    Shape { path: String, found: String },

    #[error("Empty '{combinator}' list at {path}")]
    EmptyCombinator {
        combinator: &'static str,
        path: String,
    },

    #[error("Unknown operator '{name}' at {path}")]
    UnknownOperator { name: String, path: String },

    #[error("Invalid value for operator '{operator}' at {path}: {source}")]
    InvalidValue {
        operator: String,
        path: String,
        #[source]
        source: ValueError,
    },
}

impl CompileError {
    /// The node path the error points at, e.g. `where.and[1]`.
    pub fn path(&self) -> &str {
        match self {
            CompileError::Shape { path, .. }
            | CompileError::EmptyCombinator { path, .. }
            | CompileError::UnknownOperator { path, .. }
            | CompileError::InvalidValue { path, .. } => path,
        }
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, CompileError::InvalidValue { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_path_and_name() {
        let err = CompileError::UnknownOperator {
            name: "likes".into(),
            path: "where.and[2]".into(),
        };
        let display = err.to_string();
        assert!(display.contains("likes"));
        assert!(display.contains("where.and[2]"));
        assert_eq!(err.path(), "where.and[2]");
    }

    #[test]
    fn test_invalid_value_wraps_reason() {
        let err = CompileError::InvalidValue {
            operator: "slowEqual".into(),
            path: "where".into(),
            source: ValueError::WrongArity {
                expected: 2,
                actual: 3,
            },
        };
        assert!(err.is_invalid_value());
        assert!(err.to_string().contains("expected 2 values, got 3"));
    }
}
