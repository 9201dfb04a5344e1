use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Comparison used by the time-range operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparison {
    pub fn holds(&self, actual: f64, bound: f64) -> bool {
        match self {
            Comparison::Lt => actual < bound,
            Comparison::Lte => actual <= bound,
            Comparison::Gt => actual > bound,
            Comparison::Gte => actual >= bound,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
        };
        f.write_str(s)
    }
}

/// A validated leaf condition, ready to be turned into a store predicate.
///
/// The registry produces these from raw filter leaves; stores only ever see
/// well-formed values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operator", content = "value", rename_all = "camelCase")]
pub enum Condition {
    Type(String),
    Author(String),
    Mentions(String),
    Channel(String),
    Key(String),
    VotesFor(String),
    Contact(String),
    About(String),
    HasRoot(String),
    HasFork(String),
    HasBranch(String),
    FullMentions(String),
    IsRoot,
    IsPrivate,
    IsPublic,
    /// Equality on an arbitrary dotted path, e.g. `value.content.type`.
    SlowEqual { path: Vec<String>, value: Value },
    /// Numeric comparison against a fixed field.
    Compare {
        field: &'static str,
        op: Comparison,
        value: f64,
    },
}
