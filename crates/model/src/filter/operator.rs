use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Number of arguments an operator takes from a filter leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Takes no value; anything supplied is ignored.
    None,
    /// Takes exactly one value from `value`.
    Single,
    /// Takes exactly `n` values from `values`.
    List(usize),
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::None => write!(f, "none"),
            Arity::Single => write!(f, "single-value"),
            Arity::List(n) => write!(f, "value-list({n})"),
        }
    }
}

/// The closed vocabulary of filter operators.
///
/// Adding an operator means adding a variant here *and* an entry in the
/// planner's operator registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperatorName {
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "author")]
    Author,
    #[serde(rename = "mentions")]
    Mentions,
    #[serde(rename = "channel")]
    Channel,
    #[serde(rename = "key")]
    Key,
    #[serde(rename = "votesFor")]
    VotesFor,
    #[serde(rename = "contact")]
    Contact,
    #[serde(rename = "about")]
    About,
    #[serde(rename = "hasRoot")]
    HasRoot,
    #[serde(rename = "hasFork")]
    HasFork,
    #[serde(rename = "hasBranch")]
    HasBranch,
    #[serde(rename = "isRoot")]
    IsRoot,
    #[serde(rename = "isPrivate")]
    IsPrivate,
    #[serde(rename = "isPublic")]
    IsPublic,
    #[serde(rename = "fullMentions")]
    FullMentions,
    #[serde(rename = "slowEqual")]
    SlowEqual,
    #[serde(rename = "lt")]
    Lt,
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "gt")]
    Gt,
    #[serde(rename = "gte")]
    Gte,
}

impl OperatorName {
    pub const ALL: [OperatorName; 20] = [
        OperatorName::Type,
        OperatorName::Author,
        OperatorName::Mentions,
        OperatorName::Channel,
        OperatorName::Key,
        OperatorName::VotesFor,
        OperatorName::Contact,
        OperatorName::About,
        OperatorName::HasRoot,
        OperatorName::HasFork,
        OperatorName::HasBranch,
        OperatorName::IsRoot,
        OperatorName::IsPrivate,
        OperatorName::IsPublic,
        OperatorName::FullMentions,
        OperatorName::SlowEqual,
        OperatorName::Lt,
        OperatorName::Lte,
        OperatorName::Gt,
        OperatorName::Gte,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorName::Type => "type",
            OperatorName::Author => "author",
            OperatorName::Mentions => "mentions",
            OperatorName::Channel => "channel",
            OperatorName::Key => "key",
            OperatorName::VotesFor => "votesFor",
            OperatorName::Contact => "contact",
            OperatorName::About => "about",
            OperatorName::HasRoot => "hasRoot",
            OperatorName::HasFork => "hasFork",
            OperatorName::HasBranch => "hasBranch",
            OperatorName::IsRoot => "isRoot",
            OperatorName::IsPrivate => "isPrivate",
            OperatorName::IsPublic => "isPublic",
            OperatorName::FullMentions => "fullMentions",
            OperatorName::SlowEqual => "slowEqual",
            OperatorName::Lt => "lt",
            OperatorName::Lte => "lte",
            OperatorName::Gt => "gt",
            OperatorName::Gte => "gte",
        }
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorName::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for op in OperatorName::ALL {
            assert_eq!(op.as_str().parse::<OperatorName>(), Ok(op));
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("votesfor".parse::<OperatorName>().is_err());
        assert!("Type".parse::<OperatorName>().is_err());
        assert!("".parse::<OperatorName>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_spelling() {
        let json = serde_json::to_string(&OperatorName::HasRoot).unwrap();
        assert_eq!(json, "\"hasRoot\"");

        let op: OperatorName = serde_json::from_str("\"fullMentions\"").unwrap();
        assert_eq!(op, OperatorName::FullMentions);
    }
}
