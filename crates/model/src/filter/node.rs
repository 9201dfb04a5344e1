use crate::filter::error::CompileError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the root node, matching the request field that carries it.
pub const ROOT_PATH: &str = "where";

/// Filter node as it arrives on the wire: every field optional, nothing
/// checked yet.
///
/// ```json
/// { "and": [ { "operator": "type", "value": "post" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Vec<FilterInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Vec<FilterInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
}

/// A single operator application. The operator name is not checked here;
/// resolving it is the registry's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub operator: String,
    pub value: Option<Value>,
    pub values: Option<Vec<Value>>,
}

/// A filter expression with exactly one shape per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FilterInput", into = "FilterInput")]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Leaf(Leaf),
}

impl FilterNode {
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::And(children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Or(children)
    }

    pub fn leaf(operator: impl Into<String>, value: Value) -> Self {
        FilterNode::Leaf(Leaf {
            operator: operator.into(),
            value: Some(value),
            values: None,
        })
    }

    pub fn leaf_values(operator: impl Into<String>, values: Vec<Value>) -> Self {
        FilterNode::Leaf(Leaf {
            operator: operator.into(),
            value: None,
            values: Some(values),
        })
    }

    pub fn bare(operator: impl Into<String>) -> Self {
        FilterNode::Leaf(Leaf {
            operator: operator.into(),
            value: None,
            values: None,
        })
    }

    /// Validates the shape of a wire node (recursively) without touching it.
    pub fn from_input(input: &FilterInput, path: &str) -> Result<Self, CompileError> {
        let populated: Vec<&str> = [
            input.and.as_ref().map(|_| "and"),
            input.or.as_ref().map(|_| "or"),
            input.operator.as_ref().map(|_| "operator"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if populated.len() != 1 {
            let found = if populated.is_empty() {
                "none".to_string()
            } else {
                populated.join(", ")
            };
            return Err(CompileError::Shape {
                path: path.to_string(),
                found,
            });
        }

        if let Some(children) = &input.and {
            return Ok(FilterNode::And(Self::children_from_input(
                children, path, "and",
            )?));
        }
        if let Some(children) = &input.or {
            return Ok(FilterNode::Or(Self::children_from_input(children, path, "or")?));
        }

        // exactly one field is populated and it is not a combinator
        let operator = input.operator.clone().unwrap_or_default();
        Ok(FilterNode::Leaf(Leaf {
            operator,
            value: input.value.clone(),
            values: input.values.clone(),
        }))
    }

    fn children_from_input(
        children: &[FilterInput],
        path: &str,
        combinator: &str,
    ) -> Result<Vec<FilterNode>, CompileError> {
        children
            .iter()
            .enumerate()
            .map(|(i, child)| Self::from_input(child, &child_path(path, combinator, i)))
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().map(FilterNode::leaf_count).sum()
            }
            FilterNode::Leaf(_) => 1,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                1 + children.iter().map(FilterNode::depth).max().unwrap_or(0)
            }
            FilterNode::Leaf(_) => 1,
        }
    }
}

/// Builds the path of the `index`-th child of a combinator node.
pub fn child_path(parent: &str, combinator: &str, index: usize) -> String {
    format!("{parent}.{combinator}[{index}]")
}

impl TryFrom<FilterInput> for FilterNode {
    type Error = CompileError;

    fn try_from(input: FilterInput) -> Result<Self, Self::Error> {
        FilterNode::from_input(&input, ROOT_PATH)
    }
}

impl From<FilterNode> for FilterInput {
    fn from(node: FilterNode) -> Self {
        match node {
            FilterNode::And(children) => FilterInput {
                and: Some(children.into_iter().map(FilterInput::from).collect()),
                ..Default::default()
            },
            FilterNode::Or(children) => FilterInput {
                or: Some(children.into_iter().map(FilterInput::from).collect()),
                ..Default::default()
            },
            FilterNode::Leaf(leaf) => FilterInput {
                operator: Some(leaf.operator),
                value: leaf.value,
                values: leaf.values,
                ..Default::default()
            },
        }
    }
}
