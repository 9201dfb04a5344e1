use crate::registry::OperatorRegistry;
use connectors::store::PredicateBuilder;
use model::filter::{
    error::CompileError,
    node::{FilterInput, FilterNode, Leaf, ROOT_PATH, child_path},
};
use tracing::debug;

/// A trait for compiling filter trees into a specific format.
pub trait FilterCompiler {
    /// The type of filter that this compiler produces.
    type Filter;

    /// Compile the tree into a filter.
    fn compile(&self, node: &FilterNode) -> Result<Self::Filter, CompileError>;
}

/// Lowers a [`FilterNode`] tree into a store predicate.
///
/// Pure: the same tree and registry always produce the same predicate, and the
/// input tree is only borrowed.
pub struct PredicateCompiler<'a, B: PredicateBuilder + ?Sized> {
    registry: &'a OperatorRegistry,
    builder: &'a B,
}

impl<'a, B: PredicateBuilder + ?Sized> PredicateCompiler<'a, B> {
    pub fn new(registry: &'a OperatorRegistry, builder: &'a B) -> Self {
        Self { registry, builder }
    }

    /// Validates a wire-form tree and compiles it.
    pub fn compile_input(&self, input: &FilterInput) -> Result<B::Predicate, CompileError> {
        let node = FilterNode::from_input(input, ROOT_PATH)?;
        self.compile(&node)
    }

    fn compile_at(&self, node: &FilterNode, path: &str) -> Result<B::Predicate, CompileError> {
        match node {
            FilterNode::And(children) => {
                let preds = self.compile_children(children, path, "and")?;
                // a single child still goes through the combinator
                Ok(self.builder.and(preds))
            }
            FilterNode::Or(children) => {
                let preds = self.compile_children(children, path, "or")?;
                Ok(self.builder.or(preds))
            }
            FilterNode::Leaf(leaf) => self.compile_leaf(leaf, path),
        }
    }

    fn compile_children(
        &self,
        children: &[FilterNode],
        path: &str,
        combinator: &'static str,
    ) -> Result<Vec<B::Predicate>, CompileError> {
        if children.is_empty() {
            return Err(CompileError::EmptyCombinator {
                combinator,
                path: path.to_string(),
            });
        }

        children
            .iter()
            .enumerate()
            .map(|(i, child)| self.compile_at(child, &child_path(path, combinator, i)))
            .collect()
    }

    fn compile_leaf(&self, leaf: &Leaf, path: &str) -> Result<B::Predicate, CompileError> {
        let entry = self.registry.resolve(&leaf.operator, path)?;
        let condition = entry
            .construct(leaf.value.as_ref(), leaf.values.as_deref())
            .map_err(|source| CompileError::InvalidValue {
                operator: leaf.operator.clone(),
                path: path.to_string(),
                source,
            })?;
        Ok(self.builder.condition(condition))
    }
}

impl<B: PredicateBuilder + ?Sized> FilterCompiler for PredicateCompiler<'_, B> {
    type Filter = B::Predicate;

    fn compile(&self, node: &FilterNode) -> Result<Self::Filter, CompileError> {
        let predicate = self.compile_at(node, ROOT_PATH)?;
        debug!(
            leaves = node.leaf_count(),
            depth = node.depth(),
            "compiled filter tree"
        );
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use connectors::memory::{MemoryLog, predicate::LogPredicate};
    use model::filter::{
        condition::{Comparison, Condition},
        error::ValueError,
    };
    use serde_json::json;

    fn compile(node: &FilterNode) -> Result<LogPredicate, CompileError> {
        let registry = OperatorRegistry::new();
        let log = MemoryLog::new();
        PredicateCompiler::new(&registry, &log).compile(node)
    }

    #[test]
    fn test_leaf_compiles_to_condition() {
        let pred = compile(&FilterNode::leaf("type", json!("post"))).unwrap();
        assert_eq!(pred, LogPredicate::Condition(Condition::Type("post".into())));
    }

    #[test]
    fn test_single_child_keeps_combinator() {
        let pred = compile(&FilterNode::and(vec![FilterNode::leaf("author", json!("@a"))])).unwrap();
        assert_eq!(
            pred,
            LogPredicate::And(vec![LogPredicate::Condition(Condition::Author("@a".into()))])
        );
    }

    #[test]
    fn test_nested_structure_is_preserved_in_order() {
        let node = FilterNode::or(vec![
            FilterNode::and(vec![
                FilterNode::leaf("type", json!("post")),
                FilterNode::leaf("gt", json!(100)),
            ]),
            FilterNode::bare("isPrivate"),
        ]);

        let pred = compile(&node).unwrap();
        assert_eq!(
            pred,
            LogPredicate::Or(vec![
                LogPredicate::And(vec![
                    LogPredicate::Condition(Condition::Type("post".into())),
                    LogPredicate::Condition(Condition::Compare {
                        field: "timestamp",
                        op: Comparison::Gt,
                        value: 100.0,
                    }),
                ]),
                LogPredicate::Condition(Condition::IsPrivate),
            ])
        );
    }

    #[test]
    fn test_compile_is_deterministic() {
        let node = FilterNode::and(vec![
            FilterNode::leaf("type", json!("post")),
            FilterNode::or(vec![
                FilterNode::leaf("channel", json!("a")),
                FilterNode::leaf("channel", json!("b")),
            ]),
        ]);
        assert_eq!(compile(&node).unwrap(), compile(&node).unwrap());
    }

    #[test]
    fn test_empty_combinators_fail() {
        assert_eq!(
            compile(&FilterNode::and(vec![])).unwrap_err(),
            CompileError::EmptyCombinator {
                combinator: "and",
                path: "where".into()
            }
        );

        let nested = FilterNode::and(vec![
            FilterNode::leaf("type", json!("post")),
            FilterNode::or(vec![]),
        ]);
        assert_eq!(
            compile(&nested).unwrap_err(),
            CompileError::EmptyCombinator {
                combinator: "or",
                path: "where.and[1]".into()
            }
        );
    }

    #[test]
    fn test_unknown_operator_is_a_hard_error() {
        let node = FilterNode::and(vec![
            FilterNode::leaf("type", json!("post")),
            FilterNode::leaf("likes", json!("@a")),
        ]);
        assert_eq!(
            compile(&node).unwrap_err(),
            CompileError::UnknownOperator {
                name: "likes".into(),
                path: "where.and[1]".into()
            }
        );
    }

    #[test]
    fn test_invalid_value_carries_operator_and_path() {
        let node = FilterNode::or(vec![FilterNode::bare("author")]);
        assert_eq!(
            compile(&node).unwrap_err(),
            CompileError::InvalidValue {
                operator: "author".into(),
                path: "where.or[0]".into(),
                source: ValueError::Missing,
            }
        );
    }

    #[test]
    fn test_compile_input_checks_shape_first() {
        let registry = OperatorRegistry::new();
        let log = MemoryLog::new();
        let compiler = PredicateCompiler::new(&registry, &log);

        let input: FilterInput = serde_json::from_value(json!({
            "and": [{ "operator": "type", "value": "post", "or": [] }]
        }))
        .unwrap();
        let err = compiler.compile_input(&input).unwrap_err();
        assert!(matches!(err, CompileError::Shape { ref path, .. } if path == "where.and[0]"));
    }
}
