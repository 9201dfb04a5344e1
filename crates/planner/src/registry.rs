use model::filter::{
    condition::{Comparison, Condition},
    error::{CompileError, ValueError},
    operator::{Arity, OperatorName},
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Field the time-range operators always compare against.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Operands handed to a condition builder after arity checks.
#[derive(Debug, Clone, Copy)]
pub enum Operands<'a> {
    None,
    Single(&'a Value),
    List(&'a [Value]),
}

/// Type alias for condition builders
pub type ConditionFn = fn(Operands<'_>) -> Result<Condition, ValueError>;

#[derive(Debug, Clone, Serialize)]
pub struct OperatorEntry {
    pub name: OperatorName,
    pub arity: Arity,
    /// Field the operator is implicitly bound to, if any.
    pub bound_field: Option<&'static str>,
    #[serde(skip)]
    build: ConditionFn,
}

impl OperatorEntry {
    /// Checks the leaf's value(s) against the operator's arity and builds the
    /// condition.
    pub fn construct(
        &self,
        value: Option<&Value>,
        values: Option<&[Value]>,
    ) -> Result<Condition, ValueError> {
        let operands = match self.arity {
            Arity::None => Operands::None,
            Arity::Single => Operands::Single(single_value(value, values)?),
            Arity::List(n) => Operands::List(value_list(values, n)?),
        };
        (self.build)(operands)
    }
}

/// Maps operator names to condition builders.
///
/// Built once at startup and passed by reference to every compiler.
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    entries: HashMap<OperatorName, OperatorEntry>,
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorRegistry {
    /// Create a registry holding the full operator vocabulary
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };

        registry.register(OperatorName::Type, Arity::Single, None, build_type);
        registry.register(OperatorName::Author, Arity::Single, None, build_author);
        registry.register(OperatorName::Mentions, Arity::Single, None, build_mentions);
        registry.register(OperatorName::Channel, Arity::Single, None, build_channel);
        registry.register(OperatorName::Key, Arity::Single, None, build_key);
        registry.register(OperatorName::VotesFor, Arity::Single, None, build_votes_for);
        registry.register(OperatorName::Contact, Arity::Single, None, build_contact);
        registry.register(OperatorName::About, Arity::Single, None, build_about);
        registry.register(OperatorName::HasRoot, Arity::Single, None, build_has_root);
        registry.register(OperatorName::HasFork, Arity::Single, None, build_has_fork);
        registry.register(OperatorName::HasBranch, Arity::Single, None, build_has_branch);
        registry.register(OperatorName::IsRoot, Arity::None, None, |_| Ok(Condition::IsRoot));
        registry.register(OperatorName::IsPrivate, Arity::None, None, |_| {
            Ok(Condition::IsPrivate)
        });
        registry.register(OperatorName::IsPublic, Arity::None, None, |_| {
            Ok(Condition::IsPublic)
        });
        registry.register(
            OperatorName::FullMentions,
            Arity::Single,
            None,
            build_full_mentions,
        );
        registry.register(OperatorName::SlowEqual, Arity::List(2), None, build_slow_equal);
        registry.register(OperatorName::Lt, Arity::Single, Some(TIMESTAMP_FIELD), build_lt);
        registry.register(OperatorName::Lte, Arity::Single, Some(TIMESTAMP_FIELD), build_lte);
        registry.register(OperatorName::Gt, Arity::Single, Some(TIMESTAMP_FIELD), build_gt);
        registry.register(OperatorName::Gte, Arity::Single, Some(TIMESTAMP_FIELD), build_gte);

        registry
    }

    fn register(
        &mut self,
        name: OperatorName,
        arity: Arity,
        bound_field: Option<&'static str>,
        build: ConditionFn,
    ) {
        self.entries.insert(
            name,
            OperatorEntry {
                name,
                arity,
                bound_field,
                build,
            },
        );
    }

    /// Looks up an operator by its wire name.
    pub fn resolve(&self, name: &str, path: &str) -> Result<&OperatorEntry, CompileError> {
        name.parse::<OperatorName>()
            .ok()
            .and_then(|op| self.entries.get(&op))
            .ok_or_else(|| CompileError::UnknownOperator {
                name: name.to_string(),
                path: path.to_string(),
            })
    }

    /// All registered operators, in vocabulary order.
    pub fn operators(&self) -> impl Iterator<Item = &OperatorEntry> {
        OperatorName::ALL
            .iter()
            .filter_map(|name| self.entries.get(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn single_value<'a>(
    value: Option<&'a Value>,
    values: Option<&'a [Value]>,
) -> Result<&'a Value, ValueError> {
    match (value, values) {
        (Some(v), _) if !v.is_null() => Ok(v),
        (_, Some([v])) if !v.is_null() => Ok(v),
        (_, Some(vs)) if vs.len() > 1 => Err(ValueError::WrongArity {
            expected: 1,
            actual: vs.len(),
        }),
        _ => Err(ValueError::Missing),
    }
}

fn value_list(values: Option<&[Value]>, expected: usize) -> Result<&[Value], ValueError> {
    match values {
        None => Err(ValueError::Missing),
        Some([]) => Err(ValueError::EmptyList),
        Some(vs) if vs.len() != expected => Err(ValueError::WrongArity {
            expected,
            actual: vs.len(),
        }),
        Some(vs) => Ok(vs),
    }
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

fn single<'a>(operands: Operands<'a>) -> Result<&'a Value, ValueError> {
    match operands {
        Operands::Single(v) => Ok(v),
        _ => Err(ValueError::Missing),
    }
}

/// A string operand. Identity-like values may also arrive as `{ "id": "…" }`.
fn text(operands: Operands<'_>) -> Result<String, ValueError> {
    let value = single(operands)?;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(obj) => match obj.get("id") {
            Some(Value::String(id)) => Ok(id.clone()),
            _ => Err(ValueError::WrongType {
                expected: "string or {id}",
                actual: "object".to_string(),
            }),
        },
        other => Err(ValueError::WrongType {
            expected: "string",
            actual: type_name(other),
        }),
    }
}

fn number(operands: Operands<'_>) -> Result<f64, ValueError> {
    let value = single(operands)?;
    value.as_f64().ok_or_else(|| ValueError::WrongType {
        expected: "number",
        actual: type_name(value),
    })
}

fn build_type(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::Type)
}

fn build_author(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::Author)
}

fn build_mentions(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::Mentions)
}

fn build_full_mentions(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::FullMentions)
}

fn build_channel(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::Channel)
}

fn build_key(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::Key)
}

fn build_votes_for(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::VotesFor)
}

fn build_contact(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::Contact)
}

fn build_about(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::About)
}

fn build_has_root(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::HasRoot)
}

fn build_has_fork(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::HasFork)
}

fn build_has_branch(ops: Operands<'_>) -> Result<Condition, ValueError> {
    text(ops).map(Condition::HasBranch)
}

fn build_slow_equal(ops: Operands<'_>) -> Result<Condition, ValueError> {
    let Operands::List([path, value]) = ops else {
        return Err(ValueError::Missing);
    };
    let path = match path {
        Value::String(p) if !p.is_empty() => p.split('.').map(str::to_string).collect(),
        other => {
            return Err(ValueError::WrongType {
                expected: "dotted path string",
                actual: type_name(other),
            });
        }
    };
    Ok(Condition::SlowEqual {
        path,
        value: value.clone(),
    })
}

fn compare(op: Comparison, ops: Operands<'_>) -> Result<Condition, ValueError> {
    Ok(Condition::Compare {
        field: TIMESTAMP_FIELD,
        op,
        value: number(ops)?,
    })
}

fn build_lt(ops: Operands<'_>) -> Result<Condition, ValueError> {
    compare(Comparison::Lt, ops)
}

fn build_lte(ops: Operands<'_>) -> Result<Condition, ValueError> {
    compare(Comparison::Lte, ops)
}

fn build_gt(ops: Operands<'_>) -> Result<Condition, ValueError> {
    compare(Comparison::Gt, ops)
}

fn build_gte(ops: Operands<'_>) -> Result<Condition, ValueError> {
    compare(Comparison::Gte, ops)
}
