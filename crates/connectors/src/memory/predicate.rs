use model::{filter::condition::Condition, records::message::Message};
use serde_json::Value;

/// Predicate tree evaluated by the in-memory log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogPredicate {
    Condition(Condition),
    And(Vec<LogPredicate>),
    Or(Vec<LogPredicate>),
}

impl LogPredicate {
    pub fn eval(&self, msg: &Message) -> bool {
        match self {
            LogPredicate::Condition(cond) => eval_condition(cond, msg),
            LogPredicate::And(children) => children.iter().all(|c| c.eval(msg)),
            LogPredicate::Or(children) => children.iter().any(|c| c.eval(msg)),
        }
    }
}

fn eval_condition(cond: &Condition, msg: &Message) -> bool {
    match cond {
        Condition::Type(t) => msg.content_type() == Some(t.as_str()),
        Condition::Author(id) => msg.author() == id,
        Condition::Key(key) => msg.key == *key,
        Condition::Channel(c) => content_str_eq(msg, "channel", c),
        Condition::Mentions(id) => mentions(msg, id, false),
        Condition::FullMentions(id) => mentions(msg, id, true),
        Condition::VotesFor(key) => {
            msg.content_type() == Some("vote")
                && msg
                    .content_field("vote")
                    .and_then(|v| v.get("link"))
                    .and_then(Value::as_str)
                    == Some(key.as_str())
        }
        Condition::Contact(id) => {
            msg.content_type() == Some("contact") && content_str_eq(msg, "contact", id)
        }
        Condition::About(id) => {
            msg.content_type() == Some("about") && content_str_eq(msg, "about", id)
        }
        Condition::HasRoot(key) => content_str_eq(msg, "root", key),
        Condition::HasFork(key) => content_str_eq(msg, "fork", key),
        Condition::HasBranch(key) => match msg.content_field("branch") {
            Some(Value::String(b)) => b == key,
            Some(Value::Array(bs)) => bs.iter().any(|b| b.as_str() == Some(key.as_str())),
            _ => false,
        },
        Condition::IsRoot => msg.content_field("root").is_none_or(Value::is_null),
        Condition::IsPrivate => msg.is_private(),
        Condition::IsPublic => !msg.is_private(),
        Condition::SlowEqual { path, value } => msg.lookup(path).as_ref() == Some(value),
        Condition::Compare { field, op, value } => {
            numeric_field(msg, field).is_some_and(|actual| op.holds(actual, *value))
        }
    }
}

fn content_str_eq(msg: &Message, field: &str, expected: &str) -> bool {
    msg.content_field(field).and_then(Value::as_str) == Some(expected)
}

// `mentions` accepts bare links and `{ link }` objects; `fullMentions` only the
// object form.
fn mentions(msg: &Message, id: &str, objects_only: bool) -> bool {
    let Some(Value::Array(entries)) = msg.content_field("mentions") else {
        return false;
    };
    entries.iter().any(|entry| match entry {
        Value::String(link) if !objects_only => link == id,
        Value::Object(obj) => obj.get("link").and_then(Value::as_str) == Some(id),
        _ => false,
    })
}

fn numeric_field(msg: &Message, field: &str) -> Option<f64> {
    match field {
        "timestamp" => Some(msg.value.timestamp),
        _ => None,
    }
}
