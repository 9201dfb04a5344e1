use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A signed entry of an append-only feed, as stored in the message log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub key: String,
    pub value: MessageValue,
    /// Receive time in milliseconds since the epoch.
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageValue {
    #[serde(default)]
    pub previous: Option<String>,
    pub author: String,
    pub sequence: u64,
    /// Claimed creation time in milliseconds since the epoch.
    pub timestamp: f64,
    /// A JSON object for public messages, a ciphertext string for private ones.
    pub content: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMeta {
    #[serde(default)]
    pub private: bool,
}

impl Message {
    pub fn author(&self) -> &str {
        &self.value.author
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_field("type").and_then(Value::as_str)
    }

    pub fn content_field(&self, field: &str) -> Option<&Value> {
        self.value.content.as_object().and_then(|c| c.get(field))
    }

    /// Encrypted content, or content that was decrypted for us.
    pub fn is_private(&self) -> bool {
        self.value.content.is_string() || self.meta.as_ref().is_some_and(|m| m.private)
    }

    /// Resolves a dotted path such as `value.content.channel` against the
    /// message. Unknown roots resolve to `None`.
    pub fn lookup(&self, path: &[String]) -> Option<Value> {
        let (root, rest) = path.split_first()?;
        match (root.as_str(), rest) {
            ("key", []) => Some(Value::String(self.key.clone())),
            ("timestamp", []) => serde_json::Number::from_f64(self.timestamp).map(Value::Number),
            ("value", [field, tail @ ..]) => {
                let base = match field.as_str() {
                    "author" => Value::String(self.value.author.clone()),
                    "previous" => self
                        .value
                        .previous
                        .clone()
                        .map(Value::String)
                        .unwrap_or(Value::Null),
                    "sequence" => Value::from(self.value.sequence),
                    "timestamp" => serde_json::Number::from_f64(self.value.timestamp)
                        .map(Value::Number)?,
                    "content" => self.value.content.clone(),
                    _ => return None,
                };
                tail.iter()
                    .try_fold(base, |v, segment| v.get(segment.as_str()).cloned())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(content: Value) -> Message {
        serde_json::from_value(json!({
            "key": "%m1.sha256",
            "value": {
                "previous": null,
                "author": "@alice.ed25519",
                "sequence": 1,
                "timestamp": 1000.0,
                "content": content
            },
            "timestamp": 1005.0
        }))
        .unwrap()
    }

    fn path(p: &str) -> Vec<String> {
        p.split('.').map(str::to_string).collect()
    }

    #[test]
    fn test_content_accessors() {
        let msg = message(json!({ "type": "post", "text": "hi" }));
        assert_eq!(msg.content_type(), Some("post"));
        assert_eq!(msg.author(), "@alice.ed25519");
        assert!(!msg.is_private());
    }

    #[test]
    fn test_string_content_is_private() {
        let msg = message(json!("c2VjcmV0.box"));
        assert!(msg.is_private());
        assert_eq!(msg.content_type(), None);
    }

    #[test]
    fn test_lookup_paths() {
        let msg = message(json!({ "type": "post", "channel": "rust" }));
        assert_eq!(msg.lookup(&path("value.content.channel")), Some(json!("rust")));
        assert_eq!(msg.lookup(&path("value.author")), Some(json!("@alice.ed25519")));
        assert_eq!(msg.lookup(&path("key")), Some(json!("%m1.sha256")));
        assert_eq!(msg.lookup(&path("value.content.missing")), None);
        assert_eq!(msg.lookup(&path("nope")), None);
    }
}
