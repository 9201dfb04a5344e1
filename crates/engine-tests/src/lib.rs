#![allow(dead_code)]

use connectors::memory::MemoryLog;
use model::records::message::Message;
use serde_json::{Value, json};
use std::sync::Arc;

pub mod utils;

const ALICE: &str = "@alice.ed25519";
const BOB: &str = "@bob.ed25519";
const CAROL: &str = "@carol.ed25519";

/// Root thread that most replies in the fixture feed point at.
const THREAD_ROOT: &str = "%thread.sha256";

fn message(seq: u64, author: &str, timestamp: f64, content: Value) -> Message {
    serde_json::from_value(json!({
        "key": key_of(author, seq),
        "value": {
            "author": author,
            "sequence": seq,
            "timestamp": timestamp,
            "content": content
        },
        "timestamp": timestamp + 5.0
    }))
    .expect("fixture message")
}

/// A small mixed feed: posts, replies, votes, contacts, one private message.
pub fn fixture_messages() -> Vec<Message> {
    vec![
        message(1, ALICE, 1000.0, json!({ "type": "post", "text": "hello", "channel": "intro" })),
        message(1, BOB, 1500.0, json!({ "type": "contact", "contact": ALICE, "following": true })),
        message(2, ALICE, 2000.0, json!({
            "type": "post",
            "text": "reply",
            "root": THREAD_ROOT,
            "branch": [THREAD_ROOT],
            "mentions": [ { "link": BOB, "name": "bob" } ]
        })),
        message(2, BOB, 2500.0, json!({
            "type": "vote",
            "vote": { "link": THREAD_ROOT, "value": 1, "expression": "Like" }
        })),
        message(3, ALICE, 3000.0, json!("c2VjcmV0.box")),
        message(1, CAROL, 3500.0, json!({
            "type": "post",
            "text": "cc",
            "mentions": [ ALICE ],
            "channel": "intro"
        })),
        message(4, ALICE, 4000.0, json!({ "type": "about", "about": ALICE, "name": "alice" })),
        message(3, BOB, 4500.0, json!({
            "type": "post",
            "text": "fork",
            "root": THREAD_ROOT,
            "fork": "%other.sha256",
            "branch": THREAD_ROOT
        })),
        message(5, ALICE, 5000.0, json!({ "type": "post", "text": "bye" })),
    ]
}

pub fn fixture_log() -> Arc<MemoryLog> {
    Arc::new(MemoryLog::from_messages(fixture_messages()))
}

/// `count` alternating post/vote messages by two authors, one per second.
pub fn bulk_log(count: u64) -> Arc<MemoryLog> {
    let msgs = (1..=count)
        .map(|i| {
            let author = if i % 2 == 0 { ALICE } else { BOB };
            let kind = if i % 4 == 0 { "vote" } else { "post" };
            message(i, author, i as f64 * 1000.0, json!({ "type": kind }))
        })
        .collect();
    Arc::new(MemoryLog::from_messages(msgs))
}

/// Key of the fixture message `seq` by `author`.
pub fn key_of(author: &str, seq: u64) -> String {
    format!("%{author}-{seq}")
}
