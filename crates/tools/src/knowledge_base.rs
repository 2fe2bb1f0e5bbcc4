//! Knowledge base tool: exact topic lookup over a small in-process table.
//!
//! Topics are matched case-insensitively after trimming. A miss is not an
//! error; the tool answers `not found` so the model can try another topic.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use toolloop_core::error::ToolError;
use toolloop_core::tool::Tool;
use tracing::debug;

use crate::text_argument;

/// Observation returned for unknown topics.
pub const NOT_FOUND: &str = "not found";

const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    (
        "cap",
        "CAP theorem states that a distributed system can only guarantee two of Consistency, Availability, and Partition Tolerance.",
    ),
    (
        "acid",
        "ACID stands for Atomicity, Consistency, Isolation, and Durability: the guarantees of a database transaction.",
    ),
    (
        "base",
        "BASE stands for Basically Available, Soft state, Eventual consistency: the trade-off many distributed stores make instead of ACID.",
    ),
    (
        "raft",
        "Raft is a consensus algorithm that elects a leader and replicates a log to followers; a write commits once a majority acknowledges it.",
    ),
    (
        "sharding",
        "Sharding splits a dataset horizontally across nodes by a partition key so each node stores and serves only a subset.",
    ),
];

pub struct KnowledgeBaseTool {
    entries: HashMap<String, String>,
}

impl KnowledgeBaseTool {
    /// A knowledge base seeded with the built-in distributed-systems topics.
    pub fn new() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|(topic, text)| (topic.to_string(), text.to_string()))
                .collect(),
        }
    }

    /// An empty knowledge base.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace a topic.
    pub fn with_entry(mut self, topic: &str, text: impl Into<String>) -> Self {
        self.entries.insert(normalize(topic), text.into());
        self
    }

    /// Look up a topic; `None` on a miss.
    pub fn lookup(&self, topic: &str) -> Option<&str> {
        self.entries.get(&normalize(topic)).map(String::as_str)
    }
}

impl Default for KnowledgeBaseTool {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(topic: &str) -> String {
    topic.trim().to_lowercase()
}

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    fn description(&self) -> &str {
        "Lookup basic distributed systems knowledge by topic (e.g. cap, acid, raft)"
    }

    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        let topic = text_argument(self.name(), &input, "topic")?;
        let answer = self.lookup(&topic);
        debug!(topic = %topic, hit = answer.is_some(), "Knowledge base lookup");
        Ok(Value::String(answer.unwrap_or(NOT_FOUND).to_string()))
    }
}
