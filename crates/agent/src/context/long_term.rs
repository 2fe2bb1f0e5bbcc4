//! Long-term memory: facts that outlive a single task.
//!
//! Populated by the embedding application before a run. The reasoning
//! loop only reads it. Nothing is evicted and nothing is persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LongTermMemory {
    facts: Vec<String>,
}

impl LongTermMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an existing list of facts, e.g. from configuration.
    pub fn from_facts<I, S>(facts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            facts: facts.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a fact.
    pub fn store(&mut self, fact: impl Into<String>) {
        self.facts.push(fact.into());
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// All facts, one per line.
    pub fn retrieve(&self) -> String {
        self.facts.join("\n")
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
