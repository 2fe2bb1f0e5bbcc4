//! Short-term memory: the step transcript of a single task run.
//!
//! Steps are appended in dispatch order and never edited. The memory is
//! created when a run starts and handed back to the caller when it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One dispatched tool call and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Raw model response that produced the action.
    pub thought: String,
    /// Action descriptor, `name[input]`.
    pub action: String,
    /// Rendered tool output.
    pub observation: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortTermMemory {
    steps: Vec<Step>,
}

impl ShortTermMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn record(
        &mut self,
        thought: impl Into<String>,
        action: impl Into<String>,
        observation: impl Into<String>,
    ) {
        self.steps.push(Step {
            thought: thought.into(),
            action: action.into(),
            observation: observation.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The most recent `window` steps, or all of them when `window` is `None`.
    pub fn recent(&self, window: Option<usize>) -> &[Step] {
        match window {
            Some(n) if n < self.steps.len() => &self.steps[self.steps.len() - n..],
            _ => &self.steps,
        }
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Export as JSON for debugging.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
