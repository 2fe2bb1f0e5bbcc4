//! Prompt assembly: turns the question and the step history into the
//! user message sent to the model on each iteration.
//!
//! Two renderings exist:
//!
//! - [`render_transcript`] for the plain loop: the question, then each raw
//!   model response followed by its `Observation:` line.
//! - [`MemoryAssembler`] for the memory-aware loop: the question, an
//!   optional `Relevant past knowledge:` section from long-term memory and an
//!   optional `Current task history:` section from short-term memory.
//!
//! Both accept a history window that keeps only the most recent steps.

use super::long_term::LongTermMemory;
use super::short_term::{ShortTermMemory, Step};

/// Header of the long-term memory section.
pub const KNOWLEDGE_HEADER: &str = "Relevant past knowledge:";
/// Header of the short-term memory section.
pub const HISTORY_HEADER: &str = "Current task history:";

/// Render the plain loop's running transcript.
pub fn render_transcript(
    question: &str,
    short_term: &ShortTermMemory,
    history_window: Option<usize>,
) -> String {
    let mut out = format!("Question: {question}\n");
    for step in short_term.recent(history_window) {
        out.push('\n');
        out.push_str(step.thought.trim_end());
        out.push_str("\nObservation: ");
        out.push_str(&step.observation);
        out.push('\n');
    }
    out
}

/// Builds the memory-aware context from both memory tiers.
#[derive(Debug, Clone, Copy)]
pub struct MemoryAssembler<'a> {
    long_term: &'a LongTermMemory,
    history_window: Option<usize>,
}

impl<'a> MemoryAssembler<'a> {
    pub fn new(long_term: &'a LongTermMemory) -> Self {
        Self {
            long_term,
            history_window: None,
        }
    }

    /// Render only the most recent `window` steps.
    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }

    /// Assemble the user message for the next model call.
    pub fn build_context(&self, question: &str, short_term: &ShortTermMemory) -> String {
        let mut out = format!("Question: {question}\n");

        if !self.long_term.is_empty() {
            out.push('\n');
            out.push_str(KNOWLEDGE_HEADER);
            out.push('\n');
            for fact in self.long_term.facts() {
                out.push_str(fact);
                out.push('\n');
            }
        }

        let steps = short_term.recent(self.history_window);
        if !steps.is_empty() {
            out.push('\n');
            out.push_str(HISTORY_HEADER);
            out.push('\n');
            for step in steps {
                render_step(&mut out, step);
            }
        }

        out
    }
}

fn render_step(out: &mut String, step: &Step) {
    out.push_str("Thought: ");
    out.push_str(step.thought.trim());
    out.push_str("\nAction: ");
    out.push_str(&step.action);
    out.push_str("\nObservation: ");
    out.push_str(&step.observation);
    out.push('\n');
}
