//! Reasoning strategies.
//!
//! 1. **ReAct**: Thought → Action → Observation loop, with a plain
//!    transcript or with long-term and short-term memory as context
//! 2. **Plan/Execute**: one JSON plan from the model, executed step by step

pub mod plan_execute;
pub mod react;

pub use plan_execute::{
    ExecutionRecord, Executor, Plan, PlanStep, Planner, StepId, Workflow, WorkflowResult,
    WorkflowRun,
};
pub use react::{FINAL_MARKER, FailureReason, LoopState, ReactAgent, ReactRun};

#[cfg(test)]
pub(crate) mod test_helpers;
