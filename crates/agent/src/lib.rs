//! Reasoning engines for toolloop.
//!
//! A goal goes in together with a [`ToolRegistry`](toolloop_core::ToolRegistry)
//! and a [`ModelInvoker`](toolloop_core::ModelInvoker). Two engines drive it:
//!
//! - [`ReactAgent`] loops Thought → Action → Observation, parsing one
//!   `Action: tool[input]` clause per model response, until the model
//!   answers with `Final:` or the step bound is hit.
//! - [`Workflow`] asks the model once for a JSON plan and runs each step
//!   against the registry in order.
//!
//! Model calls and tool calls are awaited one at a time; nothing in a run
//! executes concurrently.

pub mod context;
pub mod parser;
pub mod patterns;

pub use context::{LongTermMemory, MemoryAssembler, ShortTermMemory, Step};
pub use parser::{ParsedAction, parse_action};
pub use patterns::{
    ExecutionRecord, Executor, FINAL_MARKER, FailureReason, LoopState, Plan, PlanStep, Planner,
    ReactAgent, ReactRun, StepId, Workflow, WorkflowResult, WorkflowRun,
};
