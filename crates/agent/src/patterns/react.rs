//! ReAct pattern: Thought → Action → Observation until `Final:`.
//!
//! Each iteration sends the protocol instruction plus the tool catalogue as
//! the system prompt and the rendered history as the user prompt, then acts
//! on the single response:
//!
//! | Response | Next state |
//! |----------|------------|
//! | contains `Final:` | `Completed(response)` |
//! | no `Action:` clause | `Failed(NoActionDetected)` |
//! | unregistered tool, `FailFast` | `Failed(UnknownTool)` |
//! | unregistered tool, `SkipUnknown` | `Running(n + 1)`, nothing recorded |
//! | registered tool | `Running(n + 1)`, step recorded |
//!
//! Reaching `max_steps` iterations without a terminal state is
//! `Failed(MaxStepsExceeded)`. Model and tool errors propagate as `Err`.
//!
//! Two entry points share the loop: [`ReactAgent::run`] renders a flat
//! transcript, [`ReactAgent::run_with_memory`] renders through the
//! [`MemoryAssembler`] with a long-term memory.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use toolloop_config::AppConfig;
use toolloop_core::invoker::{ModelInvoker, ModelRequest};
use toolloop_core::policy::UnknownToolPolicy;
use toolloop_core::tool::{ToolRegistry, render_output};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::{LongTermMemory, MemoryAssembler, ShortTermMemory, render_transcript};
use crate::parser::parse_action;

/// Marker that ends a run with the response as the answer.
pub const FINAL_MARKER: &str = "Final:";

const PROTOCOL: &str = "\
Format:
Thought: your reasoning about what to do next
Action: tool_name[input]
Observation: provided after the action runs

Rules:
1. Always start with a Thought.
2. Invoke a tool with exactly one line: Action: tool_name[input]
3. Stop after the Action line and wait for the Observation.
4. When you have the final answer, respond with:
Final: your complete answer";

/// Why a run ended without an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    NoActionDetected,
    UnknownTool(String),
    MaxStepsExceeded,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActionDetected => write!(f, "no action detected"),
            Self::UnknownTool(name) => write!(f, "unknown tool: {name}"),
            Self::MaxStepsExceeded => write!(f, "max steps exceeded"),
        }
    }
}

/// Loop state. `Running` carries the number of iterations spent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LoopState {
    Running(u32),
    Completed(String),
    Failed(FailureReason),
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running(n) => write!(f, "running ({n} steps)"),
            Self::Completed(answer) => write!(f, "{answer}"),
            Self::Failed(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct ReactRun {
    pub run_id: Uuid,
    /// Terminal state; never `Running`.
    pub state: LoopState,
    /// Every dispatched step, in order.
    pub steps: ShortTermMemory,
    /// Number of model invocations made.
    pub model_calls: u32,
}

impl ReactRun {
    /// The final response, marker included, when the run completed.
    pub fn answer(&self) -> Option<&str> {
        match &self.state {
            LoopState::Completed(answer) => Some(answer),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.state {
            LoopState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, LoopState::Completed(_))
    }
}

/// How the user prompt is rendered each iteration.
#[derive(Clone, Copy)]
enum ContextMode<'a> {
    Transcript,
    Memory(&'a LongTermMemory),
}

/// The ReAct agent.
pub struct ReactAgent {
    /// Model invoker.
    invoker: Arc<dyn ModelInvoker>,
    /// Model name.
    model: String,
    /// Temperature.
    temperature: f32,
    /// Max tokens per response.
    max_tokens: u32,
    /// Tool registry.
    tools: Arc<ToolRegistry>,
    /// Iteration bound.
    max_steps: u32,
    /// What to do with an action naming an unregistered tool.
    unknown_tool: UnknownToolPolicy,
    /// Render only the most recent N steps.
    history_window: Option<usize>,
}

impl ReactAgent {
    /// Create a new ReAct agent with `max_steps = 5`, `max_tokens = 300`
    /// and fail-fast unknown-tool handling.
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            invoker,
            model: model.into(),
            temperature,
            max_tokens: 300,
            tools,
            max_steps: 5,
            unknown_tool: UnknownToolPolicy::FailFast,
            history_window: None,
        }
    }

    /// Plain agent configured from the `[react]` section.
    pub fn from_config(
        invoker: Arc<dyn ModelInvoker>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self::new(
            invoker,
            &config.default_model,
            config.default_temperature,
            tools,
        )
        .with_max_steps(config.react.max_steps)
        .with_max_tokens(config.react_max_tokens())
        .with_unknown_tool_policy(config.react.unknown_tool)
        .with_history_window(config.react.history_window)
    }

    /// Memory-aware agent configured from the `[memory]` section.
    pub fn memory_from_config(
        invoker: Arc<dyn ModelInvoker>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self::new(
            invoker,
            &config.default_model,
            config.default_temperature,
            tools,
        )
        .with_max_steps(config.memory.max_steps)
        .with_max_tokens(config.memory.max_tokens)
        .with_unknown_tool_policy(config.memory.unknown_tool)
        .with_history_window(config.memory.history_window)
    }

    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_unknown_tool_policy(mut self, policy: UnknownToolPolicy) -> Self {
        self.unknown_tool = policy;
        self
    }

    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Run with a flat transcript as context.
    pub async fn run(&self, question: &str) -> Result<ReactRun, toolloop_core::Error> {
        self.drive(question, ContextMode::Transcript).await
    }

    /// Run with long-term facts and structured step history as context.
    /// The loop reads `long_term` but never writes to it.
    pub async fn run_with_memory(
        &self,
        question: &str,
        long_term: &LongTermMemory,
    ) -> Result<ReactRun, toolloop_core::Error> {
        self.drive(question, ContextMode::Memory(long_term)).await
    }

    /// System instruction: protocol plus tool catalogue.
    pub fn system_prompt(&self, memory_aware: bool) -> String {
        let preamble = if memory_aware {
            "You are a memory-aware autonomous agent that follows the ReAct pattern.\n\
             Use relevant past knowledge and the current task history to avoid repeating work."
        } else {
            "You are an autonomous agent that follows the ReAct pattern."
        };
        format!(
            "{preamble}\n\nAvailable Tools:\n{}\n\n{PROTOCOL}",
            self.tools.catalogue()
        )
    }

    fn user_prompt(&self, question: &str, short_term: &ShortTermMemory, mode: ContextMode<'_>) -> String {
        match mode {
            ContextMode::Transcript => render_transcript(question, short_term, self.history_window),
            ContextMode::Memory(long_term) => MemoryAssembler::new(long_term)
                .with_history_window(self.history_window)
                .build_context(question, short_term),
        }
    }

    async fn drive(
        &self,
        question: &str,
        mode: ContextMode<'_>,
    ) -> Result<ReactRun, toolloop_core::Error> {
        let run_id = Uuid::new_v4();
        let system_prompt = self.system_prompt(matches!(mode, ContextMode::Memory(_)));
        let mut short_term = ShortTermMemory::new();
        let mut state = LoopState::Running(0);
        let mut model_calls = 0u32;

        info!(
            %run_id,
            model = %self.model,
            max_steps = self.max_steps,
            policy = ?self.unknown_tool,
            "ReAct loop starting"
        );

        while let LoopState::Running(step) = state {
            if step >= self.max_steps {
                warn!(%run_id, max_steps = self.max_steps, "ReAct: max steps reached");
                state = LoopState::Failed(FailureReason::MaxStepsExceeded);
                break;
            }

            debug!(%run_id, step, "ReAct iteration");

            let request = ModelRequest::new(
                &self.model,
                &system_prompt,
                self.user_prompt(question, &short_term, mode),
            )
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

            let response = self.invoker.execute(request).await?;
            model_calls += 1;

            state = self.advance(run_id, step, response, &mut short_term).await?;
        }

        match &state {
            LoopState::Completed(_) => info!(
                %run_id,
                model_calls,
                steps = short_term.len(),
                "ReAct loop completed"
            ),
            LoopState::Failed(reason) => warn!(
                %run_id,
                model_calls,
                steps = short_term.len(),
                reason = %reason,
                "ReAct loop failed"
            ),
            LoopState::Running(_) => {}
        }

        Ok(ReactRun {
            run_id,
            state,
            steps: short_term,
            model_calls,
        })
    }

    /// Act on one model response and return the next state.
    async fn advance(
        &self,
        run_id: Uuid,
        step: u32,
        response: String,
        short_term: &mut ShortTermMemory,
    ) -> Result<LoopState, toolloop_core::Error> {
        if response.contains(FINAL_MARKER) {
            return Ok(LoopState::Completed(response));
        }

        let Some(action) = parse_action(&response) else {
            debug!(%run_id, step, "No action in model response");
            return Ok(LoopState::Failed(FailureReason::NoActionDetected));
        };

        let Some(entry) = self.tools.get(&action.tool) else {
            return Ok(match self.unknown_tool {
                UnknownToolPolicy::FailFast => {
                    LoopState::Failed(FailureReason::UnknownTool(action.tool))
                }
                UnknownToolPolicy::SkipUnknown => {
                    warn!(%run_id, step, tool = %action.tool, "Skipping unknown tool");
                    LoopState::Running(step + 1)
                }
            });
        };

        debug!(%run_id, step, tool = %entry.name, input = %action.input, "Dispatching tool");

        let output = entry.tool.call(Value::String(action.input.clone())).await?;
        let observation = render_output(&output);

        debug!(%run_id, step, tool = %entry.name, observation = %observation, "Tool returned");

        short_term.record(response, action.descriptor(), observation);
        Ok(LoopState::Running(step + 1))
    }
}
