//! Plan-and-execute: one model call produces a JSON plan, then every step
//! runs against the tool registry in order.
//!
//! ```text
//! goal ──▶ Planner ──▶ Plan {goal, steps[{id, action, input}]}
//!                          │
//!                          ▼
//!                      Executor ──▶ [ExecutionRecord {step_id, action, input, output}]
//! ```
//!
//! The planner does not repair or retry a malformed plan. The executor
//! stops at the first step naming an unregistered tool and returns no
//! partial results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use toolloop_config::AppConfig;
use toolloop_core::error::{Error, ToolError};
use toolloop_core::invoker::{ModelInvoker, ModelRequest};
use toolloop_core::tool::ToolRegistry;
use tracing::{debug, info, warn};

/// A plan step identifier, kept exactly as the model wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Number(u64),
    Text(String),
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: StepId,
    /// Registered tool identifier.
    pub action: String,
    pub input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub goal: String,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    /// Parse a plan from model output. Only surrounding whitespace is
    /// tolerated.
    pub fn parse(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text.trim()).map_err(Error::MalformedPlan)
    }

    /// Actions that name no registered tool, in plan order.
    pub fn unknown_actions<'a>(&'a self, tools: &ToolRegistry) -> Vec<&'a str> {
        self.steps
            .iter()
            .map(|step| step.action.as_str())
            .filter(|action| !tools.list().iter().any(|entry| entry.name == *action))
            .collect()
    }
}

/// One executed plan step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub step_id: StepId,
    pub action: String,
    pub input: Value,
    pub output: Value,
}

/// What a workflow returns to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Goal as restated by the plan.
    pub goal: String,
    pub steps: Vec<ExecutionRecord>,
}

/// A workflow result together with the plan that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRun {
    pub plan: Plan,
    pub result: WorkflowResult,
}

// ── Planner ───────────────────────────────────────────────────────────────

pub struct Planner {
    invoker: Arc<dyn ModelInvoker>,
    tools: Arc<ToolRegistry>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Planner {
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            invoker,
            tools,
            model: model.into(),
            temperature,
            max_tokens: 300,
        }
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// System instruction listing the exact tool identifiers.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a planning agent.\n\n\
             Available Tools:\n{}\n\n\
             Rules:\n\
             - The \"action\" field MUST be the exact tool name from the list above.\n\
             - Only use the tools listed above. Do not invent tools.\n\
             - Choose the best tool for each step.\n\
             - Respond ONLY with valid JSON of the form:\n\
             {{\"goal\": \"...\", \"steps\": [{{\"id\": 1, \"action\": \"tool_name\", \"input\": \"...\"}}]}}",
            self.tools.catalogue()
        )
    }

    /// Ask the model for a plan.
    pub async fn plan(&self, goal: &str) -> Result<Plan, Error> {
        let request = ModelRequest::new(&self.model, self.system_prompt(), goal)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.invoker.execute(request).await?;
        let plan = Plan::parse(&response)?;

        for action in plan.unknown_actions(&self.tools) {
            warn!(tool = %action, "Plan references an unregistered tool");
        }
        info!(goal = %plan.goal, steps = plan.steps.len(), "Plan created");

        Ok(plan)
    }
}

// ── Executor ──────────────────────────────────────────────────────────────

pub struct Executor {
    tools: Arc<ToolRegistry>,
}

impl Executor {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    /// Run every step in order. The first unknown action aborts the plan.
    pub async fn execute(&self, plan: &Plan) -> Result<Vec<ExecutionRecord>, Error> {
        let mut records = Vec::with_capacity(plan.steps.len());

        for step in &plan.steps {
            let Some(entry) = self.tools.get(&step.action) else {
                warn!(step = %step.id, tool = %step.action, "Plan step names an unknown tool");
                return Err(ToolError::NotFound(step.action.clone()).into());
            };

            debug!(step = %step.id, tool = %entry.name, "Executing plan step");
            let output = entry.tool.call(step.input.clone()).await?;

            records.push(ExecutionRecord {
                step_id: step.id.clone(),
                action: step.action.clone(),
                input: step.input.clone(),
                output,
            });
        }

        Ok(records)
    }
}

// ── Workflow ──────────────────────────────────────────────────────────────

/// Planner and executor composed over one registry.
pub struct Workflow {
    planner: Planner,
    executor: Executor,
}

impl Workflow {
    pub fn new(planner: Planner, executor: Executor) -> Self {
        Self { planner, executor }
    }

    pub fn from_config(
        invoker: Arc<dyn ModelInvoker>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        let planner = Planner::new(
            invoker,
            &config.default_model,
            config.default_temperature,
            tools.clone(),
        )
        .with_max_tokens(config.planner.max_tokens);
        Self::new(planner, Executor::new(tools))
    }

    /// Plan, then execute.
    pub async fn run(&self, goal: &str) -> Result<WorkflowRun, Error> {
        info!(goal = %goal, "Workflow starting");
        let plan = self.planner.plan(goal).await?;
        let steps = self.executor.execute(&plan).await?;
        info!(goal = %plan.goal, executed = steps.len(), "Workflow completed");

        Ok(WorkflowRun {
            result: WorkflowResult {
                goal: plan.goal.clone(),
                steps,
            },
            plan,
        })
    }
}
