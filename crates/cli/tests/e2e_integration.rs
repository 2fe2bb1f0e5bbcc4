//! End-to-end integration tests for toolloop.
//!
//! These tests exercise the full pipeline from goal to result: config,
//! the built-in tool registry, the ReAct loop in both context modes and
//! the plan/execute workflow, with a scripted model in place of the network.

use std::sync::Arc;

use serde_json::json;
use toolloop_agent::{
    FailureReason, LongTermMemory, MemoryAssembler, ReactAgent, ShortTermMemory, Workflow,
    parse_action,
};
use toolloop_config::AppConfig;
use toolloop_core::error::{Error, ProviderError, ToolError};
use toolloop_core::invoker::{ModelInvoker, ModelRequest};
use toolloop_core::policy::{DuplicatePolicy, UnknownToolPolicy};
use toolloop_core::tool::{FnTool, ToolRegistry};
use toolloop_tools::{default_registry, registry_with_policy};

// ── Mock Invoker ─────────────────────────────────────────────────────────

/// A mock invoker that returns scripted responses in sequence.
struct ScriptedModel {
    responses: Vec<String>,
    requests: std::sync::Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|r| r.to_string()).collect(),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ModelRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl ModelInvoker for ScriptedModel {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn execute(&self, request: ModelRequest) -> Result<String, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        if call >= self.responses.len() {
            panic!(
                "ScriptedModel exhausted: call #{}, have {}",
                call + 1,
                self.responses.len()
            );
        }
        requests.push(request);
        Ok(self.responses[call].clone())
    }
}

fn tools() -> Arc<ToolRegistry> {
    Arc::new(default_registry())
}

// ── E2E: ReAct Pipeline ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_react_calculator_then_final() {
    let model = Arc::new(ScriptedModel::new(&[
        "Thought: I need to evaluate the expression.\nAction: calculator[2 + 2 * 5]",
        "Thought: I have the result.\nFinal: 2 + 2 * 5 = 12",
    ]));

    let agent = ReactAgent::new(model.clone(), "mock", 0.2, tools());
    let run = agent.run("What is 2 + 2 * 5?").await.expect("run succeeds");

    assert_eq!(
        run.answer(),
        Some("Thought: I have the result.\nFinal: 2 + 2 * 5 = 12")
    );
    assert_eq!(model.calls(), 2);
    assert_eq!(run.steps.len(), 1);
    assert_eq!(run.steps.steps()[0].observation, "12");

    let second = model.request(1);
    assert!(second.user_prompt.contains("Action: calculator[2 + 2 * 5]"));
    assert!(second.user_prompt.contains("Observation: 12"));
}

#[tokio::test]
async fn e2e_react_direct_final_makes_no_tool_calls() {
    let model = Arc::new(ScriptedModel::new(&["Final: Paris"]));
    let run = ReactAgent::new(model.clone(), "mock", 0.2, tools())
        .run("Capital of France?")
        .await
        .unwrap();

    assert_eq!(run.answer(), Some("Final: Paris"));
    assert!(run.steps.is_empty());
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn e2e_react_stops_after_exactly_max_steps() {
    let model = Arc::new(ScriptedModel::new(&[
        "Action: calculator[1+1]",
        "Action: calculator[1+1]",
        "Action: calculator[1+1]",
    ]));
    let run = ReactAgent::new(model.clone(), "mock", 0.2, tools())
        .with_max_steps(3)
        .run("never finishes")
        .await
        .unwrap();

    assert_eq!(run.failure(), Some(&FailureReason::MaxStepsExceeded));
    assert_eq!(run.state.to_string(), "Error: max steps exceeded");
    assert_eq!(model.calls(), 3);
}

#[tokio::test]
async fn e2e_react_no_action_and_unknown_tool() {
    let model = Arc::new(ScriptedModel::new(&["Hmm, let me think about it."]));
    let run = ReactAgent::new(model, "mock", 0.2, tools())
        .run("?")
        .await
        .unwrap();
    assert_eq!(run.failure(), Some(&FailureReason::NoActionDetected));

    let model = Arc::new(ScriptedModel::new(&["Action: web_search[rust]"]));
    let run = ReactAgent::new(model, "mock", 0.2, tools())
        .run("?")
        .await
        .unwrap();
    assert_eq!(run.state.to_string(), "Error: unknown tool: web_search");
}

#[tokio::test]
async fn e2e_react_calculator_failure_is_an_error() {
    let model = Arc::new(ScriptedModel::new(&["Action: calculator[1 / 0]"]));
    let err = ReactAgent::new(model, "mock", 0.2, tools())
        .run("divide by zero")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Tool(ToolError::ExecutionFailed { ref tool_name, .. }) if tool_name == "calculator"
    ));
}

#[tokio::test]
async fn e2e_react_from_config() {
    let mut config = AppConfig::default();
    config.default_model = "gpt-test".into();
    config.react.max_steps = 2;

    let model = Arc::new(ScriptedModel::new(&[
        "Action: knowledge_base[raft]",
        "Action: knowledge_base[sharding]",
    ]));
    let run = ReactAgent::from_config(model.clone(), tools(), &config)
        .run("Explain consensus")
        .await
        .unwrap();

    assert_eq!(run.failure(), Some(&FailureReason::MaxStepsExceeded));
    assert_eq!(run.steps.len(), 2);
    assert!(run.steps.steps()[0].observation.starts_with("Raft"));
    assert_eq!(model.request(0).model, "gpt-test");
    assert_eq!(model.request(0).max_tokens, 300);
}

// ── E2E: Memory-Augmented Loop ───────────────────────────────────────────

#[tokio::test]
async fn e2e_memory_loop_uses_both_tiers() {
    let mut long_term = LongTermMemory::new();
    long_term.store("CAP theorem has three properties: C, A, P.");

    let model = Arc::new(ScriptedModel::new(&[
        "Thought: look it up.\nAction: knowledge_base[cap]",
        "Final: CAP means you pick two of three.",
    ]));
    let run = ReactAgent::memory_from_config(model.clone(), tools(), &AppConfig::default())
        .run_with_memory("Explain CAP", &long_term)
        .await
        .unwrap();

    assert!(run.is_completed());

    let first = model.request(0).user_prompt;
    assert!(first.starts_with("Question: Explain CAP"));
    assert!(first.contains("Relevant past knowledge:\nCAP theorem has three properties: C, A, P."));
    assert!(!first.contains("Current task history:"));

    let second = model.request(1).user_prompt;
    assert!(second.contains("Current task history:"));
    assert!(second.contains("Action: knowledge_base[cap]"));
    assert_eq!(model.request(1).max_tokens, 400);
    assert_eq!(long_term.len(), 1);
}

#[tokio::test]
async fn e2e_memory_loop_skips_unknown_tools_by_default() {
    let model = Arc::new(ScriptedModel::new(&[
        "Action: lookup[cap]",
        "Action: knowledge_base[cap]",
        "Final: done",
    ]));
    let run = ReactAgent::memory_from_config(model.clone(), tools(), &AppConfig::default())
        .run_with_memory("Explain CAP", &LongTermMemory::new())
        .await
        .unwrap();

    assert!(run.is_completed());
    assert_eq!(run.steps.len(), 1);
    assert_eq!(model.calls(), 3);
}

#[tokio::test]
async fn e2e_memory_loop_fail_fast_when_configured() {
    let mut config = AppConfig::default();
    config.memory.unknown_tool = UnknownToolPolicy::FailFast;

    let model = Arc::new(ScriptedModel::new(&["Action: lookup[cap]"]));
    let run = ReactAgent::memory_from_config(model, tools(), &config)
        .run_with_memory("Explain CAP", &LongTermMemory::new())
        .await
        .unwrap();
    assert_eq!(
        run.failure(),
        Some(&FailureReason::UnknownTool("lookup".into()))
    );
}

#[test]
fn e2e_assembler_sections_follow_memory_contents() {
    let mut short_term = ShortTermMemory::new();
    short_term.record("Thought: add", "calculator[1+1]", "2");

    let empty = LongTermMemory::new();
    let ctx = MemoryAssembler::new(&empty).build_context("q", &short_term);
    assert!(!ctx.contains("Relevant past knowledge"));
    assert!(ctx.contains("Current task history"));

    let facts = LongTermMemory::from_facts(["one fact"]);
    let ctx = MemoryAssembler::new(&facts).build_context("q", &ShortTermMemory::new());
    assert!(ctx.contains("Relevant past knowledge"));
    assert!(!ctx.contains("Current task history"));
}

// ── E2E: Plan/Execute Workflow ───────────────────────────────────────────

#[tokio::test]
async fn e2e_workflow_single_calculator_step() {
    let model = Arc::new(ScriptedModel::new(&[
        r#"{"goal":"G","steps":[{"id":1,"action":"calculator","input":"2+2"}]}"#,
    ]));
    let run = Workflow::from_config(model.clone(), tools(), &AppConfig::default())
        .run("Add two and two")
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&run.result).unwrap(),
        json!({
            "goal": "G",
            "steps": [{"step_id": 1, "action": "calculator", "input": "2+2", "output": 4}]
        })
    );
    assert_eq!(model.calls(), 1);
    assert!(model.request(0).system_prompt.contains("- calculator: "));
}

#[tokio::test]
async fn e2e_workflow_mixed_tools_and_input_shapes() {
    let model = Arc::new(ScriptedModel::new(&[
        r#"
        {"goal": "Calculate 6 * 7 and explain CAP theorem.",
         "steps": [
            {"id": 1, "action": "calculator", "input": {"expression": "6 * 7"}},
            {"id": "explain", "action": "knowledge_base", "input": "cap"}
         ]}
        "#,
    ]));
    let run = Workflow::from_config(model, tools(), &AppConfig::default())
        .run("Calculate 6 * 7 and explain CAP theorem.")
        .await
        .unwrap();

    let steps = &run.result.steps;
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].output, json!(42));
    assert_eq!(serde_json::to_value(&steps[1].step_id).unwrap(), json!("explain"));
    assert!(steps[1].output.as_str().unwrap().starts_with("CAP theorem"));
}

#[tokio::test]
async fn e2e_workflow_unknown_tool_aborts_without_partial_result() {
    let model = Arc::new(ScriptedModel::new(&[
        r#"{"goal":"G","steps":[{"id":1,"action":"calculator","input":"1+1"},{"id":2,"action":"lookup","input":"cap"},{"id":3,"action":"calculator","input":"2+2"}]}"#,
    ]));
    let err = Workflow::from_config(model, tools(), &AppConfig::default())
        .run("g")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Tool(ToolError::NotFound(ref name)) if name == "lookup"));
}

#[tokio::test]
async fn e2e_workflow_malformed_plan() {
    let model = Arc::new(ScriptedModel::new(&["I would first add the numbers, then..."]));
    let err = Workflow::from_config(model.clone(), tools(), &AppConfig::default())
        .run("g")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedPlan(_)));
    assert!(err.to_string().starts_with("Malformed plan"));
    assert_eq!(model.calls(), 1);
}

// ── E2E: Tool Registry ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_registry_add_and_lookup() {
    let mut registry = ToolRegistry::new();
    registry
        .register(
            "lookup",
            "Look something up",
            Arc::new(FnTool::new("lookup", "Look something up", |_| Ok(json!("x")))),
        )
        .unwrap();
    registry
        .register(
            "add",
            "Add numbers",
            Arc::new(FnTool::new("add", "Add numbers", |_| Ok(json!(3)))),
        )
        .unwrap();

    assert!(registry.get("subtract").is_none());
    let names: Vec<&str> = registry.list().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"add") && names.contains(&"lookup"));
    assert_eq!(registry.call("add", json!("1 2")).await.unwrap(), json!(3));
}

#[test]
fn e2e_registry_duplicate_policies() {
    let mut replace = registry_with_policy(DuplicatePolicy::Replace).unwrap();
    replace
        .register_tool(Arc::new(toolloop_tools::CalculatorTool))
        .unwrap();
    assert_eq!(replace.len(), 2);

    let mut reject = registry_with_policy(DuplicatePolicy::Reject).unwrap();
    let err = reject
        .register_tool(Arc::new(toolloop_tools::CalculatorTool))
        .unwrap_err();
    assert!(matches!(err, ToolError::AlreadyRegistered(ref name) if name == "calculator"));
}

// ── E2E: Action Parser ───────────────────────────────────────────────────

#[test]
fn e2e_parser_contract() {
    let action = parse_action("Thought: x\nAction: knowledge_base[raft]").unwrap();
    assert_eq!((action.tool.as_str(), action.input.as_str()), ("knowledge_base", "raft"));
    assert!(parse_action("no action here").is_none());
    assert!(parse_action("Action: ").is_none());
}

// ── E2E: Configuration System ────────────────────────────────────────────

#[test]
fn e2e_config_defaults_and_validation() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.default_model, "gpt-4o-mini");
    assert_eq!(config.react.max_steps, 5);
    assert_eq!(config.react.unknown_tool, UnknownToolPolicy::FailFast);
    assert_eq!(config.memory.unknown_tool, UnknownToolPolicy::SkipUnknown);
    assert_eq!(config.memory.max_tokens, 400);
    assert_eq!(config.tools.on_duplicate, DuplicatePolicy::Replace);

    let mut bad = AppConfig::default();
    bad.react.max_steps = 0;
    assert!(bad.validate().is_err());
}
