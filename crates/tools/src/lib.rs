//! Built-in tool implementations for toolloop.
//!
//! Both tools are pure and deterministic: the same input always yields the
//! same output and nothing outside the process is touched.

pub mod calculator;
pub mod knowledge_base;

use std::sync::Arc;
use toolloop_core::error::ToolError;
use toolloop_core::policy::DuplicatePolicy;
use toolloop_core::tool::{Tool, ToolRegistry};

pub use calculator::CalculatorTool;
pub use knowledge_base::KnowledgeBaseTool;

/// Create a registry holding `calculator` and `knowledge_base`.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::with_policy(DuplicatePolicy::Replace);
    for tool in builtins() {
        registry.upsert_tool(tool);
    }
    registry
}

/// Create a registry with the built-in tools under a specific duplicate policy.
pub fn registry_with_policy(policy: DuplicatePolicy) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::with_policy(policy);
    register_builtins(&mut registry)?;
    Ok(registry)
}

fn register_builtins(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    for tool in builtins() {
        registry.register_tool(tool)?;
    }
    Ok(())
}

fn builtins() -> [Arc<dyn Tool>; 2] {
    [Arc::new(CalculatorTool), Arc::new(KnowledgeBaseTool::new())]
}

/// Extract the text argument of a tool call.
///
/// Accepts a bare JSON string (the ReAct bracket text) or an object holding
/// the text under `key` (the shape planners tend to produce). Surrounding
/// whitespace and one pair of matching quotes are stripped.
pub(crate) fn text_argument(
    tool_name: &str,
    input: &serde_json::Value,
    key: &str,
) -> Result<String, ToolError> {
    let raw = match input {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(map) => map.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
            ToolError::InvalidInput {
                tool_name: tool_name.into(),
                reason: format!("missing '{key}' field"),
            }
        })?,
        other => {
            return Err(ToolError::InvalidInput {
                tool_name: tool_name.into(),
                reason: format!("expected a string, got {other}"),
            });
        }
    };

    let trimmed = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);
    Ok(unquoted.to_string())
}
