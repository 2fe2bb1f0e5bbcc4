//! Tool trait and registry: the capabilities a reasoning loop can dispatch to.
//!
//! A tool takes a single JSON input and returns a JSON output. The ReAct
//! loop hands tools the raw bracket text from `Action: name[input]` as a
//! JSON string; plans may hand them any JSON value.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::ToolError;
use crate::policy::DuplicatePolicy;

/// The core Tool trait.
///
/// Each capability (calculator, knowledge base, ...) implements this
/// trait. Tools are registered in the [`ToolRegistry`] and dispatched by
/// identifier.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The identifier the model uses to invoke this tool (e.g. "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (shown to the model).
    fn description(&self) -> &str;

    /// Invoke the tool.
    async fn call(&self, input: Value) -> Result<Value, ToolError>;
}

/// Adapter turning a plain closure into a [`Tool`].
pub struct FnTool<F> {
    name: String,
    description: String,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(Value) -> Result<Value, ToolError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(Value) -> Result<Value, ToolError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn call(&self, input: Value) -> Result<Value, ToolError> {
        (self.func)(input)
    }
}

/// A registered tool: identifier, description, and the callable.
#[derive(Clone)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    pub tool: Arc<dyn Tool>,
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Identifier and description only; safe to put into a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

/// A registry of available tools.
///
/// Entries are kept in registration order so the catalogue shown to the
/// model is stable. Lookups of unknown identifiers return `None`.
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
    on_duplicate: DuplicatePolicy,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create a registry with an explicit duplicate-registration policy.
    pub fn with_policy(on_duplicate: DuplicatePolicy) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            on_duplicate,
        }
    }

    /// Register `capability` under `name`.
    ///
    /// With [`DuplicatePolicy::Replace`] an existing entry is overwritten in
    /// place; with [`DuplicatePolicy::Reject`] the call fails and the
    /// registry is left untouched.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        capability: Arc<dyn Tool>,
    ) -> Result<(), ToolError> {
        let entry = ToolEntry {
            name: name.into(),
            description: description.into(),
            tool: capability,
        };

        if self.on_duplicate == DuplicatePolicy::Reject && self.index.contains_key(&entry.name) {
            return Err(ToolError::AlreadyRegistered(entry.name));
        }
        self.upsert(entry);
        Ok(())
    }

    /// Register a tool under its own name and description.
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        let description = tool.description().to_string();
        self.register(name, description, tool)
    }

    /// Register a tool under its own name, replacing any entry with that
    /// name whatever the duplicate policy. Cannot fail.
    pub fn upsert_tool(&mut self, tool: Arc<dyn Tool>) {
        self.upsert(ToolEntry {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            tool,
        });
    }

    fn upsert(&mut self, entry: ToolEntry) {
        match self.index.get(&entry.name) {
            Some(&pos) => {
                warn!(tool = %entry.name, "Replacing already registered tool");
                self.entries[pos] = entry;
            }
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Get a tool entry by identifier.
    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All entries, in registration order.
    pub fn list(&self) -> &[ToolEntry] {
        &self.entries
    }

    /// Identifier → description pairs, without the callables.
    pub fn list_summaries(&self) -> Vec<ToolSummary> {
        self.entries
            .iter()
            .map(|e| ToolSummary {
                name: e.name.clone(),
                description: e.description.clone(),
            })
            .collect()
    }

    /// Render the tool catalogue as `- name: description` lines.
    pub fn catalogue(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("- {}: {}", e.name, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Resolve and invoke a tool.
    pub async fn call(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let entry = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        entry.tool.call(input).await
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a tool output as observation text.
///
/// Strings are used verbatim; any other JSON value is serialized compactly.
pub fn render_output(output: &Value) -> String {
    match output {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
