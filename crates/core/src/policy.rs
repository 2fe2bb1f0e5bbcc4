//! Named policies for the two ambiguous corners of the runtime.

use serde::{Deserialize, Serialize};

/// What the tool registry does when an identifier is registered twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Overwrite the existing entry in place (keeps its catalogue position).
    #[default]
    Replace,
    /// Refuse the second registration with `ToolError::AlreadyRegistered`.
    Reject,
}

/// What a reasoning loop does when the model names a tool that is not registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownToolPolicy {
    /// Terminate the run with `unknown tool: <id>`.
    #[default]
    FailFast,
    /// Log, record nothing, and spend the iteration.
    SkipUnknown,
}
