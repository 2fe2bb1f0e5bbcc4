//! Action parser: pulls `Action: tool_name[input]` out of model text.
//!
//! Grammar: the literal `Action:`, optional whitespace, an identifier of
//! Unicode word characters, then a bracketed argument. The argument runs greedily
//! to the last `]` on that line, so nested brackets survive intact.
//! Only the first match counts. No match is `None`, not an error, and the
//! identifier is not checked against any registry here.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ACTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Action:\s*(\w+)\[(.*)\]").expect("action pattern is a valid regex")
});

/// A tool invocation extracted from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAction {
    /// Tool identifier as written by the model.
    pub tool: String,
    /// Raw text between the brackets, untrimmed.
    pub input: String,
}

impl ParsedAction {
    /// The `tool[input]` form used in transcripts.
    pub fn descriptor(&self) -> String {
        format!("{}[{}]", self.tool, self.input)
    }
}

/// Extract the first action clause from `text`.
pub fn parse_action(text: &str) -> Option<ParsedAction> {
    let caps = ACTION_PATTERN.captures(text)?;
    Some(ParsedAction {
        tool: caps.get(1)?.as_str().to_string(),
        input: caps.get(2)?.as_str().to_string(),
    })
}
