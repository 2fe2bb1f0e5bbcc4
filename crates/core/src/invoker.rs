//! Model invoker trait: the abstraction over language-model backends.
//!
//! The reasoning engines only ever send one system prompt and one user
//! prompt and read back the completion text. Transport concerns (HTTP,
//! auth, timeouts) live in the implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The model to use (e.g. "gpt-4o-mini")
    pub model: String,

    /// Protocol description, tool catalogue, rules
    pub system_prompt: String,

    /// The question plus whatever history the caller assembled
    pub user_prompt: String,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    300
}

impl ModelRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// The core model invoker trait.
///
/// Every backend (OpenAI-compatible HTTP, scripted test doubles) implements
/// this. Failures are returned to the caller; engines never retry.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// A human-readable name for this invoker (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a request and return the completion text.
    async fn execute(&self, request: ModelRequest) -> Result<String, ProviderError>;
}
