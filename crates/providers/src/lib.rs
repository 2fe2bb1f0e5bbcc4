//! Model invoker implementations for toolloop.
//!
//! All invokers implement `toolloop_core::ModelInvoker`.

pub mod openai_compat;

use std::sync::Arc;
use toolloop_config::AppConfig;
use toolloop_core::error::ProviderError;
use toolloop_core::invoker::ModelInvoker;

pub use openai_compat::OpenAiCompatInvoker;

/// Build the configured invoker.
///
/// Fails with `NotConfigured` when no API key is available from the config
/// file or the environment.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn ModelInvoker>, ProviderError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(
            "no API key: set TOOLLOOP_API_KEY or OPENAI_API_KEY, or api_key in config.toml".into(),
        )
    })?;

    Ok(Arc::new(OpenAiCompatInvoker::new(
        "openai",
        &config.api_url,
        api_key,
    )))
}
