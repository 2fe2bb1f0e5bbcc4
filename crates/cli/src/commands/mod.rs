//! Subcommand implementations and the wiring they share.

pub mod config_cmd;
pub mod memory;
pub mod plan;
pub mod react;
pub mod tools;

use std::path::Path;
use std::sync::Arc;
use toolloop_config::AppConfig;
use toolloop_core::error::ToolError;
use toolloop_core::tool::ToolRegistry;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> toolloop_core::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_with_overrides(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

/// The built-in tools under the configured duplicate policy.
pub fn build_registry(config: &AppConfig) -> Result<Arc<ToolRegistry>, ToolError> {
    toolloop_tools::registry_with_policy(config.tools.on_duplicate).map(Arc::new)
}

/// Explain how to set a key, then fail.
fn missing_api_key() -> Box<dyn std::error::Error> {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    TOOLLOOP_API_KEY=sk-...");
    eprintln!("    OPENAI_API_KEY=sk-...");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    "No API key found. See above for setup instructions.".into()
}

/// Build the configured model invoker.
pub fn build_invoker(
    config: &AppConfig,
) -> Result<Arc<dyn toolloop_core::ModelInvoker>, Box<dyn std::error::Error>> {
    if !config.has_api_key() {
        return Err(missing_api_key());
    }
    Ok(toolloop_providers::build_from_config(config)?)
}
