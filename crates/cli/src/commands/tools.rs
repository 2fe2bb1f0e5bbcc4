//! `toolloop tools`: List the registered tools.

use toolloop_config::AppConfig;
use toolloop_core::tool::ToolRegistry;

pub fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = super::build_registry(config)?;
    print!("{}", render(&registry));
    Ok(())
}

pub fn render(registry: &ToolRegistry) -> String {
    format!(
        "🔧 {} tools available\n\n{}\n",
        registry.len(),
        registry.catalogue()
    )
}
