//! `toolloop config`: Show the effective configuration.

use std::path::Path;
use toolloop_config::AppConfig;

pub fn run(config: &AppConfig, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let source = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"));

    println!("# source:  {}", source.display());
    println!(
        "# api key: {}",
        if config.has_api_key() { "set" } else { "not set" }
    );
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
