//! `toolloop memory`: ReAct with long-term facts and step history.
//!
//! Facts come from `[memory].facts` in the config plus every `--fact`
//! flag, in that order. They live only for this invocation.

use toolloop_agent::{LongTermMemory, ReactAgent};
use toolloop_config::AppConfig;

pub async fn run(
    config: &AppConfig,
    question: &str,
    facts: Vec<String>,
    max_steps: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let invoker = super::build_invoker(config)?;
    let tools = super::build_registry(config)?;
    let long_term = seed_memory(config, facts);

    let mut agent = ReactAgent::memory_from_config(invoker, tools, config);
    if let Some(max) = max_steps {
        agent = agent.with_max_steps(max);
    }

    if !long_term.is_empty() {
        println!("🧠 {} long-term facts loaded", long_term.len());
        println!();
    }

    let run = agent.run_with_memory(question, &long_term).await?;
    print!("{}", super::react::render(&run));
    Ok(())
}

/// Configured facts followed by the command-line ones.
pub fn seed_memory(config: &AppConfig, extra: Vec<String>) -> LongTermMemory {
    let mut memory = LongTermMemory::from_facts(config.memory.facts.iter().cloned());
    for fact in extra {
        memory.store(fact);
    }
    memory
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_facts_come_first() {
        let mut config = AppConfig::default();
        config.memory.facts = vec!["from config".into()];
        let memory = seed_memory(&config, vec!["from flag".into()]);
        assert_eq!(memory.retrieve(), "from config\nfrom flag");
    }

    #[test]
    fn no_facts_is_empty() {
        assert!(seed_memory(&AppConfig::default(), vec![]).is_empty());
    }
}
