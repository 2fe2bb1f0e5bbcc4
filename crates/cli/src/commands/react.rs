//! `toolloop react`: Answer a question with the ReAct loop.

use std::fmt::Write as _;
use toolloop_agent::{ReactAgent, ReactRun};
use toolloop_config::AppConfig;

pub async fn run(
    config: &AppConfig,
    question: &str,
    max_steps: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let invoker = super::build_invoker(config)?;
    let tools = super::build_registry(config)?;

    let mut agent = ReactAgent::from_config(invoker, tools, config);
    if let Some(max) = max_steps {
        agent = agent.with_max_steps(max);
    }

    let run = agent.run(question).await?;
    print!("{}", render(&run));
    Ok(())
}

/// Human-readable rendering of a finished run: each step, then the outcome.
pub fn render(run: &ReactRun) -> String {
    let mut out = String::new();

    for (i, step) in run.steps.steps().iter().enumerate() {
        let _ = writeln!(out, "── Step {} ──", i + 1);
        for line in step.thought.trim().lines() {
            let _ = writeln!(out, "  {line}");
        }
        let _ = writeln!(out, "  Observation: {}", step.observation);
        out.push('\n');
    }

    let _ = writeln!(out, "{}", run.state);
    let _ = writeln!(
        out,
        "(run {}, {} model calls, {} tool steps)",
        run.run_id,
        run.model_calls,
        run.steps.len()
    );
    out
}
