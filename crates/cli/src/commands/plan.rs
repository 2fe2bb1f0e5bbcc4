//! `toolloop plan`: Plan a goal, execute it, print the result as JSON.

use toolloop_agent::Workflow;
use toolloop_config::AppConfig;

pub async fn run(config: &AppConfig, goal: &str) -> Result<(), Box<dyn std::error::Error>> {
    let invoker = super::build_invoker(config)?;
    let tools = super::build_registry(config)?;

    let run = Workflow::from_config(invoker, tools, config).run(goal).await?;

    tracing::debug!(
        goal = %run.plan.goal,
        steps = run.plan.steps.len(),
        "Executed plan"
    );
    println!("{}", serde_json::to_string_pretty(&run.result)?);
    Ok(())
}
