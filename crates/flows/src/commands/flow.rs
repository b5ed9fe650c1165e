use anyhow::Context;
use colored::Colorize;
use flows_api::FlowConfig;
use flows_provider::FlowsProvider;
use std::path::Path;

pub async fn plan(provider: &FlowsProvider, flow_id: &str, path: &Path) -> anyhow::Result<()> {
    let definition = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read definition file {}", path.display()))?;

    let changes = provider
        .client()
        .plan_flow_changes(&FlowConfig {
            flow_id,
            definition: &definition,
            app_installation_mapping: None,
        })
        .await?;

    if !changes.has_operations() {
        println!("{}", "No changes.".green());
        return Ok(());
    }

    println!(
        "{} {}",
        changes.plan.operations.len().to_string().yellow().bold(),
        "operation(s) planned".yellow()
    );
    if let Some(readable) = changes.readable_plan {
        println!();
        println!("{}", readable);
    }
    Ok(())
}
