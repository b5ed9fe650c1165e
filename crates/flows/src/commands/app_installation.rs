use crate::output;
use colored::Colorize;
use flows_core::{EntityKind, confirm as confirm_installation, wait_until_ready};
use flows_provider::{FlowsProvider, ImportState, Resource};

const LABEL: &str = EntityKind::AppInstallation.title();

pub async fn status(provider: &FlowsProvider, id: &str) -> anyhow::Result<()> {
    let status = provider.client().get_installation_status(id).await?;
    output::print_status(LABEL, id, &status);
    Ok(())
}

pub async fn confirm(provider: &FlowsProvider, id: &str, wait: bool) -> anyhow::Result<()> {
    let api = provider.client().app_installations();
    let confirmation = confirm_installation(&api, &provider.data().poller, id, wait).await?;
    output::print_confirmation(LABEL, id, &confirmation);
    Ok(())
}

pub async fn wait(provider: &FlowsProvider, id: &str) -> anyhow::Result<()> {
    let api = provider.client().app_installations();
    let status = wait_until_ready(&api, &provider.data().poller, id).await?;
    output::print_status(LABEL, id, &status);
    Ok(())
}

/// Delete through the resource handler so the deletion wait and its
/// diagnostics match what a destroy would do.
pub async fn delete(provider: &FlowsProvider, id: &str) -> anyhow::Result<()> {
    let resource = provider.app_installation();

    let imported = resource.import_state(id);
    let Some(state) = imported.model().cloned() else {
        return output::finish(&imported.diagnostics, "Import");
    };

    let response = resource.delete(state).await;
    output::finish(&response.diagnostics, "Delete")?;

    println!("{} {} {} deleted", "✓".green(), LABEL, id.cyan());
    Ok(())
}
