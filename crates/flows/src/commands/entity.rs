use crate::output;
use flows_core::{EntityKind, confirm as confirm_entity};
use flows_provider::FlowsProvider;

pub async fn status(provider: &FlowsProvider, id: &str) -> anyhow::Result<()> {
    let status = provider.client().get_entity_lifecycle_status(id).await?;
    output::print_status(EntityKind::Entity.title(), id, &status);
    Ok(())
}

pub async fn confirm(provider: &FlowsProvider, id: &str, wait: bool) -> anyhow::Result<()> {
    let api = provider.client().entity_lifecycles(EntityKind::Entity);
    let confirmation = confirm_entity(&api, &provider.data().poller, id, wait).await?;
    output::print_confirmation(EntityKind::Entity.title(), id, &confirmation);
    Ok(())
}
