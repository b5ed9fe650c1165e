use crate::output;
use colored::Colorize;
use flows_provider::{AppInstallationVersionModel, AppVersionModel, DataSource, FlowsProvider};

/// Registry apps go through `flows_app_version`, custom apps through
/// `flows_app_installation_version`.
pub async fn handle(
    provider: &FlowsProvider,
    name: String,
    version: Option<String>,
    registry: Option<String>,
    custom: bool,
) -> anyhow::Result<()> {
    let id = if custom {
        let source = provider.app_installation_version();
        let config = AppInstallationVersionModel {
            registry,
            app_version: version,
            custom: Some(true),
            ..AppInstallationVersionModel::new(name)
        };

        output::finish(&source.validate(&config), "Validation")?;

        let response = source.read(config).await;
        output::finish(&response.diagnostics, "Lookup")?;
        response.model().and_then(|model| model.app_version_id.clone())
    } else {
        let source = provider.app_version();
        let config = AppVersionModel {
            registry,
            version,
            ..AppVersionModel::new(name)
        };

        let response = source.read(config).await;
        output::finish(&response.diagnostics, "Lookup")?;
        response.model().and_then(|model| model.id.clone())
    };

    match id {
        Some(id) => {
            println!("{}", id.green());
            Ok(())
        }
        None => anyhow::bail!("no app version id returned"),
    }
}
