//! Provider configuration and handler registry

use crate::data_sources::{AppInstallationVersionDataSource, AppVersionDataSource};
use crate::diagnostics::Diagnostics;
use crate::resources::{
    AppInstallationConfigFieldResource, AppInstallationConfirmationResource,
    AppInstallationResource, AppInstallationWaitForReadyResource, EntityConfirmationResource,
    FlowResource, SecretResource,
};
use flows_api::FlowsClient;
use flows_config::{ConfigError, ProviderConfig};
use flows_core::Poller;

/// Type name prefix of every resource and data source
pub const PROVIDER_TYPE_NAME: &str = "flows";

pub const RESOURCE_TYPES: [&str; 8] = [
    "flows_flow",
    "flows_entity_confirmation",
    "flows_entity_lifecycle_confirmation",
    "flows_app_installation",
    "flows_app_installation_confirmation",
    "flows_app_installation_wait_for_ready",
    "flows_app_installation_config_field",
    "flows_secret",
];

pub const DATA_SOURCE_TYPES: [&str; 2] = [
    "flows_app_version",
    "flows_app_installation_version",
];

/// What every handler needs: an API client and a poller
#[derive(Clone)]
pub struct ProviderData {
    pub client: FlowsClient,
    pub poller: Poller,
}

impl ProviderData {
    pub fn new(client: FlowsClient, poller: Poller) -> Self {
        Self { client, poller }
    }
}

/// Configured Flows provider
#[derive(Clone)]
pub struct FlowsProvider {
    version: String,
    data: ProviderData,
}

impl FlowsProvider {
    /// Resolve endpoint and token, reporting problems as diagnostics.
    pub fn configure(
        version: impl Into<String>,
        endpoint: Option<String>,
        token: Option<String>,
    ) -> Result<Self, Diagnostics> {
        match ProviderConfig::resolve(endpoint, token) {
            Ok(config) => Ok(Self::from_config(version, config)),
            Err(err) => {
                let mut diagnostics = Diagnostics::new();
                let summary = match &err {
                    ConfigError::MissingToken => "Missing FLOWS_TOKEN environment variable.",
                    ConfigError::MissingEndpoint | ConfigError::InvalidEndpoint { .. } => {
                        "Invalid endpoint URL."
                    }
                    _ => "Invalid provider configuration.",
                };
                diagnostics.add_error(summary, err.to_string());
                Err(diagnostics)
            }
        }
    }

    pub fn from_config(version: impl Into<String>, config: ProviderConfig) -> Self {
        Self {
            version: version.into(),
            data: ProviderData::new(FlowsClient::new(config), Poller::new()),
        }
    }

    /// Replace the poller, e.g. to attach a cancel signal.
    pub fn with_poller(mut self, poller: Poller) -> Self {
        self.data.poller = poller;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn data(&self) -> &ProviderData {
        &self.data
    }

    pub fn client(&self) -> &FlowsClient {
        &self.data.client
    }

    pub fn flow(&self) -> FlowResource {
        FlowResource::new(self.data.clone())
    }

    pub fn entity_confirmation(&self) -> EntityConfirmationResource {
        EntityConfirmationResource::entity(self.data.clone())
    }

    pub fn entity_lifecycle_confirmation(&self) -> EntityConfirmationResource {
        EntityConfirmationResource::entity_lifecycle(self.data.clone())
    }

    pub fn app_installation(&self) -> AppInstallationResource {
        AppInstallationResource::new(self.data.clone())
    }

    pub fn app_installation_confirmation(&self) -> AppInstallationConfirmationResource {
        AppInstallationConfirmationResource::new(self.data.clone())
    }

    pub fn app_installation_wait_for_ready(&self) -> AppInstallationWaitForReadyResource {
        AppInstallationWaitForReadyResource::new(self.data.clone())
    }

    pub fn app_installation_config_field(&self) -> AppInstallationConfigFieldResource {
        AppInstallationConfigFieldResource::new(self.data.clone())
    }

    pub fn secret(&self) -> SecretResource {
        SecretResource::new(self.data.clone())
    }

    pub fn app_version(&self) -> AppVersionDataSource {
        AppVersionDataSource::new(self.data.clone())
    }

    pub fn app_installation_version(&self) -> AppInstallationVersionDataSource {
        AppInstallationVersionDataSource::new(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{DataSource, Resource};
    use serial_test::serial;

    fn provider() -> FlowsProvider {
        FlowsProvider::from_config("test", ProviderConfig::new("useflows.eu", "t").unwrap())
    }

    #[test]
    fn test_registry_matches_handlers() {
        let provider = provider();
        let names = [
            provider.flow().type_name(),
            provider.entity_confirmation().type_name(),
            provider.entity_lifecycle_confirmation().type_name(),
            provider.app_installation().type_name(),
            provider.app_installation_confirmation().type_name(),
            provider.app_installation_wait_for_ready().type_name(),
            provider.app_installation_config_field().type_name(),
            provider.secret().type_name(),
        ];
        assert_eq!(names, RESOURCE_TYPES);
        let data_sources = [
            provider.app_version().type_name(),
            provider.app_installation_version().type_name(),
        ];
        assert_eq!(data_sources, DATA_SOURCE_TYPES);

        for name in RESOURCE_TYPES.iter().chain(DATA_SOURCE_TYPES.iter()) {
            assert!(name.starts_with(PROVIDER_TYPE_NAME));
        }
    }

    #[test]
    #[serial]
    fn test_configure_without_token() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "{}").unwrap();

        temp_env::with_vars(
            [
                ("FLOWS_TOKEN", None),
                ("FLOWS_CONFIG_PATH", Some(config_path.to_str().unwrap())),
            ],
            || {
                let diags = FlowsProvider::configure("test", Some("useflows.eu".into()), None)
                    .err()
                    .unwrap();
                let diag = diags.errors().next().unwrap();
                assert_eq!(diag.summary, "Missing FLOWS_TOKEN environment variable.");
            },
        );
    }

    #[test]
    #[serial]
    fn test_configure_normalizes_endpoint() {
        temp_env::with_var("FLOWS_TOKEN", Some("env-token"), || {
            let provider =
                FlowsProvider::configure("1.2.3", Some("useflows.us/".into()), None).unwrap();
            assert_eq!(provider.client().config().endpoint(), "https://useflows.us");
            assert_eq!(provider.client().config().token(), "env-token");
            assert_eq!(provider.version(), "1.2.3");
        });
    }
}
