use crate::diagnostics::Diagnostics;
use crate::provider::ProviderData;
use crate::resource::DataSource;
use crate::response::Response;
use async_trait::async_trait;
use flows_api::InstallationVersionQuery;
use serde::{Deserialize, Serialize};

/// `flows_app_installation_version`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstallationVersionModel {
    #[serde(default)]
    pub registry: Option<String>,
    pub app_name: String,
    /// Latest when unset
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub custom: Option<bool>,
    /// Computed, usable as `app.version_id` of an installation
    #[serde(default)]
    pub app_version_id: Option<String>,
}

impl AppInstallationVersionModel {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    fn query(&self) -> InstallationVersionQuery {
        InstallationVersionQuery {
            registry: self.registry.clone().filter(|r| !r.is_empty()),
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone().filter(|v| !v.is_empty()),
            custom: self.custom.unwrap_or(false),
        }
    }
}

/// Resolves the app version id for an installation, custom apps included
#[derive(Clone)]
pub struct AppInstallationVersionDataSource {
    data: ProviderData,
}

impl AppInstallationVersionDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for AppInstallationVersionDataSource {
    type Model = AppInstallationVersionModel;

    fn type_name(&self) -> &'static str {
        "flows_app_installation_version"
    }

    /// Custom apps are not published to a registry.
    fn validate(&self, config: &Self::Model) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let has_registry = config.registry.as_deref().is_some_and(|r| !r.is_empty());
        if config.custom == Some(true) && has_registry {
            diagnostics.add_attribute_error(
                "registry",
                "Invalid configuration",
                "`registry` can only be specified when `custom` is false.",
            );
        }
        diagnostics
    }

    async fn read(&self, config: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .get_installation_version_id(&config.query())
            .await
        {
            Ok(id) => Response::recorded(AppInstallationVersionModel {
                app_version_id: Some(id),
                ..config
            }),
            Err(err) => Response::client_error("Unable to fetch app version id", &err),
        }
    }
}
