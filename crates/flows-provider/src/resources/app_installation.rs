use crate::diagnostics::Diagnostics;
use crate::provider::ProviderData;
use crate::resource::{ImportState, Resource};
use crate::response::Response;
use async_trait::async_trait;
use flows_api::{AppRef, CreateInstallationRequest, Installation, StyleOverride};
use flows_core::{EntityKind, Intent, issue_confirm, wait_for_deleted, wait_until_ready};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn enabled() -> bool {
    true
}

/// App version an installation runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppModel {
    pub version_id: String,
    #[serde(default)]
    pub custom: bool,
}

impl From<&AppModel> for AppRef {
    fn from(app: &AppModel) -> Self {
        AppRef {
            version_id: app.version_id.clone(),
            custom: app.custom,
        }
    }
}

impl From<AppRef> for AppModel {
    fn from(app: AppRef) -> Self {
        AppModel {
            version_id: app.version_id,
            custom: app.custom,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOverrideModel {
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<&StyleOverrideModel> for StyleOverride {
    fn from(style: &StyleOverrideModel) -> Self {
        StyleOverride {
            icon_url: style.icon_url.clone(),
            color: style.color.clone(),
        }
    }
}

impl From<StyleOverride> for StyleOverrideModel {
    fn from(style: StyleOverride) -> Self {
        let style = style.normalized();
        StyleOverrideModel {
            icon_url: style.icon_url,
            color: style.color,
        }
    }
}

/// `flows_app_installation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstallationModel {
    pub project_id: String,
    /// Assigned by the server on create
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub app: AppModel,
    #[serde(default)]
    pub config_fields: BTreeMap<String, String>,
    #[serde(default = "enabled")]
    pub confirm: bool,
    #[serde(default = "enabled")]
    pub wait_for_ready: bool,
    #[serde(default)]
    pub style_override: Option<StyleOverrideModel>,
}

impl AppInstallationModel {
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        version_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            id: None,
            name: name.into(),
            app: AppModel {
                version_id: version_id.into(),
                custom: false,
            },
            config_fields: BTreeMap::new(),
            confirm: true,
            wait_for_ready: true,
            style_override: None,
        }
    }

    fn refresh_from(&mut self, installation: Installation) {
        self.name = installation.name;
        self.app = installation.app.into();
        self.style_override = installation.style_override.map(StyleOverrideModel::from);

        // Keys the configuration never mentioned stay untracked
        let mut server_fields = installation.config_fields;
        self.config_fields = self
            .config_fields
            .keys()
            .filter_map(|key| server_fields.remove_entry(key))
            .collect();
    }
}

/// Config update from `current` to `desired`; dropped keys are cleared.
fn config_changes(
    current: &BTreeMap<String, String>,
    desired: &BTreeMap<String, String>,
) -> BTreeMap<String, Option<String>> {
    let mut changes: BTreeMap<String, Option<String>> = desired
        .iter()
        .map(|(key, value)| (key.clone(), Some(value.clone())))
        .collect();

    for key in current.keys() {
        if !desired.contains_key(key) {
            changes.insert(key.clone(), None);
        }
    }

    changes
}

/// An installation of an app version in a project
#[derive(Clone)]
pub struct AppInstallationResource {
    data: ProviderData,
}

impl AppInstallationResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }

    /// Confirm (when asked) and wait for readiness (when asked).
    ///
    /// Errors land in `diagnostics`; nothing here touches the stored state.
    async fn settle(
        &self,
        id: &str,
        confirm_now: bool,
        confirm: bool,
        wait_for_ready: bool,
        diagnostics: &mut Diagnostics,
    ) {
        if confirm_now {
            let api = self.data.client.app_installations();
            if let Err(err) = issue_confirm(&api, id).await {
                diagnostics.add_client_error(
                    &format!("Unable to confirm app installation {:?}", id),
                    &err,
                );
                return;
            }
        }

        if !wait_for_ready {
            return;
        }

        if !confirm {
            diagnostics.add_warning(
                "Invalid Configuration",
                r#""wait_for_ready" is true but "confirm" is false. Skipping wait for ready."#,
            );
            return;
        }

        let api = self.data.client.app_installations();
        if let Err(err) = wait_until_ready(&api, &self.data.poller, id).await {
            diagnostics.add_settlement_error(
                EntityKind::AppInstallation,
                Intent::Confirmation,
                "Unable to wait for app installation",
                &err,
            );
        }
    }
}

fn missing_id<M>() -> Response<M> {
    Response::error(
        "Missing App Installation ID",
        "The app installation has no ID in state. Please import or recreate it.",
    )
}

#[async_trait]
impl Resource for AppInstallationResource {
    type Model = AppInstallationModel;

    fn type_name(&self) -> &'static str {
        "flows_app_installation"
    }

    fn validate(&self, config: &Self::Model) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        if config.wait_for_ready && !config.confirm {
            diagnostics.add_attribute_error(
                "wait_for_ready",
                "Invalid configuration",
                r#""wait_for_ready" can only be true when "confirm" is true."#,
            );
        }
        diagnostics
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        let request = CreateInstallationRequest {
            project_id: plan.project_id.clone(),
            name: plan.name.clone(),
            app: AppRef::from(&plan.app),
            style_override: plan.style_override.as_ref().map(StyleOverride::from),
        };

        let created = match self.data.client.create_installation(&request).await {
            Ok(created) => created,
            Err(err) => return Response::client_error("Unable to create app installation", &err),
        };
        let id = created.id;
        tracing::info!(app_installation_id = %id, draft = created.draft, "Created app installation");

        let mut response = Response::recorded(AppInstallationModel {
            id: Some(id.clone()),
            ..plan.clone()
        });

        if !plan.config_fields.is_empty() {
            let changes = config_changes(&BTreeMap::new(), &plan.config_fields);
            if let Err(err) = self
                .data
                .client
                .update_installation_config(&id, &changes)
                .await
            {
                response
                    .diagnostics
                    .add_client_error("Unable to update app installation config", &err);
                return response;
            }
        }

        self.settle(
            &id,
            plan.confirm,
            plan.confirm,
            plan.wait_for_ready,
            &mut response.diagnostics,
        )
        .await;

        response
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        let Some(id) = state.id.clone() else {
            return missing_id();
        };

        match self.data.client.get_installation(&id).await {
            Ok(installation) => {
                let mut model = state;
                model.refresh_from(installation);
                Response::recorded(model)
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(app_installation_id = %id, "App installation gone, removing");
                Response::removed()
            }
            Err(err) => Response::client_error("Unable to read app installation", &err),
        }
    }

    async fn update(&self, state: Self::Model, plan: Self::Model) -> Response<Self::Model> {
        let Some(id) = state.id.clone() else {
            return missing_id();
        };

        let mut model = AppInstallationModel {
            confirm: plan.confirm,
            wait_for_ready: plan.wait_for_ready,
            ..state
        };
        let mut response = Response::recorded(model.clone());
        let mut can_confirm = false;

        if model.name != plan.name || model.style_override != plan.style_override {
            let style = plan.style_override.as_ref().map(StyleOverride::from);
            match self
                .data
                .client
                .update_installation_metadata(&id, &plan.name, style.as_ref())
                .await
            {
                Ok(updated) => {
                    model.name = plan.name.clone();
                    model.style_override = plan.style_override.clone();
                    can_confirm = updated.draft;
                    response.record(model.clone());
                }
                Err(err) => {
                    response
                        .diagnostics
                        .add_client_error("Unable to update app installation metadata", &err);
                    return response;
                }
            }
        }

        if model.app != plan.app {
            match self
                .data
                .client
                .update_installation_version(&id, &AppRef::from(&plan.app))
                .await
            {
                Ok(updated) => {
                    model.app = plan.app.clone();
                    can_confirm = updated.draft;
                    response.record(model.clone());
                }
                Err(err) => {
                    response
                        .diagnostics
                        .add_client_error("Unable to update app installation version", &err);
                    return response;
                }
            }
        }

        if model.config_fields != plan.config_fields {
            let changes = config_changes(&model.config_fields, &plan.config_fields);
            match self
                .data
                .client
                .update_installation_config(&id, &changes)
                .await
            {
                Ok(updated) => {
                    model.config_fields = plan.config_fields.clone();
                    can_confirm = updated.draft;
                    response.record(model);
                }
                Err(err) => {
                    response
                        .diagnostics
                        .add_client_error("Unable to update app installation config", &err);
                    return response;
                }
            }
        }

        self.settle(
            &id,
            can_confirm && plan.confirm,
            plan.confirm,
            plan.wait_for_ready,
            &mut response.diagnostics,
        )
        .await;

        response
    }

    async fn delete(&self, state: Self::Model) -> Response<Self::Model> {
        let Some(id) = state.id else {
            return Response::removed();
        };

        if let Err(err) = self.data.client.delete_installation(&id).await {
            return Response::client_error("Unable to delete app installation", &err);
        }

        let records = self.data.client.app_installation_records();
        match wait_for_deleted(&records, &self.data.poller, &id).await {
            Ok(()) => Response::removed(),
            Err(err) => {
                let mut response = Response::new();
                response.diagnostics.add_settlement_error(
                    EntityKind::AppInstallation,
                    Intent::Deletion,
                    "Unable to wait for app installation deletion",
                    &err,
                );
                response
            }
        }
    }
}

impl ImportState for AppInstallationResource {
    fn import_state(&self, id: &str) -> Response<Self::Model> {
        Response::recorded(AppInstallationModel {
            id: Some(id.to_string()),
            ..AppInstallationModel::new("", "", "")
        })
    }
}
