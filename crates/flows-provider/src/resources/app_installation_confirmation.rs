use crate::provider::ProviderData;
use crate::resource::Resource;
use crate::response::Response;
use async_trait::async_trait;
use flows_core::{EntityKind, EntityStatus, Intent, confirm_with_status};
use serde::{Deserialize, Serialize};

fn default_wait_for_ready() -> bool {
    true
}

/// `flows_app_installation_confirmation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstallationConfirmationModel {
    pub app_installation_id: String,
    #[serde(default)]
    pub status: Option<EntityStatus>,
    #[serde(default = "default_wait_for_ready")]
    pub wait_for_ready: bool,
}

impl AppInstallationConfirmationModel {
    pub fn new(app_installation_id: impl Into<String>) -> Self {
        Self {
            app_installation_id: app_installation_id.into(),
            status: None,
            wait_for_ready: true,
        }
    }
}

/// Confirms an app installation, optionally waiting until it is ready
#[derive(Clone)]
pub struct AppInstallationConfirmationResource {
    data: ProviderData,
}

impl AppInstallationConfirmationResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for AppInstallationConfirmationResource {
    type Model = AppInstallationConfirmationModel;

    fn type_name(&self) -> &'static str {
        "flows_app_installation_confirmation"
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        let id = plan.app_installation_id.clone();

        let initial_status = match self.data.client.get_installation_status(&id).await {
            Ok(status) => status,
            Err(err) if err.is_not_found() => {
                tracing::warn!(app_installation_id = %id, "App installation not found");
                return Response::removed();
            }
            Err(err) => {
                return Response::client_error("Unable to read app installation status", &err);
            }
        };

        let mut response = Response::recorded(AppInstallationConfirmationModel {
            status: Some(initial_status.clone()),
            ..plan.clone()
        });

        let api = self.data.client.app_installations();
        match confirm_with_status(
            &api,
            &self.data.poller,
            &id,
            initial_status,
            plan.wait_for_ready,
        )
        .await
        {
            Ok(confirmation) => response.record(AppInstallationConfirmationModel {
                status: Some(confirmation.status),
                ..plan
            }),
            Err(err) => response.diagnostics.add_settlement_error(
                EntityKind::AppInstallation,
                Intent::Confirmation,
                &format!("Unable to confirm app installation {:?}", id),
                &err,
            ),
        }

        response
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        read_installation_status(&self.data, state.app_installation_id.clone())
            .await
            .map(|status| AppInstallationConfirmationModel {
                status: Some(status),
                ..state
            })
    }

    async fn update(&self, _state: Self::Model, _plan: Self::Model) -> Response<Self::Model> {
        update_not_supported("app_installation_confirmation")
    }

    async fn delete(&self, _state: Self::Model) -> Response<Self::Model> {
        Response::removed()
    }
}

/// Status lookup shared by the status-only installation resources.
pub(super) async fn read_installation_status(
    data: &ProviderData,
    id: String,
) -> Response<EntityStatus> {
    match data.client.get_installation_status(&id).await {
        Ok(status) => Response::recorded(status),
        Err(err) if err.is_not_found() => {
            tracing::debug!(app_installation_id = %id, "App installation gone, removing");
            Response::removed()
        }
        Err(err) => Response::client_error("Unable to read app installation status", &err),
    }
}

pub(super) fn update_not_supported<M>(name: &str) -> Response<M> {
    Response::error(
        "Update Not Supported",
        format!(
            "The {} resource does not support updates. Please destroy and recreate.",
            name
        ),
    )
}
