use super::app_installation_confirmation::{read_installation_status, update_not_supported};
use crate::provider::ProviderData;
use crate::resource::Resource;
use crate::response::Response;
use async_trait::async_trait;
use flows_core::{EntityKind, EntityStatus, Intent, wait_until_ready};
use serde::{Deserialize, Serialize};

/// `flows_app_installation_wait_for_ready`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstallationWaitForReadyModel {
    pub app_installation_id: String,
    #[serde(default)]
    pub status: Option<EntityStatus>,
}

impl AppInstallationWaitForReadyModel {
    pub fn new(app_installation_id: impl Into<String>) -> Self {
        Self {
            app_installation_id: app_installation_id.into(),
            status: None,
        }
    }
}

/// Waits for an app installation to become ready without confirming it
#[derive(Clone)]
pub struct AppInstallationWaitForReadyResource {
    data: ProviderData,
}

impl AppInstallationWaitForReadyResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for AppInstallationWaitForReadyResource {
    type Model = AppInstallationWaitForReadyModel;

    fn type_name(&self) -> &'static str {
        "flows_app_installation_wait_for_ready"
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        let api = self.data.client.app_installations();

        match wait_until_ready(&api, &self.data.poller, &plan.app_installation_id).await {
            Ok(status) => Response::recorded(AppInstallationWaitForReadyModel {
                status: Some(status),
                ..plan
            }),
            Err(err) => {
                let mut response = Response::new();
                response.diagnostics.add_settlement_error(
                    EntityKind::AppInstallation,
                    Intent::Confirmation,
                    "Unable to wait for app installation",
                    &err,
                );
                response
            }
        }
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        read_installation_status(&self.data, state.app_installation_id.clone())
            .await
            .map(|status| AppInstallationWaitForReadyModel {
                status: Some(status),
                ..state
            })
    }

    async fn update(&self, _state: Self::Model, _plan: Self::Model) -> Response<Self::Model> {
        update_not_supported("app_installation_wait_for_ready")
    }

    async fn delete(&self, _state: Self::Model) -> Response<Self::Model> {
        Response::removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{provider_data, status_body};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STATUS_PATH: &str = "/provider/apps/get_installation_status";

    #[tokio::test]
    async fn test_create_never_confirms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("in_progress")))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("ready")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/confirm_installation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(0)
            .mount(&server)
            .await;

        let (data, sleeper) = provider_data(&server);
        let resource = AppInstallationWaitForReadyResource::new(data);

        let response = resource
            .create(AppInstallationWaitForReadyModel::new("ai-1"))
            .await;

        assert!(!response.has_error());
        assert_eq!(
            response.model().and_then(|m| m.status.clone()),
            Some(EntityStatus::Ready)
        );
        assert_eq!(sleeper.count(), 2);
    }

    #[tokio::test]
    async fn test_create_on_drifted_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("drifted")))
            .mount(&server)
            .await;

        let (data, sleeper) = provider_data(&server);
        let resource = AppInstallationWaitForReadyResource::new(data);

        let response = resource
            .create(AppInstallationWaitForReadyModel::new("ai-1"))
            .await;

        let diag = response.diagnostics.errors().next().unwrap();
        assert_eq!(diag.summary, "App Installation Confirmation Failed");
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_read_missing_installation_is_removed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(STATUS_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = AppInstallationWaitForReadyResource::new(data);

        let response = resource
            .read(AppInstallationWaitForReadyModel::new("ai-1"))
            .await;
        assert!(response.is_removed());
    }
}
