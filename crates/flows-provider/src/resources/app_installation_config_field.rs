use crate::provider::ProviderData;
use crate::resource::Resource;
use crate::response::Response;
use async_trait::async_trait;
use flows_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `flows_app_installation_config_field`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstallationConfigFieldModel {
    pub app_installation_id: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl AppInstallationConfigFieldModel {
    pub fn new(
        app_installation_id: impl Into<String>,
        key: impl Into<String>,
        value: Option<&str>,
    ) -> Self {
        Self {
            app_installation_id: app_installation_id.into(),
            key: key.into(),
            value: value.map(str::to_string),
        }
    }
}

/// A single config field of an app installation, managed on its own
#[derive(Clone)]
pub struct AppInstallationConfigFieldResource {
    data: ProviderData,
}

impl AppInstallationConfigFieldResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }

    async fn set_field(&self, id: &str, key: &str, value: Option<String>) -> Result<()> {
        let fields = BTreeMap::from([(key.to_string(), value)]);
        self.data
            .client
            .update_installation_config(id, &fields)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Resource for AppInstallationConfigFieldResource {
    type Model = AppInstallationConfigFieldModel;

    fn type_name(&self) -> &'static str {
        "flows_app_installation_config_field"
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        match self
            .set_field(&plan.app_installation_id, &plan.key, plan.value.clone())
            .await
        {
            Ok(()) => Response::recorded(plan),
            Err(err) => {
                Response::client_error("Unable to create app installation config field", &err)
            }
        }
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .get_installation_config_field(&state.app_installation_id, &state.key)
            .await
        {
            Ok(value) => Response::recorded(AppInstallationConfigFieldModel { value, ..state }),
            Err(err) if err.is_not_found() => Response::removed(),
            Err(err) => Response::client_error("Unable to read app installation", &err),
        }
    }

    async fn update(&self, _state: Self::Model, plan: Self::Model) -> Response<Self::Model> {
        match self
            .set_field(&plan.app_installation_id, &plan.key, plan.value.clone())
            .await
        {
            Ok(()) => Response::recorded(plan),
            Err(err) => {
                Response::client_error("Unable to update app installation config field", &err)
            }
        }
    }

    async fn delete(&self, state: Self::Model) -> Response<Self::Model> {
        match self
            .set_field(&state.app_installation_id, &state.key, None)
            .await
        {
            Ok(()) => Response::removed(),
            Err(err) => {
                Response::client_error("Unable to delete app installation config field", &err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::State;
    use crate::testing::{data, provider_data};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONFIG_PATH: &str = "/provider/apps/update_installation_config";
    const FIELD_PATH: &str = "/provider/apps/get_installation_config_field";

    #[tokio::test]
    async fn test_create_sets_single_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CONFIG_PATH))
            .and(body_json(json!({ "id": "ai-1", "configFields": { "region": "eu" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(data(json!({ "draft": true }))))
            .expect(1)
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = AppInstallationConfigFieldResource::new(data);

        let plan = AppInstallationConfigFieldModel::new("ai-1", "region", Some("eu"));
        let response = resource.create(plan.clone()).await;

        assert!(!response.has_error());
        assert_eq!(response.model(), Some(&plan));
    }

    #[tokio::test]
    async fn test_delete_clears_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CONFIG_PATH))
            .and(body_json(json!({ "id": "ai-1", "configFields": { "region": null } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(data(json!({}))))
            .expect(1)
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = AppInstallationConfigFieldResource::new(data);

        let response = resource
            .delete(AppInstallationConfigFieldModel::new("ai-1", "region", Some("eu")))
            .await;
        assert!(response.is_removed());
    }

    #[tokio::test]
    async fn test_read_refreshes_value() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FIELD_PATH))
            .and(body_json(json!({ "id": "ai-1", "key": "region" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(data(json!({ "value": null }))))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = AppInstallationConfigFieldResource::new(data);

        let response = resource
            .read(AppInstallationConfigFieldModel::new("ai-1", "region", Some("eu")))
            .await;
        assert_eq!(response.model().map(|m| m.value.clone()), Some(None));
    }

    #[tokio::test]
    async fn test_update_error_leaves_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CONFIG_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = AppInstallationConfigFieldResource::new(data);

        let state = AppInstallationConfigFieldModel::new("ai-1", "region", Some("eu"));
        let plan = AppInstallationConfigFieldModel::new("ai-1", "region", Some("us"));
        let response = resource.update(state, plan).await;

        assert_eq!(response.state, State::Unchanged);
        assert_eq!(
            response.diagnostics.errors().next().unwrap().detail,
            "Unable to update app installation config field, got error: boom"
        );
    }

    #[tokio::test]
    async fn test_read_not_found_removes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(FIELD_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = AppInstallationConfigFieldResource::new(data);

        let response = resource
            .read(AppInstallationConfigFieldModel::new("ai-1", "region", None))
            .await;
        assert!(response.is_removed());
    }
}
