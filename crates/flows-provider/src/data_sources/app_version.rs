use crate::provider::ProviderData;
use crate::resource::DataSource;
use crate::response::Response;
use async_trait::async_trait;
use flows_api::AppVersionQuery;
use serde::{Deserialize, Serialize};

/// `flows_app_version`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppVersionModel {
    /// Resolved version id (computed)
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl AppVersionModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn query(&self) -> AppVersionQuery {
        AppVersionQuery {
            registry: self.registry.clone().filter(|r| !r.is_empty()),
            name: self.name.clone(),
            version: self.version.clone().filter(|v| !v.is_empty()),
        }
    }
}

/// Resolves a registry app version to its id
#[derive(Clone)]
pub struct AppVersionDataSource {
    data: ProviderData,
}

impl AppVersionDataSource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl DataSource for AppVersionDataSource {
    type Model = AppVersionModel;

    fn type_name(&self) -> &'static str {
        "flows_app_version"
    }

    async fn read(&self, config: Self::Model) -> Response<Self::Model> {
        match self.data.client.get_version_id(&config.query()).await {
            Ok(id) => Response::recorded(AppVersionModel {
                id: Some(id),
                ..config
            }),
            Err(err) => Response::client_error("Unable to fetch app version id", &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{data, provider_data};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_read_resolves_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_version_id"))
            .and(body_json(json!({ "registry": "flows", "name": "slack", "version": "1.2.0" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(data(json!({ "id": "v-42" }))))
            .expect(1)
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let source = AppVersionDataSource::new(data);

        let config = AppVersionModel {
            registry: Some("flows".into()),
            version: Some("1.2.0".into()),
            ..AppVersionModel::new("slack")
        };
        let response = source.read(config).await;

        assert_eq!(response.model().and_then(|m| m.id.as_deref()), Some("v-42"));
    }

    #[tokio::test]
    async fn test_read_omits_empty_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_version_id"))
            .and(body_json(json!({ "name": "slack" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(data(json!({ "id": "v-7" }))))
            .expect(1)
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let source = AppVersionDataSource::new(data);

        let config = AppVersionModel {
            registry: Some(String::new()),
            version: Some(String::new()),
            ..AppVersionModel::new("slack")
        };
        let response = source.read(config).await;
        assert_eq!(response.model().and_then(|m| m.id.as_deref()), Some("v-7"));
    }

    #[tokio::test]
    async fn test_read_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_version_id"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let source = AppVersionDataSource::new(data);

        let response = source.read(AppVersionModel::new("missing")).await;
        assert_eq!(
            response.diagnostics.errors().next().unwrap().detail,
            "Unable to fetch app version id, got error: not found"
        );
    }
}
