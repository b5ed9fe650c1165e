use crate::provider::ProviderData;
use crate::resource::{ImportState, Resource};
use crate::response::Response;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `flows_secret`
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretModel {
    /// `project_id/key` (computed)
    #[serde(default)]
    pub id: Option<String>,
    pub project_id: String,
    pub key: String,
    /// Write-only; the server never returns it
    #[serde(default)]
    pub value: String,
}

impl fmt::Debug for SecretModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretModel")
            .field("id", &self.id)
            .field("project_id", &self.project_id)
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl SecretModel {
    pub fn new(
        project_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            project_id: project_id.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    fn with_id(self) -> Self {
        Self {
            id: Some(secret_id(&self.project_id, &self.key)),
            ..self
        }
    }
}

fn secret_id(project_id: &str, key: &str) -> String {
    format!("{}/{}", project_id, key)
}

/// A project secret
#[derive(Clone)]
pub struct SecretResource {
    data: ProviderData,
}

impl SecretResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }
}

#[async_trait]
impl Resource for SecretResource {
    type Model = SecretModel;

    fn type_name(&self) -> &'static str {
        "flows_secret"
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .create_secret(&plan.project_id, &plan.key, &plan.value)
            .await
        {
            Ok(()) => Response::recorded(plan.with_id()),
            Err(err) => Response::client_error("Unable to create secret", &err),
        }
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .read_secret(&state.project_id, &state.key)
            .await
        {
            Ok(metadata) => {
                tracing::debug!(key = %metadata.key, updated_at = ?metadata.updated_at, "Read secret");
                Response::recorded(state.with_id())
            }
            Err(err) if err.is_not_found() => Response::removed(),
            Err(err) => Response::client_error("Unable to read secret", &err),
        }
    }

    async fn update(&self, _state: Self::Model, plan: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .update_secret(&plan.project_id, &plan.key, &plan.value)
            .await
        {
            Ok(()) => Response::recorded(plan.with_id()),
            Err(err) => Response::client_error("Unable to update secret", &err),
        }
    }

    async fn delete(&self, state: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .delete_secret(&state.project_id, &state.key)
            .await
        {
            Ok(()) => Response::removed(),
            Err(err) => Response::client_error("Unable to delete secret", &err),
        }
    }
}

impl ImportState for SecretResource {
    fn import_state(&self, id: &str) -> Response<Self::Model> {
        let parts: Vec<&str> = id.split('/').collect();
        let [project_id, key] = parts.as_slice() else {
            return Response::error(
                "Invalid Import ID",
                format!(
                    "Expected import ID in the format 'project_id/key', got: {}",
                    id
                ),
            );
        };

        Response::recorded(SecretModel {
            id: Some(id.to_string()),
            project_id: project_id.to_string(),
            key: key.to_string(),
            value: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{data, provider_data};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_records_composite_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/organization/create_secret"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({ "projectId": "p-1", "key": "API_KEY", "value": "s3cr3t" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(data(json!({}))))
            .expect(1)
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = SecretResource::new(data);

        let response = resource
            .create(SecretModel::new("p-1", "API_KEY", "s3cr3t"))
            .await;

        assert!(!response.has_error());
        assert_eq!(
            response.model().and_then(|m| m.id.as_deref()),
            Some("p-1/API_KEY")
        );
    }

    #[tokio::test]
    async fn test_read_not_found_removes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/organization/read_secret"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = SecretResource::new(data);

        let response = resource
            .read(SecretModel::new("p-1", "API_KEY", "s3cr3t"))
            .await;
        assert!(response.is_removed());
    }

    #[tokio::test]
    async fn test_delete_error_names_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/organization/delete_secret"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "forbidden" })))
            .mount(&server)
            .await;

        let (data, _sleeper) = provider_data(&server);
        let resource = SecretResource::new(data);

        let response = resource
            .delete(SecretModel::new("p-1", "API_KEY", "s3cr3t"))
            .await;
        assert_eq!(
            response.diagnostics.errors().next().unwrap().detail,
            "Unable to delete secret, got error: forbidden"
        );
    }

    #[tokio::test]
    async fn test_import_splits_id() {
        let server = MockServer::start().await;
        let (data, _sleeper) = provider_data(&server);
        let resource = SecretResource::new(data);

        let response = resource.import_state("p-1/API_KEY");
        let model = response.model().unwrap();
        assert_eq!(model.project_id, "p-1");
        assert_eq!(model.key, "API_KEY");

        for bad in ["p-1", "p-1/a/b", ""] {
            let response = resource.import_state(bad);
            let diag = response.diagnostics.errors().next().unwrap();
            assert_eq!(diag.summary, "Invalid Import ID");
            assert_eq!(
                diag.detail,
                format!(
                    "Expected import ID in the format 'project_id/key', got: {}",
                    bad
                )
            );
        }
    }

    #[test]
    fn test_debug_redacts_value() {
        let model = SecretModel::new("p-1", "API_KEY", "s3cr3t");
        assert!(!format!("{:?}", model).contains("s3cr3t"));
    }
}
