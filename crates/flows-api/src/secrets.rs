//! Project secret endpoints

use crate::client::FlowsClient;
use chrono::{DateTime, Utc};
use flows_core::Result;
use serde::{Deserialize, Serialize};

pub const CREATE_SECRET_PATH: &str = "/provider/organization/create_secret";
pub const UPDATE_SECRET_PATH: &str = "/provider/organization/update_secret";
pub const READ_SECRET_PATH: &str = "/provider/organization/read_secret";
pub const DELETE_SECRET_PATH: &str = "/provider/organization/delete_secret";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SecretRequest<'a> {
    project_id: &'a str,
    key: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SecretKeyRequest<'a> {
    project_id: &'a str,
    key: &'a str,
}

/// What the server exposes about a secret (never the value)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMetadata {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct SecretResponse {
    #[serde(default)]
    secret: Option<SecretMetadata>,
}

impl FlowsClient {
    pub async fn create_secret(&self, project_id: &str, key: &str, value: &str) -> Result<()> {
        self.call_unit(
            CREATE_SECRET_PATH,
            &SecretRequest {
                project_id,
                key,
                value,
            },
        )
        .await
    }

    pub async fn update_secret(&self, project_id: &str, key: &str, value: &str) -> Result<()> {
        self.call_unit(
            UPDATE_SECRET_PATH,
            &SecretRequest {
                project_id,
                key,
                value,
            },
        )
        .await
    }

    /// Fails with `NotFound` when the secret does not exist.
    pub async fn read_secret(&self, project_id: &str, key: &str) -> Result<SecretMetadata> {
        let response: Option<SecretResponse> = self
            .call(READ_SECRET_PATH, &SecretKeyRequest { project_id, key })
            .await?;

        Ok(response
            .and_then(|r| r.secret)
            .unwrap_or_else(|| SecretMetadata {
                key: key.to_string(),
                updated_at: None,
            }))
    }

    pub async fn delete_secret(&self, project_id: &str, key: &str) -> Result<()> {
        self.call_unit(DELETE_SECRET_PATH, &SecretKeyRequest { project_id, key })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_secret_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CREATE_SECRET_PATH))
            .and(body_json(json!({ "projectId": "p-1", "key": "API_KEY", "value": "s3cr3t" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .create_secret("p-1", "API_KEY", "s3cr3t")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_read_secret_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(READ_SECRET_PATH))
            .and(body_json(json!({ "projectId": "p-1", "key": "API_KEY" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "secret": { "key": "API_KEY", "updatedAt": "2024-05-01T12:00:00Z" } }
            })))
            .mount(&server)
            .await;

        let secret = client_for(&server)
            .read_secret("p-1", "API_KEY")
            .await
            .unwrap();

        assert_eq!(secret.key, "API_KEY");
        assert_eq!(
            secret.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_read_missing_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(READ_SECRET_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .read_secret("p-1", "API_KEY")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
