//! Flows control plane client
//!
//! Every endpoint is a JSON `POST` with bearer authentication. Responses
//! are wrapped in a `{ "data": ..., "error": "..." }` envelope.

use flows_config::ProviderConfig;
use flows_core::{FlowsError, Result};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// Flows API client
#[derive(Debug, Clone)]
pub struct FlowsClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl FlowsClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// POST `request` to `path` and decode the envelope's `data` as `T`.
    ///
    /// An envelope error takes precedence over the HTTP status code, so a
    /// 404 carrying `"not found"` becomes [`FlowsError::NotFound`].
    pub async fn call<Req, T>(&self, path: &str, request: &Req) -> Result<T>
    where
        Req: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.url_for(path);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.token())
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        tracing::debug!(path, status = status.as_u16(), "Flows API call");

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| FlowsError::Decode {
            message: e.to_string(),
            body: body.clone(),
        })?;

        if let Some(message) = envelope.error.filter(|m| !m.is_empty()) {
            return Err(FlowsError::from_api_message(message));
        }

        if status != reqwest::StatusCode::OK {
            return Err(FlowsError::UnexpectedStatusCode(status.as_u16()));
        }

        serde_json::from_value(envelope.data.unwrap_or(serde_json::Value::Null)).map_err(|e| {
            FlowsError::Decode {
                message: e.to_string(),
                body,
            }
        })
    }

    /// Like [`call`](Self::call) for endpoints whose `data` is irrelevant.
    pub async fn call_unit<Req>(&self, path: &str, request: &Req) -> Result<()>
    where
        Req: Serialize + ?Sized,
    {
        self.call::<Req, IgnoredAny>(path, request).await?;
        Ok(())
    }
}

// ============ Envelope ============

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Request body carrying a single `id`
#[derive(Debug, Serialize)]
pub(crate) struct IdRequest<'a> {
    pub id: &'a str,
}

fn transport(err: reqwest::Error) -> FlowsError {
    FlowsError::Transport(err.to_string())
}
