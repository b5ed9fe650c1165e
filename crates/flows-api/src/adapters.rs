//! Bindings between the HTTP client and the settlement engine

use crate::client::FlowsClient;
use async_trait::async_trait;
use flows_core::{Confirmable, EntityKind, EntityStatus, Result, StatusSource};

/// Entity lifecycle status and confirmation
#[derive(Debug, Clone, Copy)]
pub struct EntityLifecycleApi<'a> {
    client: &'a FlowsClient,
    kind: EntityKind,
}

#[async_trait]
impl StatusSource for EntityLifecycleApi<'_> {
    fn kind(&self) -> EntityKind {
        self.kind
    }

    async fn fetch_status(&self, id: &str) -> Result<EntityStatus> {
        self.client.get_entity_lifecycle_status(id).await
    }
}

#[async_trait]
impl Confirmable for EntityLifecycleApi<'_> {
    async fn trigger_confirm(&self, id: &str) -> Result<()> {
        self.client.confirm_entity_lifecycle(id).await
    }
}

/// App installation status and confirmation
#[derive(Debug, Clone, Copy)]
pub struct AppInstallationApi<'a> {
    client: &'a FlowsClient,
}

#[async_trait]
impl StatusSource for AppInstallationApi<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::AppInstallation
    }

    async fn fetch_status(&self, id: &str) -> Result<EntityStatus> {
        self.client.get_installation_status(id).await
    }
}

#[async_trait]
impl Confirmable for AppInstallationApi<'_> {
    async fn trigger_confirm(&self, id: &str) -> Result<()> {
        self.client.confirm_installation(id).await
    }
}

/// Reads the status from the full installation record.
///
/// Used to probe deletions: the record disappears (`not found`) once the
/// installation is gone.
#[derive(Debug, Clone, Copy)]
pub struct AppInstallationRecords<'a> {
    client: &'a FlowsClient,
}

#[async_trait]
impl StatusSource for AppInstallationRecords<'_> {
    fn kind(&self) -> EntityKind {
        EntityKind::AppInstallation
    }

    async fn fetch_status(&self, id: &str) -> Result<EntityStatus> {
        Ok(self.client.get_installation(id).await?.status)
    }
}

impl FlowsClient {
    /// `kind` only changes how the entity is named in logs and errors.
    pub fn entity_lifecycles(&self, kind: EntityKind) -> EntityLifecycleApi<'_> {
        EntityLifecycleApi { client: self, kind }
    }

    pub fn app_installations(&self) -> AppInstallationApi<'_> {
        AppInstallationApi { client: self }
    }

    pub fn app_installation_records(&self) -> AppInstallationRecords<'_> {
        AppInstallationRecords { client: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use flows_core::poll::testing::RecordingSleeper;
    use flows_core::{FlowsError, Poller, confirm, wait_for_deleted};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn status_body(status: &str) -> serde_json::Value {
        json!({ "data": { "status": status } })
    }

    fn poller() -> (Poller, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::new());
        (Poller::with_sleeper(sleeper.clone()), sleeper)
    }

    #[tokio::test]
    async fn test_confirm_installation_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/provider/apps/get_installation_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("draft")))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_installation_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("in_progress")))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_installation_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("ready")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/confirm_installation"))
            .and(body_json(json!({ "id": "ai-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (poller, sleeper) = poller();

        let result = confirm(&client.app_installations(), &poller, "ai-1", true)
            .await
            .unwrap();

        assert!(result.confirm_issued);
        assert_eq!(result.status, EntityStatus::Ready);
        assert_eq!(sleeper.count(), 1);
    }

    #[tokio::test]
    async fn test_entity_lifecycle_not_a_draft_race() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/provider/flows/get_entity_lifecycle_status"))
            .and(body_json(json!({ "entityId": "e-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("draft")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/flows/get_entity_lifecycle_status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(status_body("ready")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/flows/confirm_entity_lifecycle"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "entity is not a draft" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (poller, _sleeper) = poller();

        let result = confirm(
            &client.entity_lifecycles(EntityKind::EntityLifecycle),
            &poller,
            "e-1",
            true,
        )
        .await
        .unwrap();

        assert!(!result.confirm_issued);
        assert_eq!(result.status, EntityStatus::Ready);
    }

    #[tokio::test]
    async fn test_deletion_probe_uses_installation_record() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/provider/apps/get_installation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "name": "Slack", "status": "draining" }
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_installation"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (poller, sleeper) = poller();

        wait_for_deleted(&client.app_installation_records(), &poller, "ai-1")
            .await
            .unwrap();
        assert_eq!(sleeper.count(), 1);
    }

    #[tokio::test]
    async fn test_deletion_probe_rejects_ready() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/apps/get_installation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "name": "Slack", "status": "ready" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (poller, _sleeper) = poller();

        let err = wait_for_deleted(&client.app_installation_records(), &poller, "ai-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FlowsError::TerminalStatus {
                status: EntityStatus::Ready,
                ..
            }
        ));
    }
}
