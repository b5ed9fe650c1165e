//! Entity lifecycle endpoints

use crate::client::{FlowsClient, IdRequest};
use flows_core::{EntityStatus, Result};
use serde::{Deserialize, Serialize};

pub const GET_ENTITY_LIFECYCLE_STATUS_PATH: &str = "/provider/flows/get_entity_lifecycle_status";
pub const CONFIRM_ENTITY_LIFECYCLE_PATH: &str = "/provider/flows/confirm_entity_lifecycle";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetEntityLifecycleStatusRequest<'a> {
    entity_id: &'a str,
}

/// `{ "status": "..." }`
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default = "missing_status")]
    pub status: EntityStatus,
}

/// A record without a status reads as the empty string, which classifies as unknown.
pub(crate) fn missing_status() -> EntityStatus {
    EntityStatus::Unrecognized(String::new())
}

impl FlowsClient {
    pub async fn get_entity_lifecycle_status(&self, entity_id: &str) -> Result<EntityStatus> {
        let response: StatusResponse = self
            .call(
                GET_ENTITY_LIFECYCLE_STATUS_PATH,
                &GetEntityLifecycleStatusRequest { entity_id },
            )
            .await?;
        Ok(response.status)
    }

    pub async fn confirm_entity_lifecycle(&self, id: &str) -> Result<()> {
        self.call_unit(CONFIRM_ENTITY_LIFECYCLE_PATH, &IdRequest { id })
            .await
    }
}
