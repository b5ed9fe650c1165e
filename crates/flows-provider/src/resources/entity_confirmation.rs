use super::app_installation_confirmation::update_not_supported;
use crate::provider::ProviderData;
use crate::resource::Resource;
use crate::response::Response;
use async_trait::async_trait;
use flows_core::{EntityKind, EntityStatus, Intent, confirm};
use serde::{Deserialize, Serialize};

/// `flows_entity_confirmation` / `flows_entity_lifecycle_confirmation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfirmationModel {
    pub entity_id: String,
    /// Final status after confirmation (computed)
    #[serde(default)]
    pub status: Option<EntityStatus>,
}

impl EntityConfirmationModel {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            status: None,
        }
    }
}

/// Confirms an entity and waits for it to reach a settled state.
///
/// Both entity confirmation resources share this implementation; they only
/// differ in type name and in how the entity is named in messages.
#[derive(Clone)]
pub struct EntityConfirmationResource {
    data: ProviderData,
    kind: EntityKind,
}

impl EntityConfirmationResource {
    pub fn entity(data: ProviderData) -> Self {
        Self {
            data,
            kind: EntityKind::Entity,
        }
    }

    pub fn entity_lifecycle(data: ProviderData) -> Self {
        Self {
            data,
            kind: EntityKind::EntityLifecycle,
        }
    }
}

#[async_trait]
impl Resource for EntityConfirmationResource {
    type Model = EntityConfirmationModel;

    fn type_name(&self) -> &'static str {
        match self.kind {
            EntityKind::EntityLifecycle => "flows_entity_lifecycle_confirmation",
            _ => "flows_entity_confirmation",
        }
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        let api = self.data.client.entity_lifecycles(self.kind);

        match confirm(&api, &self.data.poller, &plan.entity_id, true).await {
            Ok(confirmation) => Response::recorded(EntityConfirmationModel {
                status: Some(confirmation.status),
                ..plan
            }),
            Err(err) => {
                let mut response = Response::new();
                response.diagnostics.add_settlement_error(
                    self.kind,
                    Intent::Confirmation,
                    "Unable to confirm entity",
                    &err,
                );
                response
            }
        }
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        match self
            .data
            .client
            .get_entity_lifecycle_status(&state.entity_id)
            .await
        {
            Ok(status) => Response::recorded(EntityConfirmationModel {
                status: Some(status),
                ..state
            }),
            Err(err) => {
                tracing::debug!(entity_id = %state.entity_id, error = %err, "Entity status unavailable, removing");
                Response::removed()
            }
        }
    }

    async fn update(&self, _state: Self::Model, _plan: Self::Model) -> Response<Self::Model> {
        update_not_supported(self.type_name().trim_start_matches("flows_"))
    }

    async fn delete(&self, _state: Self::Model) -> Response<Self::Model> {
        Response::removed()
    }
}
