use crate::provider::ProviderData;
use crate::resource::{ImportState, ModifyPlan, Resource};
use crate::response::Response;
use async_trait::async_trait;
use flows_api::{AppInstallationMapping, Block, Flow, FlowConfig};
use flows_core::FlowsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `flows_flow`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowModel {
    pub project_id: String,
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Flow definition; unset right after an import
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub app_installation_mapping: Option<AppInstallationMapping>,
    /// Block ids by block name (computed)
    #[serde(default)]
    pub blocks: BTreeMap<String, Block>,
}

impl FlowModel {
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            definition: Some(definition.into()),
            ..Default::default()
        }
    }

    fn config<'a>(&'a self, flow_id: &'a str, definition: &'a str) -> FlowConfig<'a> {
        FlowConfig {
            flow_id,
            definition,
            app_installation_mapping: self.app_installation_mapping.as_ref(),
        }
    }

    fn apply_details(&mut self, flow: Flow) {
        self.name = flow.name;
        self.blocks = flow.blocks;
    }
}

/// A flow and its definition
#[derive(Clone)]
pub struct FlowResource {
    data: ProviderData,
}

impl FlowResource {
    pub fn new(data: ProviderData) -> Self {
        Self { data }
    }

    async fn flow_details(&self, flow_id: &str) -> Result<Flow, FlowsError> {
        self.data.client.get_flow(flow_id).await
    }
}

fn details_error<M>(response: &mut Response<M>, err: &FlowsError) {
    response.diagnostics.add_error(
        "Unable to fetch flow details",
        format!("unable to get flow details: {}", err),
    );
}

fn missing_id<M>() -> Response<M> {
    Response::error(
        "Missing Flow ID",
        "The flow has no ID in state. Please import or recreate it.",
    )
}

#[async_trait]
impl Resource for FlowResource {
    type Model = FlowModel;

    fn type_name(&self) -> &'static str {
        "flows_flow"
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model> {
        let flow_id = match self
            .data
            .client
            .create_flow(&plan.project_id, &plan.name)
            .await
        {
            Ok(id) => id,
            Err(err) => return Response::client_error("Unable to create flow", &err),
        };
        tracing::info!(flow_id = %flow_id, "Created flow");

        let mut model = FlowModel {
            id: Some(flow_id.clone()),
            ..plan
        };
        let mut response = Response::recorded(model.clone());

        let definition = model.definition.clone().unwrap_or_default();
        if let Err(err) = self
            .data
            .client
            .apply_flow_config(&model.config(&flow_id, &definition))
            .await
        {
            response
                .diagnostics
                .add_client_error("Unable to apply flow definition", &err);
            return response;
        }

        match self.flow_details(&flow_id).await {
            Ok(flow) => {
                model.apply_details(flow);
                response.record(model);
            }
            Err(err) => details_error(&mut response, &err),
        }

        response
    }

    async fn read(&self, state: Self::Model) -> Response<Self::Model> {
        let Some(flow_id) = state.id.clone() else {
            return missing_id();
        };

        let mut model = state;
        match self.flow_details(&flow_id).await {
            Ok(flow) => model.apply_details(flow),
            Err(err) if err.is_not_found() => {
                tracing::debug!(flow_id = %flow_id, "Flow gone, removing");
                return Response::removed();
            }
            Err(err) => {
                let mut response = Response::new();
                details_error(&mut response, &err);
                return response;
            }
        }

        // Without a definition (after import) the server copy is the only one
        let needs_export = match model.definition.as_deref() {
            None => true,
            Some(definition) => {
                match self
                    .data
                    .client
                    .plan_flow_changes(&model.config(&flow_id, definition))
                    .await
                {
                    Ok(plan) => plan.has_operations(),
                    Err(err) if err.to_string().contains("internal error") => {
                        return Response::client_error("Unable to plan flow changes", &err);
                    }
                    Err(err) => {
                        tracing::debug!(flow_id = %flow_id, error = %err, "Stored definition rejected, exporting");
                        true
                    }
                }
            }
        };

        if needs_export {
            match self.data.client.export_flow_definition(&flow_id).await {
                Ok(definition) => model.definition = Some(definition),
                Err(err) => return Response::client_error("Unable to fetch flow definition", &err),
            }
        }

        Response::recorded(model)
    }

    async fn update(&self, state: Self::Model, plan: Self::Model) -> Response<Self::Model> {
        let Some(flow_id) = state.id.clone() else {
            return missing_id();
        };

        let definition = plan.definition.clone().unwrap_or_default();
        if let Err(err) = self
            .data
            .client
            .apply_flow_config(&plan.config(&flow_id, &definition))
            .await
        {
            return Response::client_error("Unable to apply flow definition", &err);
        }

        let mut model = FlowModel {
            id: Some(flow_id.clone()),
            blocks: state.blocks.clone(),
            ..plan
        };
        let mut response = Response::recorded(model.clone());

        if state.name != model.name {
            if let Err(err) = self.data.client.rename_flow(&flow_id, &model.name).await {
                response.record(FlowModel {
                    name: state.name,
                    ..model
                });
                response
                    .diagnostics
                    .add_client_error("Unable to update flow metadata", &err);
                return response;
            }
        }

        match self.flow_details(&flow_id).await {
            Ok(flow) => {
                model.apply_details(flow);
                response.record(model);
            }
            Err(err) => details_error(&mut response, &err),
        }

        response
    }

    async fn delete(&self, state: Self::Model) -> Response<Self::Model> {
        let Some(flow_id) = state.id else {
            return Response::removed();
        };

        match self.data.client.delete_flow(&flow_id).await {
            Ok(()) => Response::removed(),
            Err(err) => Response::client_error("Unable to delete flow", &err),
        }
    }
}

#[async_trait]
impl ModifyPlan for FlowResource {
    async fn modify_plan(
        &self,
        state: Option<Self::Model>,
        plan: Self::Model,
        config: Self::Model,
    ) -> Response<Self::Model> {
        // Nothing to compare against until the flow exists and is kept
        let Some(state) = state else {
            return Response::recorded(plan);
        };
        let (Some(flow_id), Some(_)) = (state.id.clone(), plan.id.as_ref()) else {
            return Response::recorded(plan);
        };
        let Some(definition) = config.definition.as_deref() else {
            return Response::recorded(plan);
        };

        let changes = match self
            .data
            .client
            .plan_flow_changes(&config.config(&flow_id, definition))
            .await
        {
            Ok(changes) => changes,
            Err(err) => return Response::client_error("Unable to plan flow changes", &err),
        };

        if !changes.has_operations() {
            return Response::recorded(state);
        }

        let mut response = Response::recorded(FlowModel {
            definition: config.definition.clone(),
            app_installation_mapping: config.app_installation_mapping.clone(),
            ..plan
        });
        if let Some(readable) = changes.readable_plan {
            response
                .diagnostics
                .add_warning("Flow Changes Planned", readable);
        }
        response
    }
}

impl ImportState for FlowResource {
    fn import_state(&self, id: &str) -> Response<Self::Model> {
        Response::recorded(FlowModel {
            id: Some(id.to_string()),
            ..Default::default()
        })
    }
}
