//! Flow endpoints

use crate::client::{FlowsClient, IdRequest};
use flows_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CREATE_FLOW_PATH: &str = "/provider/flows/create";
pub const APPLY_FLOW_CONFIG_PATH: &str = "/provider/flows/apply_config";
pub const GET_FLOW_PATH: &str = "/provider/flows/get";
pub const UPDATE_FLOW_PATH: &str = "/provider/flows/update";
pub const DELETE_FLOW_PATH: &str = "/provider/flows/delete";
pub const PLAN_CHANGES_PATH: &str = "/provider/flows/plan_changes";
pub const EXPORT_DEFINITION_PATH: &str = "/provider/flows/export_definition";

/// App key to installation id overrides applied with a definition
pub type AppInstallationMapping = BTreeMap<String, String>;

/// A definition plus its installation mapping, as sent to apply/plan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowConfig<'a> {
    pub flow_id: &'a str,
    pub definition: &'a str,
    #[serde(skip_serializing_if = "mapping_is_empty")]
    pub app_installation_mapping: Option<&'a AppInstallationMapping>,
}

fn mapping_is_empty(mapping: &Option<&AppInstallationMapping>) -> bool {
    mapping.is_none_or(|m| m.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFlowRequest<'a> {
    project_id: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateFlowResponse {
    flow: FlowRef,
}

#[derive(Debug, Deserialize)]
struct FlowRef {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowIdRequest<'a> {
    flow_id: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateFlowRequest<'a> {
    id: &'a str,
    name: &'a str,
}

/// Flow details
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Flow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub blocks: BTreeMap<String, Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
}

/// Server-side diff between the current flow and a definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChanges {
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub readable_plan: Option<String>,
}

impl PlanChanges {
    pub fn has_operations(&self) -> bool {
        !self.plan.operations.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub operations: Vec<PlanOperation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanOperation {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct ExportDefinitionResponse {
    definition: String,
}

impl FlowsClient {
    /// Create an empty flow and return its id.
    pub async fn create_flow(&self, project_id: &str, name: &str) -> Result<String> {
        let response: CreateFlowResponse = self
            .call(CREATE_FLOW_PATH, &CreateFlowRequest { project_id, name })
            .await?;
        Ok(response.flow.id)
    }

    pub async fn apply_flow_config(&self, config: &FlowConfig<'_>) -> Result<()> {
        self.call_unit(APPLY_FLOW_CONFIG_PATH, config).await
    }

    pub async fn get_flow(&self, flow_id: &str) -> Result<Flow> {
        self.call(GET_FLOW_PATH, &FlowIdRequest { flow_id }).await
    }

    pub async fn rename_flow(&self, id: &str, name: &str) -> Result<()> {
        self.call_unit(UPDATE_FLOW_PATH, &UpdateFlowRequest { id, name })
            .await
    }

    pub async fn delete_flow(&self, id: &str) -> Result<()> {
        self.call_unit(DELETE_FLOW_PATH, &IdRequest { id }).await
    }

    pub async fn plan_flow_changes(&self, config: &FlowConfig<'_>) -> Result<PlanChanges> {
        let plan: Option<PlanChanges> = self.call(PLAN_CHANGES_PATH, config).await?;
        Ok(plan.unwrap_or_default())
    }

    pub async fn export_flow_definition(&self, flow_id: &str) -> Result<String> {
        let response: ExportDefinitionResponse = self
            .call(EXPORT_DEFINITION_PATH, &FlowIdRequest { flow_id })
            .await?;
        Ok(response.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_flow_returns_nested_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(CREATE_FLOW_PATH))
            .and(body_json(json!({ "projectId": "p-1", "name": "Onboarding" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "flow": { "id": "f-1" } } })),
            )
            .mount(&server)
            .await;

        let id = client_for(&server)
            .create_flow("p-1", "Onboarding")
            .await
            .unwrap();
        assert_eq!(id, "f-1");
    }

    #[tokio::test]
    async fn test_empty_mapping_is_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(APPLY_FLOW_CONFIG_PATH))
            .and(body_json(json!({ "flowId": "f-1", "definition": "blocks: []" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let empty = AppInstallationMapping::new();
        client_for(&server)
            .apply_flow_config(&FlowConfig {
                flow_id: "f-1",
                definition: "blocks: []",
                app_installation_mapping: Some(&empty),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_plan_changes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(PLAN_CHANGES_PATH))
            .and(body_json(json!({
                "flowId": "f-1",
                "definition": "blocks: []",
                "appInstallationMapping": { "slack": "ai-1" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "plan": { "operations": [{ "type": "update_block" }] },
                    "readablePlan": "~ update block notify"
                }
            })))
            .mount(&server)
            .await;

        let mapping = AppInstallationMapping::from([("slack".to_string(), "ai-1".to_string())]);
        let plan = client_for(&server)
            .plan_flow_changes(&FlowConfig {
                flow_id: "f-1",
                definition: "blocks: []",
                app_installation_mapping: Some(&mapping),
            })
            .await
            .unwrap();

        assert!(plan.has_operations());
        assert_eq!(plan.plan.operations[0].kind, "update_block");
        assert_eq!(plan.readable_plan.as_deref(), Some("~ update block notify"));
    }

    #[tokio::test]
    async fn test_get_flow_blocks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GET_FLOW_PATH))
            .and(body_json(json!({ "flowId": "f-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "name": "Onboarding", "blocks": { "notify": { "id": "b-1" } } }
            })))
            .mount(&server)
            .await;

        let flow = client_for(&server).get_flow("f-1").await.unwrap();
        assert_eq!(flow.name, "Onboarding");
        assert_eq!(flow.blocks["notify"].id, "b-1");
    }
}
