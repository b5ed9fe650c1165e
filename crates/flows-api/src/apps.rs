//! App installation and app version endpoints

use crate::client::{FlowsClient, IdRequest};
use crate::entities::{StatusResponse, missing_status};
use flows_core::{EntityStatus, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GET_INSTALLATION_PATH: &str = "/provider/apps/get_installation";
pub const GET_INSTALLATION_STATUS_PATH: &str = "/provider/apps/get_installation_status";
pub const GET_INSTALLATION_CONFIG_FIELD_PATH: &str = "/provider/apps/get_installation_config_field";
pub const CREATE_INSTALLATION_PATH: &str = "/provider/apps/create_installation";
pub const UPDATE_INSTALLATION_CONFIG_PATH: &str = "/provider/apps/update_installation_config";
pub const UPDATE_INSTALLATION_METADATA_PATH: &str = "/provider/apps/update_installation_metadata";
pub const UPDATE_INSTALLATION_VERSION_PATH: &str = "/provider/apps/update_installation_version";
pub const DELETE_INSTALLATION_PATH: &str = "/provider/apps/delete_installation";
pub const CONFIRM_INSTALLATION_PATH: &str = "/provider/apps/confirm_installation";
pub const GET_VERSION_ID_PATH: &str = "/provider/apps/get_version_id";

/// Which app version an installation runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRef {
    #[serde(default)]
    pub version_id: String,
    #[serde(default)]
    pub custom: bool,
}

/// Visual overrides for an installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl StyleOverride {
    /// Drop empty strings, which the server uses for "unset".
    pub fn normalized(self) -> Self {
        Self {
            icon_url: self.icon_url.filter(|v| !v.is_empty()),
            color: self.color.filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallationRequest {
    pub project_id: String,
    pub name: String,
    pub app: AppRef,
    pub style_override: Option<StyleOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstallationResponse {
    pub id: String,
    #[serde(default)]
    pub draft: bool,
}

/// Full installation record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    #[serde(default)]
    pub name: String,
    #[serde(default = "missing_status")]
    pub status: EntityStatus,
    #[serde(default)]
    pub app: AppRef,
    #[serde(default)]
    pub style_override: Option<StyleOverride>,
    #[serde(default)]
    pub config_fields: BTreeMap<String, String>,
}

/// Config update; a `None` value clears the field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateConfigRequest<'a> {
    id: &'a str,
    config_fields: &'a BTreeMap<String, Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMetadataRequest<'a> {
    id: &'a str,
    name: &'a str,
    style_override: Option<&'a StyleOverride>,
}

#[derive(Debug, Clone, Serialize)]
struct UpdateVersionRequest<'a> {
    id: &'a str,
    app: &'a AppRef,
}

/// Whether a mutation left the installation in draft
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DraftResponse {
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Serialize)]
struct GetConfigFieldRequest<'a> {
    id: &'a str,
    key: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFieldResponse {
    #[serde(default)]
    value: Option<String>,
}

/// Lookup key for a registry app version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppVersionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Lookup key for the version an installation should run, custom apps included
///
/// Same endpoint as [`AppVersionQuery`], but with `app_`-prefixed keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallationVersionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    pub app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub custom: bool,
}

#[derive(Debug, Deserialize)]
struct VersionIdResponse {
    id: String,
}

impl FlowsClient {
    pub async fn get_installation(&self, id: &str) -> Result<Installation> {
        self.call(GET_INSTALLATION_PATH, &IdRequest { id }).await
    }

    pub async fn get_installation_status(&self, id: &str) -> Result<EntityStatus> {
        let response: StatusResponse = self
            .call(GET_INSTALLATION_STATUS_PATH, &IdRequest { id })
            .await?;
        Ok(response.status)
    }

    /// Current value of one config field (`None` when unset)
    pub async fn get_installation_config_field(&self, id: &str, key: &str) -> Result<Option<String>> {
        let response: Option<ConfigFieldResponse> = self
            .call(GET_INSTALLATION_CONFIG_FIELD_PATH, &GetConfigFieldRequest { id, key })
            .await?;
        Ok(response.and_then(|r| r.value))
    }

    pub async fn create_installation(
        &self,
        request: &CreateInstallationRequest,
    ) -> Result<CreateInstallationResponse> {
        self.call(CREATE_INSTALLATION_PATH, request).await
    }

    pub async fn update_installation_config(
        &self,
        id: &str,
        config_fields: &BTreeMap<String, Option<String>>,
    ) -> Result<DraftResponse> {
        let response: Option<DraftResponse> = self
            .call(
                UPDATE_INSTALLATION_CONFIG_PATH,
                &UpdateConfigRequest { id, config_fields },
            )
            .await?;
        Ok(response.unwrap_or_default())
    }

    pub async fn update_installation_metadata(
        &self,
        id: &str,
        name: &str,
        style_override: Option<&StyleOverride>,
    ) -> Result<DraftResponse> {
        let response: Option<DraftResponse> = self
            .call(
                UPDATE_INSTALLATION_METADATA_PATH,
                &UpdateMetadataRequest {
                    id,
                    name,
                    style_override,
                },
            )
            .await?;
        Ok(response.unwrap_or_default())
    }

    pub async fn update_installation_version(&self, id: &str, app: &AppRef) -> Result<DraftResponse> {
        let response: Option<DraftResponse> = self
            .call(UPDATE_INSTALLATION_VERSION_PATH, &UpdateVersionRequest { id, app })
            .await?;
        Ok(response.unwrap_or_default())
    }

    pub async fn delete_installation(&self, id: &str) -> Result<()> {
        self.call_unit(DELETE_INSTALLATION_PATH, &IdRequest { id })
            .await
    }

    pub async fn confirm_installation(&self, id: &str) -> Result<()> {
        self.call_unit(CONFIRM_INSTALLATION_PATH, &IdRequest { id })
            .await
    }

    pub async fn get_version_id(&self, query: &AppVersionQuery) -> Result<String> {
        let response: VersionIdResponse = self.call(GET_VERSION_ID_PATH, query).await?;
        Ok(response.id)
    }

    pub async fn get_installation_version_id(
        &self,
        query: &InstallationVersionQuery,
    ) -> Result<String> {
        let response: VersionIdResponse = self.call(GET_VERSION_ID_PATH, query).await?;
        Ok(response.id)
    }
}
