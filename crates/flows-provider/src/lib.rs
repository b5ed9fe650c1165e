//! Flows Terraform provider handlers
//!
//! Each resource and data source is a plain struct implementing
//! [`Resource`] or [`DataSource`]. Handlers take models, talk to the Flows
//! API, and answer with a [`Response`]: the state to store plus any
//! diagnostics. Confirmation and deletion waits go through `flows-core`.

pub mod data_sources;
pub mod diagnostics;
pub mod provider;
pub mod resource;
pub mod resources;
pub mod response;

pub use data_sources::{
    AppInstallationVersionDataSource, AppInstallationVersionModel, AppVersionDataSource,
    AppVersionModel,
};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use provider::{
    DATA_SOURCE_TYPES, FlowsProvider, PROVIDER_TYPE_NAME, ProviderData, RESOURCE_TYPES,
};
pub use resource::{DataSource, ImportState, ModifyPlan, Resource};
pub use resources::*;
pub use response::{Response, State};

#[cfg(test)]
pub(crate) mod testing {
    use crate::provider::ProviderData;
    use flows_api::FlowsClient;
    use flows_config::ProviderConfig;
    use flows_core::Poller;
    use flows_core::poll::testing::RecordingSleeper;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use wiremock::MockServer;

    /// Handler dependencies pointed at `server`, with sleeps recorded instead of taken
    pub fn provider_data(server: &MockServer) -> (ProviderData, Arc<RecordingSleeper>) {
        let config = ProviderConfig::new(&server.uri(), "test-token").unwrap();
        let sleeper = Arc::new(RecordingSleeper::new());
        let poller = Poller::with_sleeper(sleeper.clone());
        (ProviderData::new(FlowsClient::new(config), poller), sleeper)
    }

    pub fn status_body(status: &str) -> Value {
        json!({ "data": { "status": status } })
    }

    pub fn data(value: Value) -> Value {
        json!({ "data": value })
    }
}
