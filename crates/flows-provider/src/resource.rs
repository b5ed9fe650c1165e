//! Resource and data source handler traits

use crate::diagnostics::Diagnostics;
use crate::response::Response;
use async_trait::async_trait;

/// A managed resource: plain models in, state change and diagnostics out
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Send + Sync;

    /// Full type name, e.g. `flows_flow`
    fn type_name(&self) -> &'static str;

    /// Check a configuration before any request is made.
    fn validate(&self, _config: &Self::Model) -> Diagnostics {
        Diagnostics::new()
    }

    async fn create(&self, plan: Self::Model) -> Response<Self::Model>;

    async fn read(&self, state: Self::Model) -> Response<Self::Model>;

    async fn update(&self, state: Self::Model, plan: Self::Model) -> Response<Self::Model>;

    async fn delete(&self, state: Self::Model) -> Response<Self::Model>;
}

/// Resources that can be adopted from an import id
pub trait ImportState: Resource {
    /// Build the initial state for `id`; a read follows.
    fn import_state(&self, id: &str) -> Response<Self::Model>;
}

/// Resources that adjust the planned state before it is shown or applied
#[async_trait]
pub trait ModifyPlan: Resource {
    /// `state` is `None` when the resource does not exist yet. The recorded
    /// model of the response replaces `plan`.
    async fn modify_plan(
        &self,
        state: Option<Self::Model>,
        plan: Self::Model,
        config: Self::Model,
    ) -> Response<Self::Model>;
}

/// A read-only lookup
#[async_trait]
pub trait DataSource: Send + Sync {
    type Model: Send + Sync;

    fn type_name(&self) -> &'static str;

    fn validate(&self, _config: &Self::Model) -> Diagnostics {
        Diagnostics::new()
    }

    async fn read(&self, config: Self::Model) -> Response<Self::Model>;
}
