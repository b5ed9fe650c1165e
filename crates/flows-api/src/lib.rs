//! Flows control plane API
//!
//! Typed wrappers for the `/provider/...` endpoints plus the adapters that
//! let `flows-core` poll and confirm entities over HTTP.

pub mod adapters;
pub mod apps;
pub mod client;
pub mod entities;
pub mod flows;
pub mod secrets;

pub use adapters::{AppInstallationApi, AppInstallationRecords, EntityLifecycleApi};
pub use apps::{
    AppRef, AppVersionQuery, CreateInstallationRequest, CreateInstallationResponse, DraftResponse,
    Installation, InstallationVersionQuery, StyleOverride,
};
pub use client::FlowsClient;
pub use flows::{AppInstallationMapping, Block, Flow, FlowConfig, PlanChanges};
pub use secrets::SecretMetadata;
