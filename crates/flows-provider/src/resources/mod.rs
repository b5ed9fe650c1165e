//! Managed resources

mod app_installation;
mod app_installation_config_field;
mod app_installation_confirmation;
mod app_installation_wait_for_ready;
mod entity_confirmation;
mod flow;
mod secret;

pub use app_installation::{
    AppInstallationModel, AppInstallationResource, AppModel, StyleOverrideModel,
};
pub use app_installation_config_field::{
    AppInstallationConfigFieldModel, AppInstallationConfigFieldResource,
};
pub use app_installation_confirmation::{
    AppInstallationConfirmationModel, AppInstallationConfirmationResource,
};
pub use app_installation_wait_for_ready::{
    AppInstallationWaitForReadyModel, AppInstallationWaitForReadyResource,
};
pub use entity_confirmation::{EntityConfirmationModel, EntityConfirmationResource};
pub use flow::{FlowModel, FlowResource};
pub use secret::{SecretModel, SecretResource};
