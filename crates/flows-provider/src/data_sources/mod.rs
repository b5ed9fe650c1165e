//! Read-only data sources

mod app_installation_version;
mod app_version;

pub use app_installation_version::{AppInstallationVersionDataSource, AppInstallationVersionModel};
pub use app_version::{AppVersionDataSource, AppVersionModel};
