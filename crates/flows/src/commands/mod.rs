pub mod app_installation;
pub mod app_version;
pub mod entity;
pub mod flow;
