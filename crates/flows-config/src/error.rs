use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing FLOWS_TOKEN environment variable. The FLOWS_TOKEN environment variable must be set \
        to authenticate requests. Get it by running `flowctl auth token`."
    )]
    MissingToken,

    #[error(
        "No Flows endpoint configured. Pass --endpoint, set FLOWS_ENDPOINT, or add \"endpoint\" \
        to the config file (usually useflows.eu or useflows.us)"
    )]
    MissingEndpoint,

    #[error("The provided endpoint URL is invalid: {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Could not parse config file {path}: {source}")]
    ConfigFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
