use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog endpoint returned status {0}")]
    Status(u16),

    #[error("Malformed catalog: {0}")]
    Payload(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
