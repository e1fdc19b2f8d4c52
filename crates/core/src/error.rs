use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A point at the anomaly timestamp lacks a key the anomaly dimension names.
    #[error("Malformed input: point [{point}] has no value for dimension key '{key}'")]
    MalformedInput { point: String, key: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RcaError>;
