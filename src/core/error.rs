use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum PanicError {
    #[error("Saving throw computation failed: {0}")]
    Computation(String),

    #[error("Unit not tracked in this encounter: {0:?}")]
    UnitNotTracked(UnitId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PanicError>;
