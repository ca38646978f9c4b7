use thiserror::Error;

use crate::core::types::TaskId;

#[derive(Error, Debug)]
pub enum BrainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Interruption chain exhausted after {attempts} attempts (last task: {task})")]
    InterruptionChainExhausted { task: TaskId, attempts: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BrainError>;
