use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// Missing or invalid setting, detected before any network I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Anything that went wrong while talking to the text-generation service.
    #[error("Remote service error: {0}")]
    RemoteService(String),
    #[error("Cancelled: {0}")]
    Cancelled(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "Configuration",
            AppError::RemoteService(_) => "RemoteService",
            AppError::Cancelled(_) => "Cancelled",
            AppError::ValidationError(_) => "ValidationError",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
