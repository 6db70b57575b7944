use crate::config::ConfigError;
use crate::session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported schema version: {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CoreError {
    /// Errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        match self {
            CoreError::Config(_) => true,
            CoreError::Session(_) => true,
            CoreError::SchemaVersion { .. } => true,
            CoreError::InvalidRequest(_) => true,
            CoreError::Serialization(e) => e.is_data() || e.is_syntax() || e.is_eof(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
