use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not read cleanup settings: {0}")]
    RemoteReadError(String),

    #[error("Cannot set cleanup, unexpected error: {0}")]
    RemoteWriteError(String),
}

impl ProviderError {
    pub fn config(message: impl Into<String>) -> Self {
        ProviderError::ConfigError {
            message: message.into(),
        }
    }

    /// Errors caused by user input rather than the server or the network.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ProviderError::ConfigError { .. }
                | ProviderError::MissingConfigError { .. }
                | ProviderError::InvalidConfigValueError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
