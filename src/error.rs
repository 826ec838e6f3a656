use thiserror::Error;

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Remote store unavailable while {operation}: {cause}")]
    RemoteUnavailable { operation: String, cause: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unexpected sheet layout: {0}")]
    DecodeAnomaly(String),

    #[error("Spreadsheet transcoding error: {0}")]
    Transcode(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PortalError {
    /// Wrap a transport failure for the given remote operation.
    pub fn remote(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        PortalError::RemoteUnavailable {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}
