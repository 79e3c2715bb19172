use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown continuation cursor: {0}")]
    UnknownCursor(String),

    #[error("Unknown message id: {0}")]
    UnknownMessage(u64),
}

impl From<async_imap::error::Error> for HostError {
    fn from(e: async_imap::error::Error) -> Self {
        HostError::Imap(e.to_string())
    }
}

impl From<async_native_tls::Error> for HostError {
    fn from(e: async_native_tls::Error) -> Self {
        HostError::Tls(e.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BulkDeleteError {
    #[error("Invalid email format: {0}")]
    InvalidAddressFormat(String),

    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    #[error("A delete is already in progress")]
    DeleteInProgress,

    #[error(transparent)]
    Host(#[from] HostError),
}
