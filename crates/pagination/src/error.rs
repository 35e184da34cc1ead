use thiserror::Error;

/// Errors surfaced to the endpoint layer. All of them are caller-input
/// errors except `Provider`, which wraps the store's own failure.
#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("Invalid per_page value '{value}': expected an integer between 1 and {max}")]
    InvalidLimit { value: String, max: usize },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Failed to encode cursor: {0}")]
    CursorEncode(#[source] CursorCodecError),

    #[error("Result provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl PaginationError {
    /// Name of the query parameter that caused the error, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PaginationError::InvalidLimit { .. } => Some("per_page"),
            PaginationError::InvalidCursor(_) => Some("cursor"),
            PaginationError::CursorEncode(_) | PaginationError::Provider(_) => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.field().is_some()
    }
}

impl From<CursorCodecError> for PaginationError {
    fn from(err: CursorCodecError) -> Self {
        PaginationError::InvalidCursor(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorCodecError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not valid base64: {0}")]
    Base64(String),

    #[error("cursor payload is malformed: {0}")]
    Payload(String),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to read results: {0}")]
    Read(String),

    #[error("Invalid ordering configuration: {0}")]
    Config(String),
}
