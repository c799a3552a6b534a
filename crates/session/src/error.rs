/// Errors from session state transitions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A send was attempted while a response is pending or streaming.
    #[error("A response is already in progress for this session")]
    Busy,

    /// The script is still generating.
    #[error("Script generation has not finished")]
    NotReady,

    /// Draft edits are only accepted in edit mode.
    #[error("The script draft can only be changed in edit mode")]
    NotEditing,
}

/// Errors from transcript persistence.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The sequence still holds a streaming placeholder.
    #[error("Refusing to persist a streaming placeholder")]
    Placeholder,

    #[error("History I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("History encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote history failed: {0}")]
    Remote(#[from] ClientError),

    /// No character with this name is known to the remote store.
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),
}

/// Errors from the stagecraft HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Server error ({status}): {body}")]
    Api { status: u16, body: String },
}
