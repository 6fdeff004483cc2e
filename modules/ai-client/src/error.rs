use thiserror::Error;

/// Result type alias for chat-completions operations.
pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chat API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A success response whose body is not the expected
    /// `choices[0].message.content` envelope. Carries the raw body so
    /// callers can log it.
    #[error("Response envelope did not match the expected shape: {raw}")]
    Envelope { raw: String },

    #[error("Invalid API key: {0}")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),
}
