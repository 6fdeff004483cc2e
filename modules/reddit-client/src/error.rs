use thiserror::Error;

/// Result type alias for Reddit API operations.
pub type Result<T> = std::result::Result<T, RedditError>;

#[derive(Debug, Error)]
pub enum RedditError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Token exchange failed: {0}")]
    Auth(String),
}
