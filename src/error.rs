/// Error types for OAuth 1.0a handshake and resource operations
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OAuthError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid response from provider: {0}")]
    Protocol(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Signature computation failed: {0}")]
    Signature(String),

    #[error("Token ({0}) is unknown or was already consumed")]
    UnknownToken(String),

    #[error("JSON decoding failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OAuthError {
    /// Whether the failure happened on the wire or at the HTTP layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }

    /// Whether the provider answered with something we could not use
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_) | Self::MissingField(_))
    }
}

pub type Result<T> = std::result::Result<T, OAuthError>;
