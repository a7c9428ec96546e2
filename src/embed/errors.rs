// Error types for provider fetches and cache access

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EmbedError {
    /// Input could not be parsed into a URL with a host
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Upstream did not answer within the client timeout
    #[error("Network timeout: {0}")]
    Timeout(String),

    /// Connection, TLS or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Response body was not the JSON we expected
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON parsed but the thumbnail field was absent or empty
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Provider needs a token that is not configured
    #[error("Missing credentials for {0}")]
    MissingCredentials(&'static str),

    /// Bytes could not be introspected as an image
    #[error("Image error: {0}")]
    Image(String),

    /// Configured host regex does not compile
    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),

    /// Cache store read/write failure
    #[error("Cache error: {0}")]
    Cache(String),
}

impl EmbedError {
    /// Whether the failure came from the remote side rather than local state
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_)
                | Self::Transport(_)
                | Self::Status { .. }
                | Self::Parse(_)
                | Self::MissingField(_)
                | Self::Image(_)
        )
    }
}

impl From<reqwest::Error> for EmbedError {
    fn from(e: reqwest::Error) -> Self {
        let target = e
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        if e.is_timeout() {
            return Self::Timeout(target);
        }

        if let Some(status) = e.status() {
            return Self::Status {
                url: target,
                status: status.as_u16(),
            };
        }

        if e.is_decode() {
            return Self::Parse(e.to_string());
        }

        Self::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for EmbedError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<image::ImageError> for EmbedError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e.to_string())
    }
}

impl From<std::io::Error> for EmbedError {
    fn from(e: std::io::Error) -> Self {
        Self::Cache(e.to_string())
    }
}
