// Error taxonomy shared by the word source, the API client and the importer.
// The binary wraps these in `anyhow` at the edges.

use thiserror::Error;

/// Everything that can go wrong while talking to the vocabulary service or
/// reading the word list.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connectivity problem or a non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),

    /// The body could not be parsed as JSON at all.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Valid JSON, but not the shape we expected (or an explicit `error`).
    #[error("unexpected response from service{}", display_message(.message))]
    Protocol { message: Option<String> },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn protocol(message: impl Into<String>) -> Self {
        ServiceError::Protocol {
            message: Some(message.into()),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Network(err.to_string())
    }
}

fn display_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}
