use stockcast_view::{NormalizeError, QueryError};
use thiserror::Error;

pub const NETWORK_FAILURE: &str = "Failed to fetch prediction";
pub const PARSE_FAILURE: &str = "Failed to parse server response";

/// Everything that can go wrong between the predict action and the rendered result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    #[error("invalid API base URL '{base}': {source}")]
    InvalidBaseUrl {
        base: String,
        #[source]
        source: url::ParseError,
    },

    /// The request could not complete (DNS, refused connection, dropped body, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server signalled failure, either in the body or with a non-2xx status.
    #[error("{0}")]
    Server(String),

    #[error("malformed response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

impl From<NormalizeError> for FetchError {
    fn from(e: NormalizeError) -> Self {
        match e {
            NormalizeError::Server(message) => FetchError::Server(message),
            NormalizeError::MalformedResponse(e) => FetchError::MalformedResponse(e),
        }
    }
}

impl FetchError {
    /// The single line shown to the user. Server messages pass through verbatim; transport and
    /// parse failures get a fixed message instead of internals.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Server(message) => message.clone(),
            FetchError::Network(_) => NETWORK_FAILURE.to_string(),
            FetchError::MalformedResponse(_) => PARSE_FAILURE.to_string(),
            FetchError::InvalidQuery(_) | FetchError::InvalidBaseUrl { .. } => self.to_string(),
        }
    }
}
