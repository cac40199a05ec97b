use thiserror::Error;

/// Message used when the server flags a failure without saying why.
pub const DEFAULT_SERVER_ERROR: &str = "Server returned an error";

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The server explicitly signalled failure; the message is shown verbatim.
    #[error("{0}")]
    Server(String),

    /// The body was not JSON (e.g. an HTML error page), or was JSON of the wrong shape.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Missing 'symbol'")]
    EmptySymbol,

    #[error("Invalid start date '{0}'; expected YYYY-MM-DD")]
    InvalidDate(String),
}
