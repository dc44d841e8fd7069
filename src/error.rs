use thiserror::Error;

/// Failure classes for one outbound API call.
///
/// The ingestion layer treats every variant as "no updates this cycle";
/// the taxonomy exists for diagnostics and tests, not for branching.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("malformed request URL: {0}")]
    BadUrl(String),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("API error: {0}")]
    Api(String),

    #[error("unsupported protocol: {0}")]
    Unsupported(String),

    #[error("transport failure: {0}")]
    Unknown(String),
}

/// Failure classes for decoding one update or one of its sub-objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),

    #[error("update is neither a message nor a callback query")]
    UnknownKind,
}
