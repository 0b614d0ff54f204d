//! Error types for amocrm-client.

/// Result type alias for amocrm-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for amocrm-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the server answered with a non-2xx status.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Http { .. })
    }

    /// Returns true if a non-empty response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Json(_))
    }

    /// Returns true if a well-formed response carried no record.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NoRecord)
    }

    /// Returns true if the request was refused before any I/O because no
    /// access token is installed.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// HTTP status of a transport error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body of a transport error.
    pub fn body(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Malformed caller input, detected before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No access token is installed.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Server answered with a non-2xx status.
    #[error("HTTP error: {status}{}", preview(body))]
    Http { status: u16, body: String },

    /// Non-empty response body is not valid JSON for the target type.
    #[error("JSON error: {0}")]
    Json(String),

    /// Response decoded fine but holds no record.
    #[error("no such record")]
    NoRecord,

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

const BODY_PREVIEW_LEN: usize = 200;

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut out = String::from(": ");
    let mut chars = trimmed.chars();
    out.extend(chars.by_ref().take(BODY_PREVIEW_LEN));
    if chars.next().is_some() {
        out.push_str("...[truncated]");
    }
    out
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_builder() {
            ErrorKind::InvalidUrl(err.to_string())
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
