//! Error types for amocrm-auth.
//!
//! Error messages never include token or secret values.

/// Result type alias for amocrm-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for amocrm-auth operations.
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

    /// Returns true if no usable token is installed or stored.
    pub fn is_invalid_token(&self) -> bool {
        matches!(self.kind, ErrorKind::TokenInvalid(_))
    }

    /// Returns true if token storage could not be read or written.
    pub fn is_storage(&self) -> bool {
        matches!(self.kind, ErrorKind::Io(_) | ErrorKind::Storage(_))
    }

    /// Returns true if the vendor refused a grant.
    pub fn is_oauth(&self) -> bool {
        matches!(self.kind, ErrorKind::OAuth { .. })
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The token endpoint refused the grant.
    #[error("OAuth error: {status} - {description}")]
    OAuth { status: u16, description: String },

    /// No usable token.
    #[error("{0}")]
    TokenInvalid(String),

    /// A grant that cannot be attempted, such as an empty authorization code.
    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    /// Malformed caller input, detected before any I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport failure while talking to the token endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Token storage I/O failure.
    #[error("IO error: {0}")]
    Io(String),

    /// Token storage holds something that is not a token.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Environment variable not set.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(err.to_string()), err)
    }
}

impl From<amocrm_client::Error> for Error {
    fn from(err: amocrm_client::Error) -> Self {
        use amocrm_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
            ClientKind::Validation(msg) => ErrorKind::InvalidInput(msg.clone()),
            ClientKind::Json(msg) => ErrorKind::Json(msg.clone()),
            ClientKind::Config(msg) | ClientKind::InvalidUrl(msg) => ErrorKind::Config(msg.clone()),
            // Transport messages may echo request bodies carrying the code.
            _ => ErrorKind::Http(match err.status() {
                Some(status) => format!("status {status}"),
                None => "token endpoint unreachable".to_string(),
            }),
        };
        Error::with_source(kind, err)
    }
}
