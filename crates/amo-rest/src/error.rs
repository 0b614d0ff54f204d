//! Error types for amocrm-rest.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Returns true if the server answered with a non-2xx status.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport { .. })
    }

    /// Returns true if a non-empty body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Decode(_))
    }

    /// Returns true if the answer decoded fine but held no record.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound)
    }

    /// Returns true for authorization failures (no token, refused grant).
    pub fn is_auth(&self) -> bool {
        matches!(self.kind, ErrorKind::Auth(_))
    }

    /// Returns true if the request never got an answer.
    pub fn is_connection(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout | ErrorKind::Connection(_))
    }

    /// HTTP status of a transport error.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Transport { status, .. } => Some(status),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("Transport error: {status}")]
    Transport { status: u16, body: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("no such record")]
    NotFound,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Request timeout")]
    Timeout,
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Client error: {0}")]
    Client(String),
}

impl From<amocrm_client::Error> for Error {
    fn from(err: amocrm_client::Error) -> Self {
        use amocrm_client::ErrorKind as ClientKind;

        let kind = match &err.kind {
            ClientKind::Http { status, body } => ErrorKind::Transport {
                status: *status,
                body: body.clone(),
            },
            ClientKind::Json(msg) => ErrorKind::Decode(msg.clone()),
            ClientKind::NoRecord => ErrorKind::NotFound,
            ClientKind::Authentication(msg) => ErrorKind::Auth(msg.clone()),
            ClientKind::Validation(msg) => ErrorKind::Validation(msg.clone()),
            ClientKind::Timeout => ErrorKind::Timeout,
            ClientKind::Connection(msg) => ErrorKind::Connection(msg.clone()),
            other => ErrorKind::Client(other.to_string()),
        };
        Error { kind, source: Some(Box::new(err)) }
    }
}

impl From<amocrm_auth::Error> for Error {
    fn from(err: amocrm_auth::Error) -> Self {
        use amocrm_auth::ErrorKind as AuthKind;

        let kind = match &err.kind {
            AuthKind::InvalidInput(msg) => ErrorKind::Validation(msg.clone()),
            AuthKind::Io(msg) | AuthKind::Storage(msg) => ErrorKind::Storage(msg.clone()),
            other => ErrorKind::Auth(other.to_string()),
        };
        Error { kind, source: Some(Box::new(err)) }
    }
}
