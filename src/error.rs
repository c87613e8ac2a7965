use thiserror::Error;

/// SDS client error types
#[derive(Error, Debug)]
pub enum SdsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Service error: {status}:{message}")]
    Service { status: u16, message: String },

    #[error("Failed to retrieve token")]
    TokenUnavailable,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Result type for SDS operations
pub type SdsResult<T> = Result<T, SdsError>;

impl SdsError {
    /// Create a service error from a status code and response text
    pub fn service_error(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth_error(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_param(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// HTTP status carried by the error, if the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Auth(_) => Some(401),
            Self::PermissionDenied(_) => Some(403),
            Self::ObjectNotFound(_) => Some(404),
            Self::InvalidParameter(_) => Some(400),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
