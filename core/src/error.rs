use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for r2sign operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    response: Option<ResponseDetail>,
    #[source]
    source: Option<anyhow::Error>,
}

/// Status and body text of a non-success response.
#[derive(Debug, Clone)]
struct ResponseDetail {
    status: StatusCode,
    body: String,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing or empty required values)
    ConfigInvalid,

    /// Object key or header cannot be encoded into a valid request
    EncodingInvalid,

    /// Upload got a non-2xx response
    UploadFailed,

    /// Download got a non-2xx response
    DownloadFailed,

    /// Delete got a non-2xx, non-404 response
    DeleteFailed,

    /// Unexpected errors (network, I/O, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            response: None,
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status of the failed response, if this error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        self.response.as_ref().map(|r| r.status)
    }

    /// Body text of the failed response, if this error came from one.
    pub fn response_body(&self) -> Option<&str> {
        self.response.as_ref().map(|r| r.body.as_str())
    }

    /// Check if this error was caused by a non-success response.
    pub fn is_response_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UploadFailed | ErrorKind::DownloadFailed | ErrorKind::DeleteFailed
        )
    }

    fn with_response(mut self, status: StatusCode, body: impl Into<String>) -> Self {
        self.response = Some(ResponseDetail {
            status,
            body: body.into(),
        });
        self
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an encoding invalid error
    pub fn encoding_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EncodingInvalid, message)
    }

    /// Create an upload failed error carrying the response status and body
    pub fn upload_failed(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::UploadFailed,
            format!("upload failed with status {status}"),
        )
        .with_response(status, body)
    }

    /// Create a download failed error carrying the response status and body
    pub fn download_failed(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::DownloadFailed,
            format!("download failed with status {status}"),
        )
        .with_response(status, body)
    }

    /// Create a delete failed error carrying the response status and body
    pub fn delete_failed(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::DeleteFailed,
            format!("delete failed with status {status}"),
        )
        .with_response(status, body)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::EncodingInvalid => write!(f, "invalid encoding"),
            ErrorKind::UploadFailed => write!(f, "upload failed"),
            ErrorKind::DownloadFailed => write!(f, "download failed"),
            ErrorKind::DeleteFailed => write!(f, "delete failed"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::encoding_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::encoding_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::encoding_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::encoding_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
