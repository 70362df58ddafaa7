use std::fmt;
use std::path::PathBuf;

pub type RequestId = u64;

/// A file on disk to be sent as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    UploadCompleted {
        request_id: RequestId,
        result: Result<UploadOutput, RequestError>,
    },
    CallCompleted {
        request_id: RequestId,
        result: Result<ApiOutput, RequestError>,
    },
}

/// What the endpoint answered. The body is parsed as JSON whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutput {
    pub status: u16,
    pub body: serde_json::Value,
    pub bytes_sent: u64,
}

/// Answer of a JSON API call, again parsed whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiOutput {
    pub status: u16,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for RequestError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    ReadFile,
    Network,
    Timeout,
    InvalidJson,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::ReadFile => write!(f, "could not read file"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::InvalidJson => write!(f, "response is not valid json"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
