use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub type JobId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressRequest {
    pub job_id: JobId,
    /// File whose bytes are uploaded.
    pub source: PathBuf,
    /// Name sent with the multipart `file` field.
    pub file_name: String,
    pub target_mb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Path and query relative to the service root, e.g. `download/<id>?filename=...`.
    pub relative_url: String,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Success,
    PartialSuccess,
    AlreadyUnderTarget,
}

/// Success body of `POST /compress`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompressedFile {
    pub filename: String,
    pub original_mb: f64,
    pub compressed_mb: f64,
    pub ratio: f64,
    pub download_id: String,
    pub status: ReplyStatus,
    /// Not sent for files that were already under target.
    #[serde(default)]
    pub target_mb: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    CompressionCompleted {
        job_id: JobId,
        result: Result<CompressedFile, ServiceError>,
    },
    DownloadCompleted {
        filename: String,
        result: Result<PathBuf, ServiceError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The service answered with an `{ "error": ... }` body.
    Service,
    HttpStatus(u16),
    /// The whole request outlived the configured ceiling.
    Timeout { after: Duration },
    Cancelled,
    Network,
    InvalidResponse,
    InvalidUrl,
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Service => write!(f, "service error"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout { after } => write!(f, "timeout after {after:?}"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
