//! Compressor engine: talks to the compression service and saves results.
mod client;
mod engine;
mod filename;
mod persist;
mod types;

pub use client::{CompressionService, ReqwestCompressionService, ServiceSettings};
pub use engine::{EngineEvents, EngineHandle};
pub use filename::sanitize_filename;
pub use persist::{ensure_output_dir, PartialDownload, PersistError};
pub use types::{
    CompressRequest, CompressedFile, DownloadRequest, EngineEvent, FailureKind, JobId,
    ReplyStatus, ServiceError,
};
