use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartTicker,
    StopTicker,
    StartCompression {
        job_id: crate::JobId,
        source: PathBuf,
        file_name: String,
        target_mb: u32,
    },
    CancelCompression {
        job_id: crate::JobId,
    },
    Download {
        reference: crate::DownloadRef,
    },
}
