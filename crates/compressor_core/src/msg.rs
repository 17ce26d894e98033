use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a file on the intake surface.
    FileChosen {
        name: String,
        size_bytes: u64,
        source: PathBuf,
    },
    /// The picked file could not be opened or inspected.
    FileUnreadable { path: PathBuf, reason: String },
    /// User removed the picked file.
    FileCleared,
    /// User chose a compression target.
    TargetSelected(crate::Target),
    /// User clicked Compress.
    CompressClicked,
    /// Progress timer tick carrying a uniform roll in `[0, 1)`.
    Tick { roll: f64 },
    /// Engine finished (or gave up on) a compression request.
    CompressionFinished {
        job_id: crate::JobId,
        result: Result<crate::OutcomeRecord, crate::JobFailure>,
    },
    /// User clicked Download on the result surface.
    DownloadClicked,
    /// Engine finished saving the compressed file.
    DownloadFinished { result: Result<PathBuf, String> },
    /// User asked to start over.
    ResetClicked,
}
