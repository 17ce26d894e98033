use std::path::PathBuf;

/// Largest upload the service accepts (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

const DOCUMENT_EXTENSION: &str = ".pdf";

/// A validated file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub size_bytes: u64,
    /// Where the engine reads the raw bytes from when the job starts.
    pub source: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Please select a PDF file.")]
    WrongType,
    #[error("File is too large. Maximum size is 100 MB.")]
    TooLarge,
    /// The picked path could not be inspected at all.
    #[error("Cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Validate a picked file. The extension check runs before the size check.
pub fn submit_file(
    name: impl Into<String>,
    size_bytes: u64,
    source: impl Into<PathBuf>,
) -> Result<CandidateFile, IntakeError> {
    let name = name.into();
    if !name.to_lowercase().ends_with(DOCUMENT_EXTENSION) {
        return Err(IntakeError::WrongType);
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(IntakeError::TooLarge);
    }
    Ok(CandidateFile {
        name,
        size_bytes,
        source: source.into(),
    })
}

pub fn format_file_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < MIB {
        format!("{:.1} KB", value / KIB)
    } else {
        format!("{:.2} MB", value / MIB)
    }
}
