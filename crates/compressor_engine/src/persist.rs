use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Numbered variants tried before giving up on a free name.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("no free file name for {0} in the download directory")]
    NameTaken(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the download directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// A download being streamed into a hidden `.part` file next to its final
/// location.
///
/// Nothing appears under the real name until [`PartialDownload::commit`].
/// Dropping an uncommitted download deletes the partial file.
pub struct PartialDownload {
    dir: PathBuf,
    filename: String,
    tmp: NamedTempFile,
    written: u64,
}

impl PartialDownload {
    pub fn create(dir: &Path, filename: &str) -> Result<Self, PersistError> {
        ensure_output_dir(dir)?;
        let tmp = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".part")
            .tempfile_in(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            filename: filename.to_string(),
            tmp,
            written: 0,
        })
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Sync and move into place. An existing file is never replaced: the
    /// download lands as `name (1).pdf`, `name (2).pdf`, ... instead.
    pub fn commit(self) -> Result<PathBuf, PersistError> {
        let Self {
            dir,
            filename,
            mut tmp,
            ..
        } = self;
        tmp.flush()?;
        tmp.as_file().sync_all()?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let target = dir.join(numbered_name(&filename, attempt));
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => tmp = err.file,
                Err(err) => return Err(PersistError::Io(err.error)),
            }
        }
        Err(PersistError::NameTaken(filename))
    }
}

fn numbered_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({attempt}).{ext}"),
        _ => format!("{filename} ({attempt})"),
    }
}
