use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use iconset_core::SiteResult;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("target directory missing or not writable: {0}")]
    TargetDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read raw dataset {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("raw dataset {path:?} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot serialize raw dataset: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("cannot write raw dataset {path:?}: {source}")]
    Write { path: PathBuf, source: PersistError },
}

/// Atomically replaces a file by writing a sibling temp file then renaming it.
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    /// Fails unless the directory the target lives in exists.
    pub fn check_target(&self) -> Result<&Path, PersistError> {
        let dir = match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(PersistError::TargetDir(format!("{} is not a directory", dir.display())))
        }
    }

    pub fn write(&self, content: &str) -> Result<PathBuf, PersistError> {
        let dir = self.check_target()?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;

        // Rename over the target; readers see the old file or the new one.
        tmp.persist(&self.target).map_err(|err| PersistError::Io(err.error))?;
        Ok(self.target.clone())
    }
}

/// Fail early when `path` could never be written, before any crawling.
pub fn check_dataset_target(path: &Path) -> Result<(), DatasetError> {
    AtomicFileWriter::new(path.to_path_buf())
        .check_target()
        .map(|_| ())
        .map_err(|source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Save the raw dataset as a pretty JSON array.
pub fn save_site_results(path: &Path, results: &[SiteResult]) -> Result<(), DatasetError> {
    let content = serde_json::to_string_pretty(results)?;
    AtomicFileWriter::new(path.to_path_buf())
        .write(&content)
        .map_err(|source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    engine_info!("Saved raw icon data for {} sites to {:?}", results.len(), path);
    Ok(())
}

pub fn load_site_results(path: &Path) -> Result<Vec<SiteResult>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let results: Vec<SiteResult> =
        serde_json::from_str(&content).map_err(|source| DatasetError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    engine_info!("Loaded raw icon data for {} sites from {:?}", results.len(), path);
    Ok(results)
}
