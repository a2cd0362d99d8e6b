//! Snapshot directory source
//!
//! Records are stored one per file as `<hex address>.<extension>`.

use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use super::AccountSource;
use crate::error::{BookError, Result};
use crate::layout::RecordAddress;

/// Reads record snapshots from a directory
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    extension: String,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Path where the snapshot for `address` lives
    pub fn path_for(&self, address: &RecordAddress) -> PathBuf {
        self.dir.join(format!("{}.{}", address, self.extension))
    }
}

#[async_trait]
impl AccountSource for FileSource {
    async fn fetch_bytes(&self, address: &RecordAddress) -> Result<Option<Bytes>> {
        let path = self.path_for(address);

        match tokio::fs::read(&path).await {
            Ok(data) => {
                debug!(path = %path.display(), len = data.len(), "Read snapshot");
                Ok(Some(Bytes::from(data)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot for address");
                Ok(None)
            }
            Err(e) => Err(BookError::Transport(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
