//! Sink that writes files into a directory

use super::traits::{DeliveryOutcome, FileSink};
use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use crate::export::ExportFile;
use crate::utils::{get_unique_path, is_safe_filename};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes every delivered file into `dir`, creating it on first use
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    collision: FileCollisionAction,
}

impl DirectorySink {
    /// Sink writing into `dir`
    pub fn new(dir: impl Into<PathBuf>, collision: FileCollisionAction) -> Self {
        Self {
            dir: dir.into(),
            collision,
        }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileSink for DirectorySink {
    async fn deliver(&self, file: &ExportFile) -> Result<DeliveryOutcome> {
        if !is_safe_filename(&file.filename) {
            return Err(Error::Delivery(format!(
                "refusing to write '{}': not a plain file name",
                file.filename
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let wanted = self.dir.join(&file.filename);
        let Some(path) = get_unique_path(&wanted, self.collision)? else {
            info!(path = %wanted.display(), "file exists, skipping");
            return Ok(DeliveryOutcome::Skipped);
        };

        tokio::fs::write(&path, &file.payload).await?;
        debug!(path = %path.display(), bytes = file.len(), "wrote export file");
        Ok(DeliveryOutcome::Delivered)
    }

    fn name(&self) -> &str {
        "directory"
    }
}
