//! In-memory sink

use super::traits::{DeliveryOutcome, FileSink};
use crate::error::Result;
use crate::export::ExportFile;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Keeps delivered files in memory, in delivery order
///
/// Useful when the embedding application hands files to its own UI, and in
/// tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<ExportFile>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every file delivered so far
    pub async fn files(&self) -> Vec<ExportFile> {
        self.files.lock().await.clone()
    }

    /// Names of every file delivered so far
    pub async fn filenames(&self) -> Vec<String> {
        self.files
            .lock()
            .await
            .iter()
            .map(|f| f.filename.clone())
            .collect()
    }

    /// Drop all collected files
    pub async fn clear(&self) {
        self.files.lock().await.clear();
    }
}

#[async_trait]
impl FileSink for MemorySink {
    async fn deliver(&self, file: &ExportFile) -> Result<DeliveryOutcome> {
        self.files.lock().await.push(file.clone());
        Ok(DeliveryOutcome::Delivered)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
