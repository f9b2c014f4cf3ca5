//! Multi-file export delivery
//!
//! Some hosts (browsers in particular) drop rapid back-to-back downloads, so
//! files of one export go through a [`DeliveryQueue`]: an ordered list handed
//! to a [`FileSink`] one at a time with a fixed pause between files.

mod directory;
mod memory;
mod traits;


pub use directory::DirectorySink;
pub use memory::MemorySink;
pub use traits::{DeliveryOutcome, FileSink};

use crate::error::{Error, Result};
use crate::export::ExportFile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One delivered file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredFile {
    /// File name
    pub filename: String,
    /// Payload size in bytes
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the payload
    pub sha256: String,
}

/// Outcome of a delivery run, in delivery order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Files the sink actually delivered
    pub files: Vec<DeliveredFile>,
    /// Names of files the sink skipped
    #[serde(default)]
    pub skipped: Vec<String>,
}

impl DeliveryReport {
    /// Names of the delivered files
    pub fn filenames(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.filename.as_str()).collect()
    }

    /// Total bytes delivered
    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.bytes).sum()
    }
}

/// Ordered queue of files delivered with a fixed delay between them
#[derive(Debug)]
pub struct DeliveryQueue {
    files: Vec<ExportFile>,
    delay: Duration,
}

impl DeliveryQueue {
    /// Empty queue pausing `delay` between files
    pub fn new(delay: Duration) -> Self {
        Self {
            files: Vec::new(),
            delay,
        }
    }

    /// Append one file
    pub fn push(&mut self, file: ExportFile) {
        self.files.push(file);
    }

    /// Number of queued files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Deliver every queued file to `sink`
    ///
    /// See [`run_with`](Self::run_with).
    pub async fn run(self, sink: &dyn FileSink) -> Result<DeliveryReport> {
        self.run_with(sink, |_| {}).await
    }

    /// Deliver every queued file to `sink`, calling `on_delivered` after each
    ///
    /// Files go out in queue order, one sink call each, with the configured
    /// delay between consecutive files and none after the last. Files the
    /// sink reports as skipped land in [`DeliveryReport::skipped`] and do not
    /// reach `on_delivered`.
    ///
    /// # Errors
    ///
    /// - [`Error::Delivery`] if two queued files share a name (nothing is delivered)
    /// - the first sink error; remaining files are not delivered
    pub async fn run_with(
        self,
        sink: &dyn FileSink,
        mut on_delivered: impl FnMut(&DeliveredFile),
    ) -> Result<DeliveryReport> {
        if let Some(duplicate) = first_duplicate(&self.files) {
            return Err(Error::Delivery(format!(
                "duplicate filename '{}' in one export",
                duplicate
            )));
        }

        let total = self.files.len();
        let mut report = DeliveryReport::default();

        for (index, file) in self.files.into_iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match sink.deliver(&file).await {
                Ok(DeliveryOutcome::Delivered) => {}
                Ok(DeliveryOutcome::Skipped) => {
                    debug!(sink = sink.name(), filename = %file.filename, "sink skipped file");
                    report.skipped.push(file.filename);
                    continue;
                }
                Err(e) => {
                    warn!(
                        sink = sink.name(),
                        filename = %file.filename,
                        attempted = index,
                        total,
                        error = %e,
                        "delivery aborted"
                    );
                    return Err(e);
                }
            }

            let delivered = DeliveredFile {
                sha256: file.sha256(),
                bytes: file.len(),
                filename: file.filename,
            };
            debug!(
                sink = sink.name(),
                filename = %delivered.filename,
                bytes = delivered.bytes,
                "delivered file"
            );
            on_delivered(&delivered);
            report.files.push(delivered);
        }

        info!(
            sink = sink.name(),
            delivered = report.files.len(),
            skipped = report.skipped.len(),
            "delivery complete"
        );
        Ok(report)
    }
}

fn first_duplicate(files: &[ExportFile]) -> Option<&str> {
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|f| f.filename.as_str())
        .find(|name| !seen.insert(*name))
}

impl Extend<ExportFile> for DeliveryQueue {
    fn extend<I: IntoIterator<Item = ExportFile>>(&mut self, iter: I) {
        self.files.extend(iter);
    }
}
