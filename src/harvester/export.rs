//! Export pipeline: serialize, queue, deliver

use super::SentenceHarvester;
use crate::delivery::{DeliveryQueue, DeliveryReport};
use crate::error::{Error, Result};
use crate::export::{self, ExportMode};
use crate::types::{Event, LevelResults};
use tracing::info;

impl SentenceHarvester {
    /// Serialize `results` in `mode` and deliver the files to the sink
    ///
    /// Text modes follow the configured `export.layout`. Files are delivered
    /// in order with `export.file_delay` between them.
    ///
    /// # Errors
    /// Returns the first serialization or delivery error; files after the
    /// failing one are not delivered.
    pub async fn export(&self, results: &LevelResults, mode: ExportMode) -> Result<DeliveryReport> {
        let files = export::serialize(results, mode, self.config.export.layout)?;
        if files.is_empty() {
            info!(mode = %mode, "nothing to export");
        }

        let mut queue = DeliveryQueue::new(self.config.export.file_delay);
        queue.extend(files);

        let report = queue
            .run_with(self.sink.as_ref(), |file| {
                self.emit_event(Event::FileDelivered {
                    filename: file.filename.clone(),
                    bytes: file.bytes,
                });
            })
            .await?;

        self.emit_event(Event::ExportCompleted {
            files: report.files.len(),
        });
        Ok(report)
    }

    /// Export the result of the last successful fetch
    ///
    /// # Errors
    /// Returns [`Error::NoResults`] if no fetch has succeeded since the last failure.
    pub async fn export_latest(&self, mode: ExportMode) -> Result<DeliveryReport> {
        let results = self.latest_results().await.ok_or(Error::NoResults)?;
        self.export(&results, mode).await
    }
}
