//! Delivery sink trait

use crate::error::Result;
use crate::export::ExportFile;
use async_trait::async_trait;

/// What a sink did with one file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The file reached its destination
    Delivered,
    /// The sink chose not to deliver the file (e.g. it already exists)
    Skipped,
}

/// Destination for exported files
///
/// A sink receives one file per call. Implementations decide what
/// "delivered" means: written to disk, kept in memory, handed to a UI.
///
/// # Examples
///
/// ```no_run
/// use sentence_harvest::delivery::{DirectorySink, FileSink};
/// use sentence_harvest::export::{ExportFile, TEXT_MIME};
/// use sentence_harvest::config::FileCollisionAction;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sink = DirectorySink::new("exports", FileCollisionAction::Overwrite);
/// let file = ExportFile {
///     filename: "level-1-bilingual.txt".into(),
///     payload: "# 一 (2467)\n".as_bytes().to_vec(),
///     mime_type: TEXT_MIME,
/// };
/// sink.deliver(&file).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Deliver one file
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining files of the export.
    async fn deliver(&self, file: &ExportFile) -> Result<DeliveryOutcome>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
