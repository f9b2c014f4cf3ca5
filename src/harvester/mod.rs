//! The `SentenceHarvester` and its operations, split by concern:
//! - [`fetch`] - level parsing, paginated fetch and extraction
//! - [`export`] - serialization and paced delivery

mod export;
mod fetch;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::client::SubjectClient;
use crate::config::Config;
use crate::credentials::{self, CredentialStore};
use crate::delivery::{DirectorySink, FileSink};
use crate::error::Result;
use crate::extraction::SentenceExtractor;
use crate::types::{Event, LevelResults};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Capacity of the event channel; slow subscribers lag instead of blocking
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Fetches example sentences by level and exports them
///
/// Cheap to clone; clones share the event channel and the latest result.
#[derive(Clone)]
pub struct SentenceHarvester {
    config: Arc<Config>,
    client: SubjectClient,
    credentials: Arc<dyn CredentialStore>,
    sink: Arc<dyn FileSink>,
    extractor: Arc<SentenceExtractor>,
    event_tx: broadcast::Sender<Event>,
    /// Result of the last successful fetch; cleared when a fetch fails
    latest: Arc<RwLock<Option<Arc<LevelResults>>>>,
}

impl SentenceHarvester {
    /// Create a harvester from `config`
    ///
    /// Uses a [`DirectorySink`] on `export.output_dir` and the credential store
    /// selected by `credentials.source`. Nothing touches the network or the
    /// filesystem until an operation runs.
    ///
    /// # Errors
    /// Returns [`Error::Config`](crate::Error::Config) if validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = SubjectClient::new(&config.api)?;
        let credentials = credentials::from_config(&config.credentials);
        let sink: Arc<dyn FileSink> = Arc::new(DirectorySink::new(
            config.export.output_dir.clone(),
            config.export.file_collision,
        ));
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tracing::debug!(
            base_url = %config.api.base_url,
            credentials = ?config.credentials.source,
            output_dir = %config.export.output_dir.display(),
            "sentence harvester created"
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            credentials,
            sink,
            extractor: Arc::new(SentenceExtractor::new()),
            event_tx,
            latest: Arc::new(RwLock::new(None)),
        })
    }

    /// Replace the delivery sink
    pub fn with_sink(mut self, sink: Arc<dyn FileSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the credential store
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Replace the sentence extractor
    pub fn with_extractor(mut self, extractor: SentenceExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Subscribe to harvester events
    ///
    /// Events sent before subscribing are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Credential store in use
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Result of the last successful fetch
    ///
    /// `None` before the first fetch and after any failed one.
    pub async fn latest_results(&self) -> Option<Arc<LevelResults>> {
        self.latest.read().await.clone()
    }

    pub(crate) fn emit_event(&self, event: Event) {
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.event_tx.send(event).ok();
    }
}

impl std::fmt::Debug for SentenceHarvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceHarvester")
            .field("config", &self.config)
            .field("client", &self.client)
            .field("sink", &self.sink.name())
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}
