//! Fetch pipeline: parse levels, fetch each level, extract and group

use super::SentenceHarvester;
use crate::error::{Error, Result};
use crate::levels::{LevelSpec, parse_levels};
use crate::types::{Event, LevelResults};
use std::sync::Arc;
use tracing::{info, warn};

impl SentenceHarvester {
    /// Fetch and extract example sentences for every level in `spec`
    ///
    /// `spec` uses the level syntax of [`parse_levels`], e.g. `"4,5-7,15"`.
    /// Levels are fetched one after another, each through every page. Levels
    /// whose subjects yield no sentences are left out of the result.
    ///
    /// The operation is all-or-nothing: on any error no partial result is
    /// returned and [`latest_results`](Self::latest_results) is cleared.
    ///
    /// # Errors
    /// - [`Error::InvalidLevels`] if `spec` contains no valid level (no request is made)
    /// - [`Error::MissingCredential`] if no token is configured (no request is made)
    /// - [`Error::Http`], [`Error::Network`], [`Error::Pagination`] or
    ///   [`Error::Serialization`] from the upstream API
    pub async fn fetch_levels(&self, spec: &str) -> Result<LevelResults> {
        let outcome = self.try_fetch_levels(spec).await;

        match &outcome {
            Ok(results) => {
                *self.latest.write().await = Some(Arc::new(results.clone()));
                info!(
                    levels = results.len(),
                    sentences = results.sentence_count(),
                    "fetch complete"
                );
                self.emit_event(Event::FetchCompleted {
                    levels: results.levels().collect(),
                    sentences: results.sentence_count(),
                });
            }
            Err(e) => {
                *self.latest.write().await = None;
                warn!(error = %e, "fetch failed");
                self.emit_event(Event::FetchFailed {
                    error: e.to_string(),
                });
            }
        }

        outcome
    }

    async fn try_fetch_levels(&self, spec: &str) -> Result<LevelResults> {
        let levels = parse_levels(spec);
        if levels.is_empty() {
            return Err(Error::InvalidLevels {
                input: spec.to_string(),
            });
        }

        let token = self.credentials.get()?.ok_or(Error::MissingCredential)?;

        info!(levels = %levels, "fetching levels");
        self.emit_event(Event::FetchStarted {
            levels: levels.to_vec(),
        });

        self.fetch_spec(&levels, &token).await
    }

    async fn fetch_spec(&self, levels: &LevelSpec, token: &str) -> Result<LevelResults> {
        let mut results = LevelResults::new();

        for level in levels {
            let mut page = 0usize;
            let subjects = self
                .client
                .fetch_level(token, level, |total| {
                    page += 1;
                    self.emit_event(Event::PageFetched { level, page, total });
                })
                .await?;

            let groups = self.extractor.group_all(&subjects);
            self.emit_event(Event::LevelFetched {
                level,
                subjects: subjects.len(),
                groups: groups.len(),
            });
            results.insert(level, groups);
        }

        Ok(results)
    }
}
