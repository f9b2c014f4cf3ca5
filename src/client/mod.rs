//! Paginated subject fetching
//!
//! The upstream API returns collections one page at a time:
//!
//! ```json
//! { "data": [ ... ], "pages": { "next_url": "https://.../subjects?page_after_id=123" } }
//! ```
//!
//! [`SubjectClient::fetch_all`] follows `pages.next_url` until it is null or
//! missing. Each page's cursor is only known once that page is parsed, so
//! pages are requested strictly one after another.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::Subject;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

/// Header carrying the API revision the client was written against
pub const REVISION_HEADER: &str = "Wanikani-Revision";

/// One page of a paginated collection
///
/// `data` stays raw so one odd element cannot fail the whole page.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Page {
    #[serde(default)]
    pub(crate) data: Option<Value>,
    #[serde(default)]
    pub(crate) pages: Option<PageCursor>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageCursor {
    #[serde(default)]
    pub(crate) next_url: Option<String>,
}

impl Page {
    fn next_url(&self) -> Option<&str> {
        self.pages.as_ref()?.next_url.as_deref()
    }

    /// Raw elements of `data`; anything but an array is an empty page
    fn into_items(self) -> Vec<Value> {
        match self.data {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        }
    }
}

/// HTTP client for the subject collection
///
/// The bearer token is passed per call and never stored or logged.
#[derive(Clone, Debug)]
pub struct SubjectClient {
    http_client: reqwest::Client,
    base_url: Url,
    revision: Option<String>,
    subject_types: Vec<String>,
    max_pages: usize,
}

impl SubjectClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            revision: config.revision.clone(),
            subject_types: config
                .subject_types
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            max_pages: config.max_pages,
        })
    }

    /// URL of the first page of subjects for `level`
    ///
    /// `{base_url}/subjects?types={types}&levels={level}`
    pub fn subjects_url(&self, level: u32) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("subjects");

        {
            let mut query = url.query_pairs_mut();
            if !self.subject_types.is_empty() {
                query.append_pair("types", &self.subject_types.join(","));
            }
            query.append_pair("levels", &level.to_string());
        }

        Ok(url)
    }

    /// Fetch every subject of one level
    pub async fn fetch_level(
        &self,
        token: &str,
        level: u32,
        on_progress: impl FnMut(usize),
    ) -> Result<Vec<Subject>> {
        let url = self.subjects_url(level)?;
        let subjects = self.fetch_all(url.as_str(), token, on_progress).await?;
        info!(level, subjects = subjects.len(), "fetched level");
        Ok(subjects)
    }

    /// Fetch a paginated collection starting at `start_url`
    ///
    /// Pages are appended in order. `on_progress` receives the running total
    /// after every page. Elements that are not JSON objects are skipped; see
    /// [`Subject::from_json`] for how loose fields are read.
    ///
    /// # Errors
    /// - [`Error::Http`] on any non-success status (no retry)
    /// - [`Error::Network`] on transport failure or timeout
    /// - [`Error::Serialization`] if a body is not a JSON object
    /// - [`Error::Pagination`] if more than `max_pages` pages are chained
    pub async fn fetch_all(
        &self,
        start_url: &str,
        token: &str,
        mut on_progress: impl FnMut(usize),
    ) -> Result<Vec<Subject>> {
        let mut subjects = Vec::new();
        let mut next = Some(start_url.to_string());
        let mut pages = 0usize;
        let mut position = 0u64;

        while let Some(url) = next.take() {
            if pages >= self.max_pages {
                return Err(Error::Pagination(format!(
                    "gave up after {} pages, next cursor was {}",
                    pages, url
                )));
            }

            let page = self.fetch_page(&url, token).await?;
            pages += 1;

            next = page.next_url().map(str::to_string);
            let items = page.into_items();
            let page_len = items.len();
            for item in items {
                match Subject::from_json(item, position) {
                    Some(subject) => subjects.push(subject),
                    None => debug!(page = pages, position, "skipping non-object subject"),
                }
                position += 1;
            }

            debug!(
                page = pages,
                page_len,
                total = subjects.len(),
                has_next = next.is_some(),
                "fetched page"
            );
            on_progress(subjects.len());
        }

        Ok(subjects)
    }

    async fn fetch_page(&self, url: &str, token: &str) -> Result<Page> {
        let mut request = self.http_client.get(url).bearer_auth(token);
        if let Some(revision) = &self.revision {
            request = request.header(REVISION_HEADER, revision);
        }

        let response = request.send().await?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let page: Page = serde_json::from_slice(&body)?;
        Ok(page)
    }
}
