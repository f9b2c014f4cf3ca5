//! # sentence-harvest
//!
//! Library for harvesting example sentences from a flashcard-learning REST
//! API, grouped by difficulty level, and exporting them as study files.
//!
//! ## Design Philosophy
//!
//! sentence-harvest is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Sensible defaults** - Works out of the box against the public API
//! - **All-or-nothing** - A failed fetch never leaves partial results behind
//! - **Event-driven** - Consumers subscribe to progress events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use sentence_harvest::{Config, ExportMode, SentenceHarvester};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Token is read from WANIKANI_API_TOKEN by default
//!     let harvester = SentenceHarvester::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = harvester.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let results = harvester.fetch_levels("1-3,5").await?;
//!     println!("{} sentences", results.sentence_count());
//!
//!     // Writes level-1-bilingual.txt, level-2-bilingual.txt, ... into ./exports
//!     harvester.export(&results, ExportMode::Bilingual).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Paginated subject fetching
pub mod client;
/// Configuration types
pub mod config;
/// API token storage
pub mod credentials;
/// Paced multi-file delivery
pub mod delivery;
/// Error types
pub mod error;
/// Export serialization
pub mod export;
/// Example-sentence extraction
pub mod extraction;
/// Harvester orchestration (decomposed into focused submodules)
mod harvester;
/// Level specification parsing
pub mod levels;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use client::SubjectClient;
pub use config::{Config, ExportLayout, FileCollisionAction};
pub use credentials::CredentialStore;
pub use delivery::{DeliveryOutcome, DeliveryReport, DirectorySink, FileSink, MemorySink};
pub use error::{Error, ErrorKind, Result};
pub use export::{ExportFile, ExportMode};
pub use extraction::SentenceExtractor;
pub use harvester::SentenceHarvester;
pub use levels::{LevelSpec, parse_levels};
pub use types::{Event, LevelResults, SentenceRecord, Subject, SubjectGroup};
