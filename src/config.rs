//! Configuration types for sentence-harvest

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Upstream API settings (endpoint, revision header, request limits)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the subject API (default: "https://api.wanikani.com/v2")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the API revision header (None = header omitted)
    #[serde(default = "default_revision")]
    pub revision: Option<String>,

    /// Subject types requested per level (default: ["vocabulary"])
    #[serde(default = "default_subject_types")]
    pub subject_types: Vec<String>,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_ms_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on pages followed for one level (default: 1000)
    ///
    /// Stops a misbehaving server whose cursors never terminate.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            revision: default_revision(),
            subject_types: default_subject_types(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            max_pages: default_max_pages(),
        }
    }
}

/// Export settings (layout, destination, delivery pacing)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// Directory used by the default directory sink (default: "exports")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// One text file per level, or one combined file
    #[serde(default)]
    pub layout: ExportLayout,

    /// Pause between successive file deliveries in one export (default: 300 ms)
    #[serde(default = "default_file_delay", with = "duration_ms_serde")]
    pub file_delay: Duration,

    /// What the directory sink does when a file already exists
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            layout: ExportLayout::default(),
            file_delay: default_file_delay(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// Where the API token comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// Read from an environment variable (default)
    #[default]
    Env,
    /// Read from and persist to a JSON file
    File,
    /// Keep in memory only, seeded from [`CredentialConfig::token`]
    Memory,
}

/// Credential source settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CredentialConfig {
    /// Which store backs the token
    #[serde(default)]
    pub source: CredentialSource,

    /// Environment variable holding the token (default: "WANIKANI_API_TOKEN")
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Token file for the file store (default: "credentials.json")
    #[serde(default = "default_credentials_path")]
    pub file_path: PathBuf,

    /// Initial token for the memory store
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            source: CredentialSource::default(),
            env_var: default_env_var(),
            file_path: default_credentials_path(),
            token: None,
        }
    }
}

/// Main configuration for [`SentenceHarvester`](crate::SentenceHarvester)
///
/// Fields are organized into logical sub-configs:
/// - [`api`](ApiConfig) - upstream endpoint and request limits
/// - [`export`](ExportConfig) - export layout and delivery pacing
/// - [`credentials`](CredentialConfig) - token source
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Credential settings
    #[serde(default)]
    pub credentials: CredentialConfig,
}

impl Config {
    /// Check settings that would otherwise fail later in the pipeline
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            Error::config("api.base_url", format!("'{}' is not a valid URL: {}", self.api.base_url, e))
        })?;

        if self.api.subject_types.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::config(
                "api.subject_types",
                "at least one subject type is required",
            ));
        }

        if self.api.timeout.is_zero() {
            return Err(Error::config("api.timeout", "timeout must be greater than zero"));
        }

        if self.api.max_pages == 0 {
            return Err(Error::config("api.max_pages", "max_pages must be at least 1"));
        }

        if self.credentials.source == CredentialSource::Env
            && self.credentials.env_var.trim().is_empty()
        {
            return Err(Error::config(
                "credentials.env_var",
                "environment variable name must not be empty",
            ));
        }

        Ok(())
    }

    /// Load configuration from a JSON file, filling missing fields with defaults
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

/// Text export layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportLayout {
    /// One text file per level (default)
    #[default]
    PerLevel,
    /// All levels in one text file
    Combined,
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Replace the existing file (default, keeps repeated exports idempotent)
    #[default]
    Overwrite,
    /// Append (1), (2), etc. to filename
    Rename,
    /// Skip the file, keep existing
    Skip,
}

fn default_base_url() -> String {
    "https://api.wanikani.com/v2".to_string()
}

fn default_revision() -> Option<String> {
    Some("20170710".to_string())
}

fn default_subject_types() -> Vec<String> {
    vec!["vocabulary".to_string()]
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("sentence-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_pages() -> usize {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_file_delay() -> Duration {
    Duration::from_millis(300)
}

fn default_env_var() -> String {
    "WANIKANI_API_TOKEN".to_string()
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
