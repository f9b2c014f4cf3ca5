//! API token storage
//!
//! The token is an opaque bearer credential. Stores never validate it; a
//! blank or whitespace-only token reads as missing.

use crate::config::{CredentialConfig, CredentialSource};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Source of the API token
pub trait CredentialStore: Send + Sync {
    /// Current token, if any
    fn get(&self) -> Result<Option<String>>;

    /// Replace the token
    fn set(&self, token: &str) -> Result<()>;

    /// Forget the token
    fn clear(&self) -> Result<()>;
}

fn non_blank(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Token held in process memory
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Store seeded with `token`
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| Error::Credential("token lock poisoned".into()))?;
        Ok(non_blank(guard.clone()))
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::Credential("token lock poisoned".into()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::Credential("token lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

/// Token read from an environment variable
///
/// Read-only: the process environment is not a place to persist secrets.
#[derive(Clone, Debug)]
pub struct EnvCredentialStore {
    var: String,
}

impl EnvCredentialStore {
    /// Store reading `var`
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the environment variable
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        match std::env::var(&self.var) {
            Ok(value) => Ok(non_blank(Some(value))),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(Error::Credential(format!(
                "{} is not valid unicode",
                self.var
            ))),
        }
    }

    fn set(&self, _token: &str) -> Result<()> {
        Err(Error::Credential(format!(
            "environment credential store is read-only; set {} instead",
            self.var
        )))
    }

    fn clear(&self) -> Result<()> {
        Err(Error::Credential(format!(
            "environment credential store is read-only; unset {} instead",
            self.var
        )))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    api_token: Option<String>,
}

/// Token persisted in a JSON file: `{ "api_token": "..." }`
///
/// A missing file reads as no token.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &TokenFile) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error("create", e))?;
        }
        let json = serde_json::to_string_pretty(contents)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error("write", e))
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> Error {
        Error::Credential(format!("cannot {} {}: {}", action, self.path.display(), e))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error("read", e)),
        };
        let file: TokenFile = serde_json::from_str(&content).map_err(|e| {
            Error::Credential(format!("{} is not a valid token file: {}", self.path.display(), e))
        })?;
        Ok(non_blank(file.api_token))
    }

    fn set(&self, token: &str) -> Result<()> {
        self.write(&TokenFile {
            api_token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", e)),
        }
    }
}

/// Build the store described by `config`
pub fn from_config(config: &CredentialConfig) -> Arc<dyn CredentialStore> {
    match config.source {
        CredentialSource::Env => Arc::new(EnvCredentialStore::new(config.env_var.clone())),
        CredentialSource::File => Arc::new(FileCredentialStore::new(config.file_path.clone())),
        CredentialSource::Memory => Arc::new(MemoryCredentialStore::new(config.token.clone())),
    }
}
