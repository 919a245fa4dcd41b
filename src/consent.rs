//! Persisted "usage policies accepted" flag.
//!
//! Read once when a session is configured (see
//! [`SessionConfig::with_consent`](crate::SessionConfig::with_consent)).

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;

pub trait ConsentStore: Send + Sync {
    /// Whether the policies were accepted; absent state reads as `false`
    fn load(&self) -> Result<bool>;
    fn store(&self, accepted: bool) -> Result<()>;
}

/// In-memory store for tests and embedders that persist elsewhere
pub struct MemoryConsentStore {
    accepted: Mutex<bool>,
}

impl MemoryConsentStore {
    pub fn new(accepted: bool) -> Self {
        Self { accepted: Mutex::new(accepted) }
    }
}

impl Default for MemoryConsentStore {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ConsentStore for MemoryConsentStore {
    fn load(&self) -> Result<bool> {
        Ok(*self.accepted.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn store(&self, accepted: bool) -> Result<()> {
        *self.accepted.lock().unwrap_or_else(|e| e.into_inner()) = accepted;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ConsentFile {
    policies_accepted: bool,
}

/// JSON file store: `{"policies_accepted": true}`
pub struct FileConsentStore {
    path: PathBuf,
}

impl FileConsentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConsentStore for FileConsentStore {
    fn load(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let text = std::fs::read_to_string(&self.path)?;
        let file: ConsentFile = serde_json::from_str(&text)?;
        Ok(file.policies_accepted)
    }

    fn store(&self, accepted: bool) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&ConsentFile { policies_accepted: accepted })?;
        std::fs::write(&self.path, json)?;
        log::info!("policies_accepted={} saved to {}", accepted, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let s = MemoryConsentStore::default();
        assert!(!s.load().unwrap());
        s.store(true).unwrap();
        assert!(s.load().unwrap());
    }

    #[test]
    fn file_store_defaults_to_not_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let s = FileConsentStore::new(dir.path().join("consent.json"));
        assert!(!s.load().unwrap());
        s.store(true).unwrap();
        assert!(s.load().unwrap());
    }

    #[test]
    fn corrupt_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(FileConsentStore::new(path).load(), Err(crate::Error::ConfigError(_))));
    }
}
