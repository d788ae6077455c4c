// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage configuration and where it is kept.
//!
//! [`StorageConfig`] holds the converter cache sizes and the optional link
//! budget. [`ConfigService`] reads and writes it as JSON through a
//! [`ConfigStore`] port; [`FsConfigStore`] is the filesystem adapter.
//! [`XmlStorage::from_config`](crate::XmlStorage::from_config) opens a store
//! sized by whatever the service finds.

use std::fs;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Key the storage settings are kept under.
pub const STORAGE_CONFIG_KEY: &str = "storage";

/// Tunables for [`XmlStorage`](crate::XmlStorage).
///
/// Every field has a default, so a partial (or empty) JSON object is a valid
/// config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Entries kept in the text → sequence cache.
    pub text_cache_capacity: NonZeroUsize,
    /// Entries kept in the sequence → text cache.
    pub sequence_cache_capacity: NonZeroUsize,
    /// Hard link budget for stores opened through
    /// [`XmlStorage::in_memory`](crate::XmlStorage::in_memory); `None` means
    /// unbounded.
    pub max_links: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            text_cache_capacity: DEFAULT_CACHE_CAPACITY,
            sequence_cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_links: None,
        }
    }
}

/// Failures while reading or writing storage settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backing medium could not be read or written.
    #[error("[CONFIG_IO] {0}")]
    Io(#[from] std::io::Error),
    /// The stored settings are not a valid [`StorageConfig`].
    #[error("[CONFIG_PARSE] {0}")]
    Parse(#[from] serde_json::Error),
    /// No per-user configuration directory exists on this platform.
    #[error("[CONFIG_NO_HOME] no configuration directory for this user")]
    NoConfigDir,
}

/// Raw byte storage for settings, keyed by name.
pub trait ConfigStore {
    /// The bytes stored under `key`, or `None` if nothing is.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
    /// Replace whatever is stored under `key`.
    fn write(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Loads and saves [`StorageConfig`] through a [`ConfigStore`].
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
}

impl<S: ConfigStore> ConfigService<S> {
    /// Serve settings from `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Settings stored under `key`; defaults if the key is missing or empty.
    pub fn load(&self, key: &str) -> Result<StorageConfig, ConfigError> {
        match self.store.read(key)? {
            Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(&bytes)?),
            _ => {
                debug!(key, "no stored settings, using defaults");
                Ok(StorageConfig::default())
            }
        }
    }

    /// Store `config` under `key` as pretty-printed JSON.
    pub fn save(&self, key: &str, config: &StorageConfig) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(config)?;
        self.store.write(key, &data)
    }
}

/// Keeps each key as `<base>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Keep files under `base`, creating it on first write.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Keep files in the platform's per-user config directory.
    pub fn user_default() -> Result<Self, ConfigError> {
        ProjectDirs::from("dev", "flyingrobots", "doublet-xml")
            .map(|dirs| Self::new(dirs.config_dir()))
            .ok_or(ConfigError::NoConfigDir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.base)?;
        fs::write(self.path_for(key), data)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: StorageConfig = serde_json::from_str(r#"{ "max_links": 64 }"#).unwrap();
        assert_eq!(config.max_links, Some(64));
        assert_eq!(config.text_cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::new(dir.path());
        store
            .write(STORAGE_CONFIG_KEY, br#"{ "text_cache_capacity": 0 }"#)
            .unwrap();
        let err = ConfigService::new(store).load(STORAGE_CONFIG_KEY).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("[CONFIG_PARSE]"));
    }

    #[test]
    fn missing_and_empty_files_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::new(dir.path());
        assert_eq!(store.read(STORAGE_CONFIG_KEY).unwrap(), None);
        let service = ConfigService::new(store.clone());
        assert_eq!(service.load(STORAGE_CONFIG_KEY).unwrap(), StorageConfig::default());
        store.write(STORAGE_CONFIG_KEY, b"").unwrap();
        assert_eq!(service.load(STORAGE_CONFIG_KEY).unwrap(), StorageConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(FsConfigStore::new(dir.path().join("nested")));
        let config = StorageConfig {
            text_cache_capacity: NonZeroUsize::new(3).unwrap(),
            sequence_cache_capacity: NonZeroUsize::new(5).unwrap(),
            max_links: Some(10_000),
        };
        service.save(STORAGE_CONFIG_KEY, &config).unwrap();
        assert_eq!(service.load(STORAGE_CONFIG_KEY).unwrap(), config);
    }
}
