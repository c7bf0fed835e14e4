//! Small key-value store for user settings such as the narrator filter.
//!
//! Files are stored under the cache directory using a hash of the service URL
//! as the folder name, so switching backends does not mix selections. The
//! format is a flat TOML table of string values.

use crate::model::NarratorId;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SELECTED_NARRATORS_KEY: &str = "selectedNarrators";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub fn hash_dir(cache_dir: &Path, api_base_url: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(api_base_url.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_dir.join(hash)
}

/// Store backed by `<cache_dir>/<sha256(url)>/settings.toml`.
pub struct TomlFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl TomlFileStore {
    pub fn open(cache_dir: &Path, api_base_url: &str) -> Self {
        Self::at(hash_dir(cache_dir, api_base_url).join("settings.toml"))
    }

    /// Unreadable or malformed files start empty; the next write replaces them.
    pub fn at(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(data) => toml::from_str(&data).unwrap_or_else(|err| {
                warn!(path = %path.display(), "Ignoring malformed settings file: {err}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let contents = {
            let mut values = self.values.lock();
            values.insert(key.to_string(), value.to_string());
            toml::to_string(&*values).context("Failed to serialize settings")?
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), key, "Saved setting");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Selected narrators in selection order. A missing or unparsable value means
/// no filter.
pub fn load_selected_narrators(store: &dyn KeyValueStore) -> Vec<NarratorId> {
    let Some(raw) = store.get(SELECTED_NARRATORS_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!("Discarding stored narrator selection: {err}");
        Vec::new()
    })
}

pub fn save_selected_narrators(store: &dyn KeyValueStore, selected: &[NarratorId]) -> Result<()> {
    let encoded = serde_json::to_string(selected).context("Failed to encode narrator selection")?;
    store.set(SELECTED_NARRATORS_KEY, &encoded)
}
