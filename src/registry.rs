//! Sensor-name registry
//!
//! External configuration mapping a canonical sensor key
//! (`<protocol>:<device_id>:<channel>`) to a human-readable display
//! name. Loaded once per session from a JSON object of key/name pairs
//! and never mutated afterwards, so it can be shared by reference
//! across all decode calls without locking.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, Rxb6Error};

/// Read-only mapping from canonical sensor key to display name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    names: HashMap<String, String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON file
    ///
    /// The file holds a single object: `{"r8s:1161:1": "Living room"}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| Rxb6Error::RegistryIo {
            path: path.display().to_string(),
            source,
        })?;
        let names = serde_json::from_str(&data).map_err(|source| Rxb6Error::RegistryParse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { names })
    }

    /// Build a registry from an in-memory map
    pub fn from_map(names: HashMap<String, String>) -> Self {
        Self { names }
    }

    /// Add an entry (used when building a registry programmatically)
    pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.names.insert(key.into(), name.into());
    }

    /// Look up the display name for a canonical key
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Check if a canonical key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.names.contains_key(key)
    }

    /// Number of registered sensors
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
