// src/core/store.rs

//! # Value Stores
//!
//! Current values (per task) and global values (per namespace) are kept in
//! key/value stores. A namespace maps names to the text form of values.

use crate::constants::STORE_FILE_EXTENSION;
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt, fs, io,
    path::{Path, PathBuf},
    rc::Rc,
};
use thiserror::Error;

/// Name to text mapping held under one namespace.
pub type ValueMap = BTreeMap<String, String>;

/// Represents the errors that can occur while reading or writing a store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The value file could not be read or written.
    #[error("failed to access value file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The value file does not hold a table of strings.
    #[error("failed to parse value file '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The values could not be encoded.
    #[error("failed to encode values for namespace '{namespace}': {source}")]
    TomlSerialize {
        namespace: String,
        #[source]
        source: toml::ser::Error,
    },
}

/// A synchronous key/value store of namespaces.
pub trait ValueStore: fmt::Debug {
    /// Reads a namespace; `None` when it was never written.
    fn read(&self, namespace: &str) -> Result<Option<ValueMap>, StoreError>;

    /// Replaces the contents of a namespace.
    fn write(&mut self, namespace: &str, values: &ValueMap) -> Result<(), StoreError>;
}

/// An in-memory store. Clones share their contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    namespaces: Rc<RefCell<BTreeMap<String, ValueMap>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single entry, creating the namespace if needed.
    pub fn insert(&self, namespace: &str, key: &str, value: &str) {
        self.namespaces
            .borrow_mut()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }
}

impl ValueStore for MemoryStore {
    fn read(&self, namespace: &str) -> Result<Option<ValueMap>, StoreError> {
        Ok(self.namespaces.borrow().get(namespace).cloned())
    }

    fn write(&mut self, namespace: &str, values: &ValueMap) -> Result<(), StoreError> {
        self.namespaces
            .borrow_mut()
            .insert(namespace.to_string(), values.clone());
        Ok(())
    }
}

/// A store keeping one TOML file per namespace, `<dir>/<namespace>.par`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `namespace`.
    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", namespace, STORE_FILE_EXTENSION))
    }
}

impl ValueStore for FileStore {
    fn read(&self, namespace: &str) -> Result<Option<ValueMap>, StoreError> {
        let path = self.path_for(namespace);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let values = toml::from_str::<ValueMap>(&content)
            .map_err(|source| StoreError::TomlParse { path, source })?;
        Ok(Some(values))
    }

    fn write(&mut self, namespace: &str, values: &ValueMap) -> Result<(), StoreError> {
        let path = self.path_for(namespace);
        let content = toml::to_string(values).map_err(|source| StoreError::TomlSerialize {
            namespace: namespace.to_string(),
            source,
        })?;
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(&path, content))
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        log::debug!("Wrote {} values to {}", values.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> ValueMap {
        let mut values = ValueMap::new();
        values.insert("IN".to_string(), "image.sdf".to_string());
        values.insert("SCALE".to_string(), "[1,2][3,4]".to_string());
        values.insert("odd key".to_string(), "\"quoted\" = text".to_string());
        values
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("current"));
        store.write("task", &sample()).unwrap();

        assert!(store.path_for("task").exists());
        assert_eq!(store.read("task").unwrap(), Some(sample()));
    }

    #[test]
    fn test_absent_namespace_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.read("NEVER").unwrap(), None);
        assert_eq!(MemoryStore::new().read("NEVER").unwrap(), None);
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path_for("BROKEN"), "this is = = not toml").unwrap();
        let err = store.read("BROKEN").unwrap_err();
        assert!(matches!(err, StoreError::TomlParse { .. }));
    }

    #[test]
    fn test_memory_store_clones_share_contents() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.write("GLOBAL", &sample()).unwrap();
        store.insert("GLOBAL", "EXTRA", "1");

        let values = store.read("GLOBAL").unwrap().unwrap();
        assert_eq!(values.get("IN").map(String::as_str), Some("image.sdf"));
        assert_eq!(values.get("EXTRA").map(String::as_str), Some("1"));
    }
}
