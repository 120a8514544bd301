// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CURRENT_STORE_DIR, GLOBAL_STORE_DIR, STORE_DIR_ENV};
use lazy_static::lazy_static;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref STORE_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathsError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Could not expand '{value}' from {var}: {message}")]
    Expansion {
        var: &'static str,
        value: String,
        message: String,
    },
    #[error("Could not create store directory at '{path}': {source}")]
    StoreDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the directory holding saved parameter values, creating it if needed.
///
/// `PARSOLVE_USER` wins when set (with `~` and variables expanded); otherwise
/// the directory is `parsolve` inside the system config directory.
/// The result is computed once and cached.
pub fn get_store_dir() -> Result<PathBuf, PathsError> {
    let mut cached = STORE_DIR.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let dir = match env::var(STORE_DIR_ENV) {
        Ok(value) if !value.trim().is_empty() => expand_dir(STORE_DIR_ENV, &value)?,
        _ => dirs::config_dir()
            .ok_or(PathsError::ConfigDirNotFound)?
            .join(APP_DIR_NAME),
    };
    ensure_dir(&dir)?;
    log::debug!("Using store directory {}", dir.display());

    *cached = Some(dir.clone());
    Ok(dir)
}

/// Expands `~` and environment variables in a directory given by the user.
pub fn expand_dir(var: &'static str, value: &str) -> Result<PathBuf, PathsError> {
    shellexpand::full(value)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|e| PathsError::Expansion {
            var,
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Creates `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<(), PathsError> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| PathsError::StoreDirCreation {
        path: dir.display().to_string(),
        source,
    })
}

/// The directory of per-task current values below a store directory.
pub fn current_dir(store_dir: &Path) -> PathBuf {
    store_dir.join(CURRENT_STORE_DIR)
}

/// The directory of global values below a store directory.
pub fn global_dir(store_dir: &Path) -> PathBuf {
    store_dir.join(GLOBAL_STORE_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_expand_dir_resolves_variables() {
        let home = env::var("HOME").unwrap_or_default();
        let expanded = expand_dir(STORE_DIR_ENV, "$HOME/params").unwrap();
        assert_eq!(expanded, PathBuf::from(format!("{}/params", home)));
    }

    #[test]
    fn test_expand_dir_reports_unknown_variable() {
        let err = expand_dir(STORE_DIR_ENV, "$PARSOLVE_SURELY_UNSET_VAR/x").unwrap_err();
        assert!(matches!(err, PathsError::Expansion { .. }));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let root = tempdir().unwrap();
        let nested = current_dir(&root.path().join("a"));
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op.
        ensure_dir(&nested).unwrap();
        assert_eq!(global_dir(root.path()), root.path().join("global"));
    }
}
