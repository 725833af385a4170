//! A small persistent string key-value store, the on-disk counterpart of browser local storage.

use crate::{utils, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::trace;

/// String values persisted as a JSON object in a single file. Every change is written through to
/// disk immediately. A store without a path lives in memory only.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct LocalStore {
    path: Option<PathBuf>,
    private: bool,
    values: BTreeMap<String, String>,
}

impl LocalStore {
    /// Opens the store at `path`. A missing file is an empty store. When `private` is true the file
    /// is written with owner-only permissions.
    pub async fn open(path: impl Into<PathBuf>, private: bool) -> Result<Self> {
        let path = path.into();
        let values: BTreeMap<String, String> = match utils::read_if_exists(&path).await? {
            Some(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON file at {}", path.display()))?,
            None => BTreeMap::new(),
        };
        trace!("Opened store {} with {} values", path.display(), values.len());
        Ok(Self {
            path: Some(path),
            private,
            values,
        })
    }

    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub async fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.save().await
    }

    /// Sets several values with a single write.
    pub async fn set_all<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Result<()> {
        for (key, value) in entries {
            self.values.insert(key.to_string(), value);
        }
        self.save().await
    }

    /// Removes `keys` with a single write.
    pub async fn remove(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.values.remove(*key);
        }
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => utils::save_json(path, &self.values, self.private).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let mut store = LocalStore::open(&path, false).await.unwrap();
        assert_eq!(store.get("a"), None);
        store.set("a", "1").await.unwrap();
        store
            .set_all([("b", "2".to_string()), ("c", "3".to_string())])
            .await
            .unwrap();
        store.remove(&["c"]).await.unwrap();

        let reopened = LocalStore::open(&path, false).await.unwrap();
        assert_eq!(reopened.get("a"), Some("1"));
        assert_eq!(reopened.get("b"), Some("2"));
        assert_eq!(reopened.get("c"), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_private_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.json");
        let mut store = LocalStore::open(&path, true).await.unwrap();
        store.set("token", "abc").await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(LocalStore::open(&path, false).await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory() {
        let mut store = LocalStore::in_memory();
        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k"), Some("v"));
        assert!(store.path().is_none());
    }
}
