use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::{LedgerError, Result},
};

use super::KeyValueStorage;

const FILE_EXTENSION: &str = "json";

/// Filesystem-backed storage: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    root: PathBuf,
}

impl JsonFileStorage {
    pub fn new(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    /// Storage rooted at the data directory below the application base.
    pub fn new_default() -> Result<Self> {
        Self::new(PathResolver::data_dir_in(&PathResolver::base_dir()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        let name = canonical_key(key)?;
        Ok(self.root.join(format!("{}.{}", name, FILE_EXTENSION)))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.key_path(key)?;
        write_atomic(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote storage key");
        Ok(())
    }
}

fn canonical_key(key: &str) -> Result<String> {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        return Err(LedgerError::InvalidInput(format!(
            "storage key `{}` is empty after sanitizing",
            key
        )));
    }
    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::tmp_path;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonFileStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonFileStorage::new(temp.path().join("data")).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn missing_key_loads_as_none() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.load("transactions-storage").expect("load").is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        storage
            .save("transactions-storage", br#"{"hello":1}"#)
            .expect("save");
        let loaded = storage.load("transactions-storage").expect("load");
        assert_eq!(loaded.as_deref(), Some(&br#"{"hello":1}"#[..]));
        let path = storage.key_path("transactions-storage").expect("path");
        assert!(path.exists());
        assert!(!tmp_path(&path).exists(), "temp file must be renamed away");
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.key_path("../escape me").expect("path");
        assert_eq!(path.parent(), Some(storage.root()));
        assert!(storage.key_path("///").is_err());
    }
}
