use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::errors::{LedgerError, Result};

use super::KeyValueStorage;

/// In-process storage, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| LedgerError::Storage("memory storage lock poisoned".into()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.lock()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrites_previous_value() {
        let storage = MemoryStorage::new();
        storage.save("k", b"one").unwrap();
        storage.save("k", b"two").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(storage.len().unwrap(), 1);
        assert!(storage.load("missing").unwrap().is_none());
    }

    #[test]
    fn poisoned_lock_surfaces_as_storage_error() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        assert!(storage.is_empty().unwrap());
        let poisoner = std::sync::Arc::clone(&storage);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(storage.len(), Err(LedgerError::Storage(_))));
        assert!(matches!(storage.is_empty(), Err(LedgerError::Storage(_))));
        assert!(storage.save("k", b"v").is_err());
    }
}
