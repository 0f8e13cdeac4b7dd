//! Key-value persistence collaborators for the ledger store.

pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Byte-oriented key-value storage. The ledger store serializes its whole
/// snapshot under a single key.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored bytes, or `None` when the key has never been written.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).save(key, bytes)
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).save(key, bytes)
    }
}

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;
