//! Durable key-value storage abstraction for page-side state.
//!
//! The Version Gate is written against this trait rather than a concrete
//! store, so an embedding can supply the SQLite-backed [`crate::CacheDb`]
//! in production and [`MemoryStore`] in tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::Error;

/// String-keyed, string-valued durable store scoped to the site origin.
#[async_trait::async_trait]
pub trait MetaStore: Send + Sync {
    /// Read a value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write a value, overwriting any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), Error>;

    /// Every stored `(key, value)` pair.
    async fn entries(&self) -> Result<Vec<(String, String)>, Error>;
}

/// In-memory [`MetaStore`] backed by a `BTreeMap`.
///
/// Entries iterate in key order, which keeps assertions stable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MetaStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, String)>, Error> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
