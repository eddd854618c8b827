//! Key-value persistence for givetrack.
//!
//! Trackers persist through the [`KeyValueStore`] contract only: a
//! synchronous, string-keyed text store. [`SqliteStore`] is the durable
//! implementation used by the CLI; [`MemoryStore`] keeps everything in
//! process.

pub mod migrations;
pub mod schema;
mod sqlite;

use std::collections::HashMap;
use std::path::Path;

use tracing::error;

use crate::error::{Error, Result};

pub use sqlite::{SqliteStore, StoreStats};

/// A durable, synchronous, string-keyed text store.
///
/// An absent key reads as `None`. Each `set_item` replaces the whole value.
pub trait KeyValueStore {
    /// Read the text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// In-process store with no durability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Open the durable store, reporting any failure as storage being unavailable.
///
/// The failure is logged here; callers abort the operation without touching
/// any collection.
///
/// # Errors
///
/// Returns [`Error::StorageUnavailable`] if the store cannot be opened.
pub fn open_durable(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path).map_err(|err| {
        error!("Store at {} is not available: {err}", path.display());
        Error::storage_unavailable(err.to_string())
    })
}
