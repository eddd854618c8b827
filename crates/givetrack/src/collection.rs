//! Whole-collection access over a [`KeyValueStore`].
//!
//! A collection is one JSON array stored under one fixed key. Every mutation
//! is a read-modify-write of the entire array; there is no partial update.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::store::KeyValueStore;

/// A record type persisted as one element of a collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Key the collection is stored under.
    const COLLECTION_KEY: &'static str;

    /// The value this record contributes to the running total.
    fn tally(&self) -> f64;
}

/// What to do when the stored text does not decode as the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Fail with [`Error::MalformedStoredData`]; nothing is written.
    #[default]
    Error,
    /// Log a warning and read the collection as empty.
    Empty,
}

impl std::fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Store accessor for one collection of `R`.
#[derive(Debug)]
pub struct Collection<S, R> {
    store: S,
    on_malformed: MalformedPolicy,
    _record: PhantomData<fn() -> R>,
}

impl<S: KeyValueStore, R: Record> Collection<S, R> {
    /// Access the collection of `R` in `store`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            on_malformed: MalformedPolicy::default(),
            _record: PhantomData,
        }
    }

    /// Set how undecodable stored text is handled.
    #[must_use]
    pub fn with_policy(mut self, on_malformed: MalformedPolicy) -> Self {
        self.on_malformed = on_malformed;
        self
    }

    /// The key this collection is stored under.
    #[must_use]
    pub fn key(&self) -> &'static str {
        R::COLLECTION_KEY
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the full collection in storage order.
    ///
    /// An absent key, or a stored `null`, is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read, or if the stored text is
    /// malformed and the policy is [`MalformedPolicy::Error`].
    pub fn load(&self) -> Result<Vec<R>> {
        let Some(text) = self.store.get_item(R::COLLECTION_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Option<Vec<R>>>(&text) {
            Ok(records) => {
                let records = records.unwrap_or_default();
                debug!(key = R::COLLECTION_KEY, count = records.len(), "Loaded collection");
                Ok(records)
            }
            Err(source) => match self.on_malformed {
                MalformedPolicy::Error => Err(Error::malformed(R::COLLECTION_KEY, source)),
                MalformedPolicy::Empty => {
                    warn!(
                        key = R::COLLECTION_KEY,
                        "Stored collection is malformed ({source}); reading as empty"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Encode and write the full collection.
    ///
    /// Encoding completes before the store is touched, so a failure leaves the
    /// previous collection in place.
    fn save(&mut self, records: &[R]) -> Result<()> {
        let text = serde_json::to_string(records)?;
        self.store.set_item(R::COLLECTION_KEY, &text)?;
        debug!(key = R::COLLECTION_KEY, count = records.len(), "Saved collection");
        Ok(())
    }

    /// Append `record` at the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded or written.
    pub fn append(&mut self, record: R) -> Result<()> {
        self.append_with(|_| record).map(drop)
    }

    /// Build a record from the current collection and append it.
    ///
    /// Returns the appended record.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded or written.
    pub fn append_with(&mut self, build: impl FnOnce(&[R]) -> R) -> Result<R> {
        let mut records = self.load()?;
        let record = build(&records);
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    /// Remove the record at `index`.
    ///
    /// Returns the removed record, or `None` (without writing) when `index`
    /// is out of range.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded or written.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<R>> {
        let mut records = self.load()?;
        if index >= records.len() {
            debug!(key = R::COLLECTION_KEY, index, "Nothing to remove at index");
            return Ok(None);
        }
        let removed = records.remove(index);
        self.save(&records)?;
        Ok(Some(removed))
    }

    /// Remove every record matching `predicate`, keeping the rest in order.
    ///
    /// Returns how many were removed; nothing is written when that is zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded or written.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&R) -> bool) -> Result<usize> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| !predicate(record));
        let removed = before - records.len();
        if removed > 0 {
            self.save(&records)?;
        }
        Ok(removed)
    }

    /// Remove the collection key, leaving no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(R::COLLECTION_KEY)?;
        debug!(key = R::COLLECTION_KEY, "Cleared collection");
        Ok(())
    }

    /// Sum of every record's [`Record::tally`].
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be loaded.
    pub fn total(&self) -> Result<f64> {
        Ok(self
            .load()?
            .iter()
            .fold(0.0, |sum, record| sum + record.tally()))
    }
}
