#![forbid(unsafe_code)]

//! Preferences stored as one plain item per key.
//!
//! Browser storage is a flat string map shared with everything else on the
//! origin, and earlier versions of the page wrote `theme` there directly.
//! [`ItemPreferences`] keeps that layout: each registered preference key is
//! its own item holding the raw value, with no wrapper document. Items the
//! site does not own are never read, written, or cleared.

use folio_runtime::{PreferenceBackend, PreferenceMap, StorageResult};

/// A flat string store such as `window.localStorage`.
pub trait ItemStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Preference backend mapping each registered key onto its own item.
#[derive(Debug)]
pub struct ItemPreferences<S> {
    store: S,
    keys: &'static [&'static str],
}

impl<S: ItemStore> ItemPreferences<S> {
    pub fn new(store: S, keys: &'static [&'static str]) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: ItemStore> PreferenceBackend for ItemPreferences<S> {
    fn name(&self) -> &str {
        "localStorage"
    }

    fn load_all(&self) -> StorageResult<PreferenceMap> {
        let mut values = PreferenceMap::new();
        for &key in self.keys {
            if let Some(value) = self.store.get_item(key)? {
                values.insert(key.to_owned(), value);
            }
        }
        Ok(values)
    }

    fn save_all(&self, values: &PreferenceMap) -> StorageResult<()> {
        for &key in self.keys {
            match values.get(key) {
                Some(value) => self.store.set_item(key, value)?,
                None => self.store.remove_item(key)?,
            }
        }
        for key in values.keys().filter(|k| !self.keys.contains(&k.as_str())) {
            tracing::debug!(key = %key, "unregistered preference not persisted");
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        for &key in self.keys {
            self.store.remove_item(key)?;
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.store.is_available()
    }
}
