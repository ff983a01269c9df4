//! User preference persistence across sessions.
//!
//! A [`Preferences`] registry caches string key/value pairs in memory and
//! delegates durable storage to a [`PreferenceBackend`]. The site keeps exactly
//! one preference (the theme) but the registry is key-agnostic.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Preferences                           │
//! │   - in-memory cache, authoritative for the session           │
//! │   - dirty flag; flush() writes only when changed             │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    PreferenceBackend                         │
//! │   - MemoryPreferences: in-memory (tests, private browsing)   │
//! │   - FilePreferences: JSON file (file-preferences feature)    │
//! │   - localStorage: provided by folio-web on wasm32            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Cache wins.** `set` always updates the cache, even when the backend is
//!    unavailable; later `get`s observe it for the rest of the session.
//! 2. **Graceful degradation.** Backend failures surface as `StorageError`
//!    and never panic. Callers decide whether to swallow them.
//! 3. **Atomic writes.** File storage uses write-then-rename.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, cache unaffected |
//! | `StorageError::Serialization` | JSON encode/decode | Load or save fails |
//! | `StorageError::Corruption` | Unknown format version | Stored values ignored |
//! | `StorageError::Unavailable` | Storage disabled by the platform | Returns error, cache unaffected |

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during preference storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    #[cfg(feature = "file-preferences")]
    Serialization(String),
    /// Stored data has an unexpected shape.
    Corruption(String),
    /// The platform refuses storage (quota, privacy mode, no `localStorage`).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "file-preferences")]
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Stored preference values by key.
pub type PreferenceMap = BTreeMap<String, String>;

// ─────────────────────────────────────────────────────────────────────────────
// Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable durable storage for preferences.
///
/// Backends run on the single UI thread, so they take `&self` and use interior
/// mutability where needed; no `Send`/`Sync` bound is imposed because browser
/// storage handles are not thread-safe.
pub trait PreferenceBackend {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load every stored preference. An empty map means "first visit".
    fn load_all(&self) -> StorageResult<PreferenceMap>;

    /// Replace all stored preferences.
    fn save_all(&self, values: &PreferenceMap) -> StorageResult<()>;

    /// Remove all stored preferences.
    fn clear(&self) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Backend
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory backend.
///
/// Values survive as long as the backend does, which lets tests model
/// "reload" by building a second registry over the same backend. An
/// [`unavailable`](Self::unavailable) instance fails every operation, the way
/// storage behaves when the browser blocks it.
pub struct MemoryPreferences {
    data: RefCell<PreferenceMap>,
    available: bool,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: RefCell::default(),
            available: true,
        }
    }

    /// Backend pre-populated with values.
    #[must_use]
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RefCell::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            available: true,
        }
    }

    /// Backend that refuses every operation.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            data: RefCell::default(),
            available: false,
        }
    }

    fn check(&self) -> StorageResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable("storage disabled".into()))
        }
    }

    /// Snapshot of the stored values.
    pub fn snapshot(&self) -> PreferenceMap {
        self.data.borrow().clone()
    }
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceBackend for MemoryPreferences {
    fn name(&self) -> &str {
        "MemoryPreferences"
    }

    fn load_all(&self) -> StorageResult<PreferenceMap> {
        self.check()?;
        Ok(self.data.borrow().clone())
    }

    fn save_all(&self, values: &PreferenceMap) -> StorageResult<()> {
        self.check()?;
        *self.data.borrow_mut() = values.clone();
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.check()?;
        self.data.borrow_mut().clear();
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

impl fmt::Debug for MemoryPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPreferences")
            .field("entries", &self.data.borrow().len())
            .field("available", &self.available)
            .finish()
    }
}

/// Shared handles are backends too, so tests can keep a handle to inspect.
impl<B: PreferenceBackend + ?Sized> PreferenceBackend for Rc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load_all(&self) -> StorageResult<PreferenceMap> {
        (**self).load_all()
    }

    fn save_all(&self, values: &PreferenceMap) -> StorageResult<()> {
        (**self).save_all(values)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Backend (requires file-preferences feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "file-preferences")]
mod file_backend {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk document.
    #[derive(Serialize, Deserialize)]
    struct PreferenceFile {
        format_version: u32,
        entries: PreferenceMap,
    }

    impl PreferenceFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// JSON file backend.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": { "theme": "light" }
    /// }
    /// ```
    ///
    /// Writes go to `{path}.tmp`, are synced, then renamed over `{path}`.
    pub struct FilePreferences {
        path: PathBuf,
    }

    impl FilePreferences {
        /// The file need not exist; it is created on first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// `$XDG_STATE_HOME/folio/{app}/preferences.json`, falling back to
        /// `~/.local/state` and finally the working directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = std::env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    std::env::var("HOME")
                        .map(|home| PathBuf::from(home).join(".local").join("state"))
                })
                .unwrap_or_else(|_| PathBuf::from("."));
            Self::new(base.join("folio").join(app_name).join("preferences.json"))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }
    }

    impl PreferenceBackend for FilePreferences {
        fn name(&self) -> &str {
            "FilePreferences"
        }

        fn load_all(&self) -> StorageResult<PreferenceMap> {
            if !self.path.exists() {
                return Ok(PreferenceMap::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let file: PreferenceFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse preferences: {e}"))
            })?;
            if file.format_version != PreferenceFile::FORMAT_VERSION {
                return Err(StorageError::Corruption(format!(
                    "format version {} (expected {})",
                    file.format_version,
                    PreferenceFile::FORMAT_VERSION
                )));
            }
            Ok(file.entries)
        }

        fn save_all(&self, values: &PreferenceMap) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = PreferenceFile {
                format_version: PreferenceFile::FORMAT_VERSION,
                entries: values.clone(),
            };
            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, &file).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize preferences: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;
            tracing::debug!(
                path = %self.path.display(),
                entries = values.len(),
                "saved preferences"
            );
            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            match self.path.parent() {
                Some(parent) if parent.as_os_str().is_empty() => true,
                Some(parent) => parent.exists() || fs::create_dir_all(parent).is_ok(),
                None => false,
            }
        }
    }

    impl fmt::Debug for FilePreferences {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FilePreferences")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "file-preferences")]
pub use file_backend::FilePreferences;

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Session cache over a [`PreferenceBackend`].
///
/// ```ignore
/// use folio_runtime::preferences::{MemoryPreferences, Preferences};
///
/// let prefs = Preferences::new(Box::new(MemoryPreferences::new()));
/// prefs.load()?;
/// prefs.set("theme", "light");
/// prefs.flush()?;
/// ```
pub struct Preferences {
    backend: Box<dyn PreferenceBackend>,
    cache: RefCell<PreferenceMap>,
    dirty: Cell<bool>,
    stats: Cell<PreferenceStats>,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceStats {
    pub loads: u32,
    pub flushes: u32,
    pub failures: u32,
}

impl Preferences {
    /// Does not read the backend; call [`load`](Self::load).
    #[must_use]
    pub fn new(backend: Box<dyn PreferenceBackend>) -> Self {
        Self {
            backend,
            cache: RefCell::default(),
            dirty: Cell::new(false),
            stats: Cell::default(),
        }
    }

    /// Registry over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryPreferences::new()))
    }

    /// Registry over a JSON file.
    #[cfg(feature = "file-preferences")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FilePreferences::new(path)))
    }

    /// Replace the cache with the backend's contents.
    pub fn load(&self) -> StorageResult<usize> {
        let values = self.backend.load_all().inspect_err(|_| self.count_failure())?;
        let count = values.len();
        *self.cache.borrow_mut() = values;
        self.dirty.set(false);
        self.bump(|s| s.loads += 1);
        tracing::debug!(backend = %self.backend.name(), count, "loaded preferences");
        Ok(count)
    }

    /// Write the cache if it changed. Returns whether anything was written.
    ///
    /// On failure the cache stays dirty so a later flush can retry.
    pub fn flush(&self) -> StorageResult<bool> {
        if !self.dirty.get() {
            return Ok(false);
        }
        self.backend
            .save_all(&self.cache.borrow())
            .inspect_err(|_| self.count_failure())?;
        self.dirty.set(false);
        self.bump(|s| s.flushes += 1);
        Ok(true)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.cache.borrow().get(key).cloned()
    }

    /// Update the cache and mark it dirty. Setting an identical value is a
    /// no-op.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let mut cache = self.cache.borrow_mut();
        if cache.get(&key) != Some(&value) {
            cache.insert(key, value);
            self.dirty.set(true);
        }
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let removed = self.cache.borrow_mut().remove(key);
        if removed.is_some() {
            self.dirty.set(true);
        }
        removed
    }

    /// Empty both the cache and the backend.
    pub fn clear(&self) -> StorageResult<()> {
        self.cache.borrow_mut().clear();
        self.dirty.set(false);
        self.backend.clear()
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    pub fn keys(&self) -> Vec<String> {
        self.cache.borrow().keys().cloned().collect()
    }

    pub fn stats(&self) -> PreferenceStats {
        self.stats.get()
    }

    /// Wrap in an `Rc` for sharing between the model and the runtime.
    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    fn bump(&self, f: impl FnOnce(&mut PreferenceStats)) {
        let mut s = self.stats.get();
        f(&mut s);
        self.stats.set(s);
    }

    fn count_failure(&self) {
        self.bump(|s| s.failures += 1);
    }
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("backend", &self.backend.name())
            .field("entries", &self.len())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
