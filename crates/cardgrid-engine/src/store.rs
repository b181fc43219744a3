#![forbid(unsafe_code)]

//! Layout persistence.
//!
//! The committed layout is a single JSON snapshot keyed by card id,
//! written full-overwrite after every committed drag, resize, or height
//! reset (last write wins, no merge). Storage is a pluggable key-value
//! backend: [`MemoryStore`] for tests and ephemeral sessions, and
//! [`FileStore`] with an atomic write-rename pattern for hosts backed by
//! a directory. A browser adapter would implement [`StorageBackend`]
//! over its local storage.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing snapshot | First run, reset | `load` returns empty config |
//! | Unparseable snapshot | Corruption, old format | `load` warns, returns empty |
//! | Version mismatch | Incompatible schema | `load` warns, returns empty |
//! | Write failure | Quota, permissions | Error returned; gesture unaffected |

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use cardgrid_core::{CardRegistry, SizeClass};

/// Storage key for the layout snapshot.
pub const LAYOUT_STORAGE_KEY: &str = "grid_layout_config";
/// Storage key for the horizontal drag bias, persisted separately.
pub const DRAG_OFFSET_STORAGE_KEY: &str = "grid_drag_offset_x";

/// Current snapshot schema version.
///
/// Additive fields do not bump this; breaking changes must.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from storage operations.
#[derive(Debug)]
pub enum StoreError {
    /// I/O failure in a file-backed store.
    Io(std::io::Error),
    /// Snapshot could not be encoded.
    Serialization(String),
    /// Backend cannot be used (e.g. poisoned lock).
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(_) | StoreError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Span descriptors
// ---------------------------------------------------------------------------

/// A formatted one-axis placement, e.g. `"3 / span 2"`.
///
/// Serialized in the text form so the snapshot mirrors the grid style
/// values the host applies; `Display`/`FromStr` round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanDescriptor {
    /// 1-based start line.
    pub start: u16,
    /// Span length in tracks or rows.
    pub span: u16,
}

impl SpanDescriptor {
    /// Create a descriptor.
    #[must_use]
    pub const fn new(start: u16, span: u16) -> Self {
        Self { start, span }
    }
}

impl fmt::Display for SpanDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / span {}", self.start, self.span)
    }
}

/// Failure to parse a span descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpanError {
    text: String,
}

impl fmt::Display for ParseSpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed span descriptor {:?}", self.text)
    }
}

impl std::error::Error for ParseSpanError {}

impl FromStr for SpanDescriptor {
    type Err = ParseSpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSpanError { text: s.to_string() };
        let (start, rest) = s.split_once('/').ok_or_else(err)?;
        let start: u16 = start.trim().parse().map_err(|_| err())?;
        let span: u16 = rest
            .trim()
            .strip_prefix("span")
            .ok_or_else(err)?
            .trim()
            .parse()
            .map_err(|_| err())?;
        if start == 0 || span == 0 {
            return Err(err());
        }
        Ok(Self { start, span })
    }
}

impl Serialize for SpanDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpanDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Snapshot model
// ---------------------------------------------------------------------------

/// Persisted state of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLayoutEntry {
    /// Size class label.
    pub size: SizeClass,
    /// Column placement descriptor.
    pub col: SpanDescriptor,
    /// Row placement descriptor.
    pub row: SpanDescriptor,
    /// Custom content height, absent when never resized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
}

/// The persisted snapshot: card id -> layout entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Snapshot schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    /// Per-card entries, sorted by id for deterministic serialization.
    #[serde(default)]
    pub cards: BTreeMap<String, CardLayoutEntry>,
}

fn default_schema_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

impl LayoutConfig {
    /// An empty snapshot at the current schema version.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            cards: BTreeMap::new(),
        }
    }

    /// True iff no cards are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Capture the current state of every id-carrying card.
    #[must_use]
    pub fn snapshot(registry: &CardRegistry) -> Self {
        let mut cards = BTreeMap::new();
        for (_, card) in registry.iter() {
            let Some(id) = card.id.as_ref() else {
                continue;
            };
            cards.insert(
                id.as_str().to_string(),
                CardLayoutEntry {
                    size: card.size,
                    col: SpanDescriptor::new(card.rect.col, card.rect.col_span),
                    row: SpanDescriptor::new(card.rect.row, card.rect.row_span),
                    height: card.content_height,
                },
            );
        }
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            cards,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Pluggable key-value storage with string payloads.
///
/// Implementations must be `Send + Sync`; all writes are full-overwrite.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read the value at a key, `None` when absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the value at a key.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the value at a key; absent keys are not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStore").field("keys", &count).finish()
    }
}

/// Directory-backed store: one file per key, atomic write-rename.
///
/// Writes go to `{key}.json.tmp`, are flushed and synced, then renamed
/// over `{key}.json` so a crash never leaves a torn snapshot.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at a directory.
    ///
    /// The directory does not need to exist; it is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Layout store
// ---------------------------------------------------------------------------

/// Serializes committed layout state to a storage backend.
pub struct LayoutStore {
    backend: Box<dyn StorageBackend>,
}

impl LayoutStore {
    /// Create a store over a backend.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Store over an in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Backend name for logging.
    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Persist the full snapshot of the registry, overwriting any
    /// previous snapshot.
    pub fn save(&self, registry: &CardRegistry) -> StoreResult<()> {
        let config = LayoutConfig::snapshot(registry);
        let json = serde_json::to_string(&config)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.set(LAYOUT_STORAGE_KEY, &json)?;
        tracing::debug!(
            backend = %self.backend.name(),
            cards = config.cards.len(),
            "layout saved"
        );
        Ok(())
    }

    /// Read the stored snapshot.
    ///
    /// Absent, unparseable, or version-mismatched snapshots are "no prior
    /// layout", never an error.
    #[must_use]
    pub fn load(&self) -> LayoutConfig {
        let text = match self.backend.get(LAYOUT_STORAGE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return LayoutConfig::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "layout read failed, using defaults");
                return LayoutConfig::empty();
            }
        };
        let config: LayoutConfig = match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "layout snapshot unparseable, using defaults");
                return LayoutConfig::empty();
            }
        };
        if config.schema_version != LAYOUT_SCHEMA_VERSION {
            tracing::warn!(
                stored = config.schema_version,
                expected = LAYOUT_SCHEMA_VERSION,
                "layout schema version mismatch, using defaults"
            );
            return LayoutConfig::empty();
        }
        config
    }

    /// Delete the stored snapshot. The host must reinitialize afterwards
    /// so cards regenerate their markup-order defaults.
    pub fn reset(&self) -> StoreResult<()> {
        self.backend.remove(LAYOUT_STORAGE_KEY)
    }

    /// Read the persisted horizontal drag bias, if any.
    #[must_use]
    pub fn load_drag_offset(&self) -> Option<i32> {
        match self.backend.get(DRAG_OFFSET_STORAGE_KEY) {
            Ok(Some(text)) => text.trim().parse().ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "drag offset read failed");
                None
            }
        }
    }

    /// Persist the horizontal drag bias under its own key.
    pub fn save_drag_offset(&self, offset: i32) -> StoreResult<()> {
        self.backend.set(DRAG_OFFSET_STORAGE_KEY, &offset.to_string())
    }
}

impl fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}
