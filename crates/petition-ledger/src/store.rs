//! `LedgerStore` implementations.
//!
//! Both stores keep the snapshot as one JSON blob `{signatures, auditLog}`:
//! `MemoryStore` under a storage key in a shared in-process map, and
//! `JsonFileStore` in a single file on disk.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tracing::debug;

use petition_contracts::{
    entry::LedgerSnapshot,
    error::{PetitionError, PetitionResult},
};
use petition_core::LedgerStore;

/// The storage key the web front end uses for the ledger.
pub const DEFAULT_STORAGE_KEY: &str = "eci-signatures";

fn decode(raw: &str, origin: &str) -> PetitionResult<LedgerSnapshot> {
    serde_json::from_str(raw).map_err(|e| PetitionError::Persistence {
        reason: format!("corrupt ledger state in {}: {}", origin, e),
    })
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Key/value storage held in memory.
///
/// Clones share the same slots, so a second ledger opened on a clone sees
/// what the first one saved, like two page loads sharing local storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    key: String,
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// A store using [`DEFAULT_STORAGE_KEY`].
    pub fn new() -> Self {
        Self::with_key(DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw JSON stored under this store's key.
    pub fn raw(&self) -> Option<String> {
        self.lock().ok()?.get(&self.key).cloned()
    }

    /// Overwrite the raw JSON stored under this store's key.
    pub fn set_raw(&self, json: impl Into<String>) -> PetitionResult<()> {
        self.lock()?.insert(self.key.clone(), json.into());
        Ok(())
    }

    fn lock(&self) -> PetitionResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots.lock().map_err(|e| PetitionError::Persistence {
            reason: format!("memory store lock poisoned: {}", e),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> PetitionResult<Option<LedgerSnapshot>> {
        match self.lock()?.get(&self.key) {
            Some(raw) => decode(raw, &format!("storage key '{}'", self.key)).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> PetitionResult<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.lock()?.insert(self.key.clone(), raw);
        Ok(())
    }
}

// ── File store ────────────────────────────────────────────────────────────────

/// Ledger state in a single JSON file.
///
/// Saves go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous state intact. Missing parent
/// directories are created on first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> PetitionResult<Option<LedgerSnapshot>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| PetitionError::Persistence {
            reason: format!("failed to read '{}': {}", self.path.display(), e),
        })?;
        decode(&raw, &format!("'{}'", self.path.display())).map(Some)
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> PetitionResult<()> {
        let io_err = |e: std::io::Error| PetitionError::Persistence {
            reason: format!("failed to write '{}': {}", self.path.display(), e),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let raw = serde_json::to_string(snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, raw).map_err(io_err)?;
        fs::rename(&temp, &self.path).map_err(io_err)?;

        debug!(
            path = %self.path.display(),
            signatures = snapshot.signatures.len(),
            "ledger state saved"
        );
        Ok(())
    }
}
