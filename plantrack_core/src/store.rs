//! Embedded training store with file locking.
//!
//! All collections live in a single JSON document that is loaded into memory
//! on open and rewritten atomically on every committed transaction. The
//! transaction runs against a clone of the live data, so a failure at any
//! point leaves both the in-memory state and the on-disk file untouched.

use crate::error::{Error, Result};
use crate::types::{
    EntityId, Level, Move, Program, SyncConflict, SyncQueueItem, UserSettings, WorkoutLog,
};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Every collection in the store, serialized as one JSON document.
///
/// `sync_queue` and `conflicts` are extension points for a future sync
/// layer; this crate stores them but never populates them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub programs: BTreeMap<EntityId, Program>,
    #[serde(default)]
    pub levels: BTreeMap<EntityId, Level>,
    #[serde(default)]
    pub moves: BTreeMap<EntityId, Move>,
    #[serde(default)]
    pub logs: BTreeMap<EntityId, WorkoutLog>,
    #[serde(default)]
    pub settings: Option<UserSettings>,
    #[serde(default)]
    pub sync_queue: BTreeMap<EntityId, SyncQueueItem>,
    #[serde(default)]
    pub conflicts: BTreeMap<EntityId, SyncConflict>,
}

/// The embedded store backing all services.
///
/// Single-process, single active writer: the transaction below is the only
/// concurrency primitive. Two independent sessions against the same file
/// may lose updates; the file locks only serialize the individual reads
/// and writes themselves.
pub struct Store {
    path: Option<PathBuf>,
    data: StoreData,
}

impl Store {
    /// Open a store file, creating an empty store if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is an error: training data is
    /// not regenerable and must not be silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            tracing::info!("No store file at {:?}, starting empty", path);
            return Ok(Self {
                path: Some(path),
                data: StoreData::default(),
            });
        }

        let file = File::open(&path)?;

        // Shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            return Err(e.into());
        }

        file.unlock()?;

        let data: StoreData = serde_json::from_str(&contents)?;
        tracing::debug!("Loaded store from {:?}", path);

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Create a store with no backing file, for tests and ephemeral use
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    /// Shared read access to every collection
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// Run `f` against a clone of the live data and commit atomically.
    ///
    /// On `Ok` the clone is persisted to disk and then swapped in; if `f`
    /// fails, or the persist step fails, nothing is observable: the live
    /// data and the store file both keep their pre-transaction state.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreData) -> Result<T>,
    {
        let mut working = self.data.clone();
        let outcome = f(&mut working)?;
        self.persist(&working)?;
        self.data = working;
        Ok(outcome)
    }

    /// Atomically write `data` to the store file by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn persist(&self, data: &StoreData) -> Result<()> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        // Exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Persisted store to {:?}", path);
        Ok(())
    }
}
